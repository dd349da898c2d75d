pub mod tenant_service;

pub use tenant_service::{NewTenant, TenantError, TenantService};
