// handlers/tenant/mod.rs - Tenant-scoped handlers
//
// Every route here runs behind resolve_tenant_middleware and reads its
// database through the TenantContext extension.

pub mod current; // GET /api/tenant
pub mod members; // GET /api/members

pub use current::current_tenant;
pub use members::members_list;
