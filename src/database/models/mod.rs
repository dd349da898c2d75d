pub mod domain;
pub mod member;
pub mod tenant;

pub use domain::Domain;
pub use member::Member;
pub use tenant::{Tenant, TenantStatus};
