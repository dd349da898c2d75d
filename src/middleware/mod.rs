pub mod resolve_tenant;
pub mod response;
pub mod root_auth;

pub use resolve_tenant::{resolve_tenant_middleware, TenantContext};
pub use response::{ApiResponse, ApiResult};
pub use root_auth::root_auth_middleware;
