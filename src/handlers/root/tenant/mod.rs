// handlers/root/tenant/mod.rs - Tenant management handlers

pub mod health; // GET /api/root/tenant/:id/health
pub mod list;   // GET /api/root/tenant
pub mod purge;  // DELETE /api/root/tenant/:id/connections
pub mod show;   // GET /api/root/tenant/:id

pub use health::tenant_health;
pub use list::tenant_list;
pub use purge::tenant_purge;
pub use show::tenant_show;

use crate::app::AppState;
use crate::database::models::Tenant;
use crate::error::ApiError;

async fn load_tenant(state: &AppState, id: &str) -> Result<Tenant, ApiError> {
    state
        .directory
        .find(id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Tenant '{}' not found", id)))
}
