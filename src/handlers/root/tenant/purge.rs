// handlers/root/tenant/purge.rs - DELETE /api/root/tenant/:id/connections handler

use axum::extract::{Path, State};
use serde_json::{json, Value};

use crate::app::AppState;
use crate::middleware::{ApiResponse, ApiResult};

/// Closes the tenant's pool; the next request reconnects
pub async fn tenant_purge(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let tenant = super::load_tenant(&state, &id).await?;
    let purged = state.database.purge(&tenant.id).await;
    tracing::info!(tenant = %tenant.id, purged, "Tenant pool purge requested");

    Ok(ApiResponse::success(json!({
        "tenant": tenant.id,
        "purged": purged,
    })))
}
