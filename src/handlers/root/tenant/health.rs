// handlers/root/tenant/health.rs - GET /api/root/tenant/:id/health handler

use axum::extract::{Path, State};
use chrono::Utc;
use serde_json::{json, Value};

use crate::app::AppState;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult};

/// Pings the tenant database through its pool. Works for suspended tenants
/// too, since this does not go through resolution.
pub async fn tenant_health(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Value> {
    let tenant = super::load_tenant(&state, &id).await?;
    let binding = state.database.bind(&tenant).await.map_err(ApiError::from)?;

    sqlx::query("SELECT 1")
        .execute(binding.connection().pool())
        .await
        .map_err(|e| {
            tracing::warn!(tenant = %tenant.id, error = %e, "Tenant health check failed");
            ApiError::service_unavailable("Tenant database unavailable")
        })?;

    Ok(ApiResponse::success(json!({
        "tenant": tenant.id,
        "status": tenant.status,
        "database": binding.connection().database(),
        "timestamp": Utc::now(),
        "database_status": "ok",
    })))
}
