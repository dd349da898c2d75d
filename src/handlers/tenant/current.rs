// handlers/tenant/current.rs - GET /api/tenant handler

use axum::Extension;
use serde::Serialize;
use serde_json::Value;

use crate::database::models::TenantStatus;
use crate::middleware::{ApiResponse, ApiResult, TenantContext};
use crate::tenancy::Resolution;

#[derive(Debug, Serialize)]
pub struct CurrentTenant {
    pub id: String,
    pub slug: String,
    pub status: TenantStatus,
    pub database: String,
    pub resolved_by: Resolution,
    pub data: Value,
}

/// Summary of the tenant the request resolved to, used by clients at boot
pub async fn current_tenant(Extension(ctx): Extension<TenantContext>) -> ApiResult<CurrentTenant> {
    Ok(ApiResponse::success(CurrentTenant {
        id: ctx.tenant.id,
        slug: ctx.tenant.slug,
        status: ctx.tenant.status,
        database: ctx.connection.database().to_string(),
        resolved_by: ctx.resolution,
        data: ctx.tenant.data,
    }))
}
