// handlers/root/tenant/show.rs - GET /api/root/tenant/:id handler

use axum::extract::{Path, State};
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::{Domain, Tenant};
use crate::database::PoolStatus;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct TenantDetail {
    pub tenant: Tenant,
    pub database: String,
    pub domains: Vec<Domain>,
    pub pool: Option<PoolStatus>,
}

pub async fn tenant_show(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<TenantDetail> {
    let tenant = super::load_tenant(&state, &id).await?;
    let database = state.database.tenant_database_name(&tenant.id)?;
    let domains = state.domains.domains_for_tenant(&tenant.id).await?;
    let pool = state.database.status(&tenant.id).await;

    Ok(ApiResponse::success(TenantDetail {
        tenant,
        database,
        domains,
        pool,
    }))
}
