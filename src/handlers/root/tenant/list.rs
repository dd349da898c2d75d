// handlers/root/tenant/list.rs - GET /api/root/tenant handler

use axum::extract::State;
use serde::Serialize;

use crate::app::AppState;
use crate::database::models::Tenant;
use crate::middleware::{ApiResponse, ApiResult};

#[derive(Debug, Serialize)]
pub struct TenantSummary {
    #[serde(flatten)]
    pub tenant: Tenant,
    pub domains: Vec<String>,
    pub active_bindings: usize,
}

pub async fn tenant_list(State(state): State<AppState>) -> ApiResult<Vec<TenantSummary>> {
    let tenants = state.directory.list().await?;

    let mut summaries = Vec::with_capacity(tenants.len());
    for tenant in tenants {
        let domains = state
            .domains
            .domains_for_tenant(&tenant.id)
            .await?
            .into_iter()
            .map(|d| d.domain)
            .collect();
        let active_bindings = state.database.active_bindings(&tenant.id).await;
        summaries.push(TenantSummary {
            tenant,
            domains,
            active_bindings,
        });
    }

    Ok(ApiResponse::success(summaries))
}
