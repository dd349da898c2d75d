use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use tracing::{debug, error};

use crate::app::AppState;
use crate::database::models::Tenant;
use crate::database::TenantConnection;
use crate::tenancy::{RequestSignals, Resolution, TenancyError};

/// Resolved tenant and its database, injected by [`resolve_tenant_middleware`]
#[derive(Clone, Debug)]
pub struct TenantContext {
    pub tenant: Tenant,
    pub resolution: Resolution,
    pub connection: TenantConnection,
}

/// Middleware that resolves the tenant for a request and binds it to that
/// tenant's database pool for the lifetime of the downstream handler.
pub async fn resolve_tenant_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    let environment = state.config.environment;
    let signals = RequestSignals::from_request_parts(request.headers(), request.uri());

    let resolved = match state.resolver.resolve(&signals).await {
        Ok(resolved) => resolved,
        Err(e) => return e.into_response_for(environment),
    };

    // Dropped at the end of this function on every path, including unwinding
    // and a cancelled request future
    let binding = match state.database.bind(&resolved.tenant).await {
        Ok(binding) => binding,
        Err(e) => {
            error!(tenant = %resolved.tenant.id, error = %e, "Failed to bind tenant database");
            return TenancyError::Connection(e).into_response_for(environment);
        }
    };

    debug!(
        tenant = %resolved.tenant.id,
        database = %binding.connection().database(),
        path = %request.uri().path(),
        "Tenant bound for request"
    );

    request.extensions_mut().insert(TenantContext {
        tenant: resolved.tenant,
        resolution: resolved.resolution,
        connection: binding.connection().clone(),
    });

    let response = next.run(request).await;
    drop(binding);
    response
}
