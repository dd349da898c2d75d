use axum::{
    body::Body,
    http::{HeaderValue, Request},
    middleware::from_fn_with_state,
    routing::{delete, get},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use uuid::Uuid;

use crate::config::AppConfig;
use crate::database::{DatabaseError, DatabaseManager, PoolSettings};
use crate::handlers;
use crate::middleware::{resolve_tenant_middleware, root_auth_middleware};
use crate::tenancy::{DomainRegistry, PgTenancyStore, ResolverSettings, TenantDirectory, TenantResolver};

/// Shared handles for every request; cheap to clone
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub database: DatabaseManager,
    pub domains: Arc<dyn DomainRegistry>,
    pub directory: Arc<dyn TenantDirectory>,
    pub resolver: Arc<TenantResolver>,
}

impl AppState {
    /// Build state over any registry/directory implementation
    pub fn new<S>(config: AppConfig, store: Arc<S>, database: DatabaseManager) -> Self
    where
        S: DomainRegistry + TenantDirectory + 'static,
    {
        let domains: Arc<dyn DomainRegistry> = store.clone();
        let directory: Arc<dyn TenantDirectory> = store;
        let resolver = TenantResolver::new(
            domains.clone(),
            directory.clone(),
            ResolverSettings::from_config(&config),
        );

        Self {
            config: Arc::new(config),
            database,
            domains,
            directory,
            resolver: Arc::new(resolver),
        }
    }

    /// State backed by the central Postgres database
    pub async fn connect(config: AppConfig) -> Result<Self, DatabaseError> {
        let database = DatabaseManager::new(PoolSettings::from_config(
            &config.database,
            &config.tenancy.database_suffix,
        ));
        let store = Arc::new(PgTenancyStore::new(database.central_pool().await?));
        Ok(Self::new(config, store, database))
    }
}

pub fn router(state: AppState) -> Router {
    let cors = cors_layer(&state.config);

    let request_logging = state.config.api.enable_request_logging;

    let router = Router::new()
        // Public
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .merge(tenant_routes(state.clone()))
        .merge(root_routes(state.clone()))
        .with_state(state)
        // Global middleware
        .layer(cors);

    if request_logging {
        // Each request gets an id so tenant logs can be correlated
        router.layer(TraceLayer::new_for_http().make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "request",
                id = %Uuid::new_v4(),
                method = %request.method(),
                uri = %request.uri(),
            )
        }))
    } else {
        router
    }
}

/// Routes that run inside a resolved tenant
fn tenant_routes(state: AppState) -> Router<AppState> {
    use handlers::tenant;

    Router::new()
        .route("/api/tenant", get(tenant::current_tenant))
        .route("/api/members", get(tenant::members_list))
        .route_layer(from_fn_with_state(state, resolve_tenant_middleware))
}

/// Platform-admin routes; central database only, no tenant binding
fn root_routes(state: AppState) -> Router<AppState> {
    use handlers::root::tenant;

    Router::new()
        .route("/api/root/tenant", get(tenant::tenant_list))
        .route("/api/root/tenant/:id", get(tenant::tenant_show))
        .route("/api/root/tenant/:id/health", get(tenant::tenant_health))
        .route("/api/root/tenant/:id/connections", delete(tenant::tenant_purge))
        .route_layer(from_fn_with_state(state, root_auth_middleware))
}

fn cors_layer(config: &AppConfig) -> CorsLayer {
    if config.environment.is_development() {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .security
        .cors_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}
