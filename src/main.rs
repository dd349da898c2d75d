use smart_housing_tenancy::app::{self, AppState};
use smart_housing_tenancy::config;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present so cargo run picks up DATABASE_URL, APP_ENV, etc.
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Initialize configuration (this loads the config singleton)
    let config = config::config().clone();
    tracing::info!(
        environment = ?config.environment,
        central_database = %config.database.central_database,
        suffix = %config.tenancy.database_suffix,
        slug_overrides = config.environment.is_development() && config.tenancy.allow_slug_overrides,
        "Starting Smart Housing tenancy service"
    );
    if config.tenancy.fallback_to_oldest_tenant && config.environment.is_development() {
        tracing::warn!("Requests without a tenant signal will be served by the oldest active tenant");
    }

    let bind_addr = format!("0.0.0.0:{}", config.api.port);
    let state = AppState::connect(config).await?;
    let database = state.database.clone();

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Listening on http://{}", bind_addr);

    axum::serve(listener, app::router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    database.close_all().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
