// handlers/mod.rs - Route handlers
//
// Public (no tenant) → Tenant (resolved by host) → Root (platform admin)

pub mod root;   // /api/root/* - bearer ROOT_API_TOKEN
pub mod tenant; // /api/tenant, /api/members - resolved tenant required

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use serde_json::{json, Value};

use crate::app::AppState;

pub async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "success": true,
        "data": {
            "name": "Smart Housing Tenancy",
            "version": env!("CARGO_PKG_VERSION"),
            "environment": state.config.environment,
            "endpoints": {
                "health": "/health (public)",
                "tenant": "/api/tenant (resolved tenant)",
                "members": "/api/members (resolved tenant)",
                "root": "/api/root/tenant[/:id[/health|/connections]] (platform admin)",
            }
        }
    }))
}

pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    let now = Utc::now();

    match state.database.health_check().await {
        Ok(_) => (
            StatusCode::OK,
            Json(json!({
                "success": true,
                "data": {
                    "status": "ok",
                    "timestamp": now,
                    "database": "ok"
                }
            })),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Central database health check failed");
            let mut data = json!({
                "status": "degraded",
                "timestamp": now,
            });
            if state.config.environment.is_development() {
                data["database_error"] = json!(e.to_string());
            }
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({
                    "success": false,
                    "error": "database unavailable",
                    "data": data
                })),
            )
        }
    }
}
