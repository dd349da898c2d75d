use axum::response::Response;
use serde::Serialize;
use serde_json::{json, Value};
use thiserror::Error;

use super::store::StoreError;
use crate::config::Environment;
use crate::database::models::TenantStatus;
use crate::database::DatabaseError;
use crate::error::ApiError;

/// Operator-facing detail for a failed resolution
#[derive(Debug, Clone, Default, Serialize)]
pub struct Diagnostics {
    pub host: Option<String>,
    pub candidates: Vec<String>,
    pub tenant_slug_provided: Option<String>,
    pub available_tenants: Vec<String>,
    pub hint: String,
}

#[derive(Debug, Error)]
pub enum TenancyError {
    #[error("No tenant matches host {:?}", .0.host)]
    TenantNotFound(Box<Diagnostics>),

    #[error("Domain for host {host:?} points at missing tenant '{tenant_id}'")]
    TenantRecordMissing {
        tenant_id: String,
        host: Option<String>,
    },

    #[error("Tenant '{tenant_id}' is {status}")]
    TenantInactive {
        tenant_id: String,
        status: TenantStatus,
    },

    #[error("Tenant database unavailable: {0}")]
    Connection(#[from] DatabaseError),

    #[error("Tenant lookup failed: {0}")]
    Store(#[from] StoreError),
}

impl TenancyError {
    /// Client-safe error; never carries hosts, slugs or causes
    pub fn to_api_error(&self) -> ApiError {
        match self {
            TenancyError::TenantNotFound(_) | TenancyError::TenantRecordMissing { .. } => {
                ApiError::not_found("Tenant not found")
            }
            TenancyError::TenantInactive { .. } => {
                ApiError::forbidden("This cooperative's account is not active")
            }
            TenancyError::Connection(_) => {
                ApiError::internal_server_error("Unable to connect to the tenant database")
            }
            TenancyError::Store(_) => ApiError::internal_server_error("Tenant lookup failed"),
        }
    }

    /// Detail attached to responses in development environments
    pub fn debug_details(&self) -> Value {
        match self {
            TenancyError::TenantNotFound(diagnostics) => json!(diagnostics),
            TenancyError::TenantRecordMissing { tenant_id, host } => json!({
                "tenant_id": tenant_id,
                "host": host,
                "hint": "A domain entry points at a tenant id that is missing from the tenants table",
            }),
            TenancyError::TenantInactive { tenant_id, status } => json!({
                "tenant_id": tenant_id,
                "status": status,
            }),
            TenancyError::Connection(e) => json!({
                "detail": e.to_string(),
                "hint": "Check that the tenant database exists and DATABASE_URL is reachable",
            }),
            TenancyError::Store(e) => json!({ "detail": e.to_string() }),
        }
    }

    pub fn into_response_for(self, environment: Environment) -> Response {
        let debug = environment.is_development().then(|| self.debug_details());
        self.to_api_error().into_response_with_debug(debug)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        let not_found = TenancyError::TenantNotFound(Box::default());
        assert_eq!(not_found.to_api_error().status_code(), 404);

        let missing = TenancyError::TenantRecordMissing {
            tenant_id: "ghost".to_string(),
            host: Some("ghost.example.ng".to_string()),
        };
        assert_eq!(missing.to_api_error().status_code(), 404);

        let inactive = TenancyError::TenantInactive {
            tenant_id: "acme".to_string(),
            status: TenantStatus::Suspended,
        };
        assert_eq!(inactive.to_api_error().status_code(), 403);

        let connection = TenancyError::Connection(DatabaseError::InvalidDatabaseUrl);
        assert_eq!(connection.to_api_error().status_code(), 500);
    }

    #[test]
    fn client_message_never_includes_host() {
        let err = TenancyError::TenantNotFound(Box::new(Diagnostics {
            host: Some("secret.example.ng".to_string()),
            ..Default::default()
        }));
        assert!(!err.to_api_error().message().contains("secret"));
        assert_eq!(err.debug_details()["host"], "secret.example.ng");
    }
}
