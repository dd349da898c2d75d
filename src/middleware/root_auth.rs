use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};

use crate::app::AppState;
use crate::error::ApiError;

/// Guards platform-admin routes with the static `ROOT_API_TOKEN` bearer.
/// The routes are closed when no token is configured.
pub async fn root_auth_middleware(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let Some(expected) = state.config.security.root_api_token.as_deref() else {
        return ApiError::forbidden("Root API is disabled").into_response();
    };

    let authorized = match extract_bearer_from_headers(request.headers()) {
        Ok(token) => constant_time_eq(token.as_bytes(), expected.as_bytes()),
        Err(msg) => return ApiError::unauthorized(msg).into_response(),
    };

    if !authorized {
        tracing::warn!(path = %request.uri().path(), "Rejected root API token");
        return ApiError::unauthorized("Invalid root API token").into_response();
    }

    next.run(request).await
}

/// Compares every byte so the time taken does not reveal a matching prefix
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |diff, (x, y)| diff | (x ^ y)) == 0
}

/// Extract bearer token from Authorization header
fn extract_bearer_from_headers(headers: &HeaderMap) -> Result<&str, &'static str> {
    let auth_str = headers
        .get(axum::http::header::AUTHORIZATION)
        .ok_or("Missing Authorization header")?
        .to_str()
        .map_err(|_| "Invalid Authorization header format")?;

    match auth_str.strip_prefix("Bearer ") {
        Some(token) if !token.trim().is_empty() => Ok(token.trim()),
        Some(_) => Err("Empty bearer token"),
        None => Err("Authorization header must use Bearer token format"),
    }
}
