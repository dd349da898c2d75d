mod common;

use anyhow::Result;
use axum::body::Body;
use axum::http::Request;
use common::{get, TestApp, ROOT_TOKEN};
use smart_housing_tenancy::config::Environment;

fn authorized(uri: &str) -> axum::http::request::Builder {
    get(uri).header("authorization", format!("Bearer {}", ROOT_TOKEN))
}

#[tokio::test]
async fn root_routes_require_the_root_token() -> Result<()> {
    let app = TestApp::new(Environment::Production);

    let (status, _) = app.send(get("/api/root/tenant").body(Body::empty())?).await?;
    assert_eq!(status, 401);

    let (status, _) = app
        .send(
            get("/api/root/tenant")
                .header("authorization", "Bearer wrong")
                .body(Body::empty())?,
        )
        .await?;
    assert_eq!(status, 401);
    Ok(())
}

#[tokio::test]
async fn root_routes_are_closed_without_a_configured_token() -> Result<()> {
    let mut config = common::test_config(Environment::Development);
    config.security.root_api_token = None;
    let app = TestApp::with_config(config);

    let (status, body) = app.send(authorized("/api/root/tenant").body(Body::empty())?).await?;
    assert_eq!(status, 403);
    assert_eq!(body["code"], "FORBIDDEN");
    Ok(())
}

#[tokio::test]
async fn lists_tenants_with_domains_and_bindings() -> Result<()> {
    let app = TestApp::new(Environment::Production);

    let (status, body) = app.send(authorized("/api/root/tenant").body(Body::empty())?).await?;
    assert_eq!(status, 200, "body: {body}");

    let tenants = body["data"].as_array().cloned().unwrap_or_default();
    assert_eq!(tenants.len(), 3);
    let dormant = tenants
        .iter()
        .find(|t| t["id"] == "dormant")
        .expect("suspended tenants are listed");
    assert_eq!(dormant["status"], "suspended");
    assert_eq!(dormant["domains"][0], "dormant.smarthousing.ng");
    assert_eq!(dormant["active_bindings"], 0);
    Ok(())
}

#[tokio::test]
async fn shows_tenant_detail_and_pool_state() -> Result<()> {
    let app = TestApp::new(Environment::Production);

    let (status, body) = app.send(authorized("/api/root/tenant/frsc").body(Body::empty())?).await?;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["database"], "frsc_smart_housing");
    assert_eq!(body["data"]["tenant"]["slug"], "frsc-housing");
    assert!(body["data"]["pool"].is_null());

    let (status, _) = app.send(authorized("/api/root/tenant/nobody").body(Body::empty())?).await?;
    assert_eq!(status, 404);
    Ok(())
}

#[tokio::test]
async fn purge_drops_cached_pool() -> Result<()> {
    let app = TestApp::new(Environment::Production);

    let (status, _) = app
        .send(get("/api/tenant").header("host", "acme.smarthousing.ng").body(Body::empty())?)
        .await?;
    assert_eq!(status, 200);
    assert!(app.state.database.status("acme").await.is_some());

    let request = Request::builder()
        .method("DELETE")
        .uri("/api/root/tenant/acme/connections")
        .header("authorization", format!("Bearer {}", ROOT_TOKEN))
        .body(Body::empty())?;
    let (status, body) = app.send(request).await?;
    assert_eq!(status, 200, "body: {body}");
    assert_eq!(body["data"]["purged"], true);
    assert!(app.state.database.status("acme").await.is_none());
    Ok(())
}

#[tokio::test]
async fn tenant_health_reports_unreachable_database() -> Result<()> {
    let app = TestApp::new(Environment::Production);

    let (status, body) = app
        .send(authorized("/api/root/tenant/acme/health").body(Body::empty())?)
        .await?;

    assert_eq!(status, 503, "body: {body}");
    assert_eq!(body["code"], "SERVICE_UNAVAILABLE");
    assert_eq!(app.state.database.active_bindings("acme").await, 0);
    Ok(())
}
