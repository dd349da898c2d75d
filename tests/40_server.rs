mod common;

use anyhow::Result;
use common::TestApp;
use reqwest::StatusCode;
use smart_housing_tenancy::config::Environment;

#[tokio::test]
async fn health_reports_degraded_central_database() -> Result<()> {
    let app = TestApp::new(Environment::Development);
    let base_url = common::spawn_server(&app).await?;

    let res = reqwest::get(format!("{}/health", base_url)).await?;
    assert_eq!(res.status(), StatusCode::SERVICE_UNAVAILABLE);

    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["success"], false);
    assert_eq!(body["data"]["status"], "degraded");
    assert!(body["data"]["database_error"].is_string());
    Ok(())
}

#[tokio::test]
async fn root_info_is_public() -> Result<()> {
    let app = TestApp::new(Environment::Production);
    let base_url = common::spawn_server(&app).await?;

    let body = reqwest::get(format!("{}/", base_url))
        .await?
        .json::<serde_json::Value>()
        .await?;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["environment"], "Production");
    Ok(())
}

#[tokio::test]
async fn proxied_requests_resolve_over_http() -> Result<()> {
    let app = TestApp::new(Environment::Production);
    let base_url = common::spawn_server(&app).await?;
    let client = reqwest::Client::new();

    for (forwarded, id) in [("acme.smarthousing.ng", "acme"), ("frsc.smarthousing.ng", "frsc")] {
        let res = client
            .get(format!("{}/api/tenant", base_url))
            .header("x-forwarded-host", forwarded)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK);
        let body = res.json::<serde_json::Value>().await?;
        assert_eq!(body["data"]["id"], id);
    }

    // Loopback host with no signal at all
    let res = client.get(format!("{}/api/tenant", base_url)).send().await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn development_header_override_over_http() -> Result<()> {
    let app = TestApp::new(Environment::Development);
    let base_url = common::spawn_server(&app).await?;

    let res = reqwest::Client::new()
        .get(format!("{}/api/tenant", base_url))
        .header("x-tenant-slug", "frsc-housing")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["data"]["database"], "frsc_smart_housing");
    Ok(())
}
