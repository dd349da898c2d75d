//! Row isolation against a real Postgres. Runs only when DATABASE_URL is set
//! (environment or .env); the user needs CREATEDB.

mod common;

use anyhow::{Context, Result};
use axum::body::Body;
use common::{get, TestApp};
use serde_json::json;

use smart_housing_tenancy::config::{AppConfig, Environment};
use smart_housing_tenancy::database::{schema, DatabaseManager, PoolSettings};
use smart_housing_tenancy::services::{NewTenant, TenantError, TenantService};

/// Separate from the default suffix so a developer's real databases are untouched
const SUFFIX: &str = "smart_housing_test";

fn live_config() -> Option<AppConfig> {
    let _ = dotenvy::dotenv();
    let url = std::env::var("DATABASE_URL").ok()?;
    let central = url::Url::parse(&url)
        .ok()
        .map(|u| u.path().trim_start_matches('/').to_string())
        .filter(|db| !db.is_empty())
        .unwrap_or_else(|| "postgres".to_string());

    let mut config = common::test_config(Environment::Production);
    config.database.url = Some(url);
    config.database.central_database = central;
    config.database.acquire_timeout_ms = 5_000;
    config.database.verify_on_bind = true;
    config.tenancy.database_suffix = SUFFIX.to_string();
    Some(config)
}

fn manager(config: &AppConfig) -> DatabaseManager {
    DatabaseManager::new(PoolSettings::from_config(&config.database, &config.tenancy.database_suffix))
}

/// Fresh tenant database with a members table holding the given names
async fn seed_tenant(database: &DatabaseManager, tenant_id: &str, members: &[&str]) -> Result<()> {
    let name = database.tenant_database_name(tenant_id)?;
    database.drop_database(&name).await?;
    database.create_database(&name, None).await?;

    let pool = database.database_pool(&name)?;
    schema::ensure_tenant_schema(&pool).await?;
    for (i, first_name) in members.iter().enumerate() {
        sqlx::query("INSERT INTO members (member_number, first_name, last_name) VALUES ($1, $2, $3)")
            .bind(format!("{}-{}", tenant_id, i + 1))
            .bind(first_name)
            .bind(tenant_id)
            .execute(&pool)
            .await?;
    }
    pool.close().await;
    Ok(())
}

async fn member_names(app: &TestApp, host: &str) -> Result<Vec<String>> {
    let (status, body) = app
        .send(get("/api/members").header("host", host).body(Body::empty())?)
        .await?;
    anyhow::ensure!(status == 200, "status {status} for {host}: {body}");
    let rows = body["data"].as_array().context("data is not an array")?;
    Ok(rows
        .iter()
        .filter_map(|row| row["first_name"].as_str().map(str::to_string))
        .collect())
}

#[tokio::test]
async fn members_come_only_from_the_resolved_tenant_database() -> Result<()> {
    let Some(config) = live_config() else {
        eprintln!("DATABASE_URL not set; skipping live isolation test");
        return Ok(());
    };

    let setup = manager(&config);
    seed_tenant(&setup, "acme", &["Adaeze", "Bola"]).await?;
    seed_tenant(&setup, "frsc", &["Chinedu"]).await?;

    let app = TestApp::with_config(config);

    for _ in 0..2 {
        assert_eq!(member_names(&app, "acme.localhost:3000").await?, vec!["Adaeze", "Bola"]);
        assert_eq!(member_names(&app, "frsc.smarthousing.ng").await?, vec!["Chinedu"]);
    }
    assert_eq!(app.state.database.active_bindings("acme").await, 0);
    assert_eq!(app.state.database.active_bindings("frsc").await, 0);

    app.state.database.close_all().await;
    for tenant in ["acme", "frsc"] {
        setup.drop_database(&setup.tenant_database_name(tenant)?).await?;
    }
    setup.close_all().await;
    Ok(())
}

#[tokio::test]
async fn duplicate_slug_is_rejected_before_creating_a_database() -> Result<()> {
    let Some(config) = live_config() else {
        eprintln!("DATABASE_URL not set; skipping live provisioning test");
        return Ok(());
    };

    let database = manager(&config);
    let central = database.central_pool().await?;
    schema::ensure_central_schema(&central).await?;

    let suffix = uuid::Uuid::new_v4().simple().to_string();
    let first_id = format!("it-{}", &suffix[..8]);
    let second_id = format!("it-{}", &suffix[8..16]);
    let slug = format!("slug-{}", &suffix[..8]);

    let service = TenantService::new(database.clone()).await?;
    let new = |id: &str| NewTenant {
        id: id.to_string(),
        slug: Some(slug.clone()),
        domain: None,
        template: None,
        data: json!({}),
    };

    service.create_tenant(new(&first_id)).await?;
    let err = service.create_tenant(new(&second_id)).await.unwrap_err();
    assert!(matches!(err, TenantError::SlugTaken(ref s) if s == &slug), "got {err}");

    let second_db = database.tenant_database_name(&second_id)?;
    let (exists,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&second_db)
        .fetch_one(&central)
        .await?;
    assert!(!exists, "{second_db} was left behind");

    sqlx::query("DELETE FROM tenants WHERE id = $1")
        .bind(&first_id)
        .execute(&central)
        .await?;
    database.drop_database(&database.tenant_database_name(&first_id)?).await?;
    database.close_all().await;
    Ok(())
}
