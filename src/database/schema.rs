use sqlx::PgPool;
use tracing::info;

/// Central database: tenant directory and domain registry
const CENTRAL_SCHEMA: &[&str] = &[
    r#"CREATE TABLE IF NOT EXISTS tenants (
        id          TEXT PRIMARY KEY,
        slug        TEXT NOT NULL UNIQUE,
        status      TEXT NOT NULL DEFAULT 'active'
                    CHECK (status IN ('active', 'suspended', 'cancelled')),
        data        JSONB NOT NULL DEFAULT '{}'::jsonb,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        updated_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    r#"CREATE TABLE IF NOT EXISTS domains (
        id          BIGSERIAL PRIMARY KEY,
        domain      TEXT NOT NULL UNIQUE,
        tenant_id   TEXT NOT NULL REFERENCES tenants(id) ON UPDATE CASCADE ON DELETE CASCADE,
        created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#,
    "CREATE INDEX IF NOT EXISTS domains_tenant_id_idx ON domains (tenant_id)",
    "CREATE INDEX IF NOT EXISTS tenants_status_created_idx ON tenants (status, created_at)",
];

/// Tables every tenant database starts with when not cloned from a template
const TENANT_SCHEMA: &[&str] = &[r#"CREATE TABLE IF NOT EXISTS members (
        id             BIGSERIAL PRIMARY KEY,
        member_number  TEXT UNIQUE,
        first_name     TEXT NOT NULL,
        last_name      TEXT NOT NULL,
        email          TEXT,
        status         TEXT NOT NULL DEFAULT 'active',
        created_at     TIMESTAMPTZ NOT NULL DEFAULT NOW()
    )"#];

pub async fn ensure_central_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in CENTRAL_SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    info!("Central schema is up to date");
    Ok(())
}

pub async fn ensure_tenant_schema(pool: &PgPool) -> Result<(), sqlx::Error> {
    for statement in TENANT_SCHEMA {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}
