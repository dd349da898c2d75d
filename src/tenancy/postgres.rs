use async_trait::async_trait;
use sqlx::PgPool;

use super::store::{DomainRegistry, StoreError, TenantDirectory};
use crate::database::models::{Domain, Tenant};

const TENANT_COLUMNS: &str = "id, slug, status, data, created_at, updated_at";
const DOMAIN_COLUMNS: &str = "id, domain, tenant_id, created_at";

/// Domain registry and tenant directory backed by the central database
#[derive(Clone)]
pub struct PgTenancyStore {
    pool: PgPool,
}

impl PgTenancyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Escape LIKE wildcards so a label is matched literally
fn like_escape(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[async_trait]
impl DomainRegistry for PgTenancyStore {
    async fn find_by_domain(&self, domain: &str) -> Result<Option<Domain>, StoreError> {
        let query = format!("SELECT {} FROM domains WHERE domain = $1", DOMAIN_COLUMNS);
        let row = sqlx::query_as::<_, Domain>(&query)
            .bind(domain)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_label_prefix(&self, label: &str) -> Result<Option<Domain>, StoreError> {
        let escaped = like_escape(label);
        let query = format!(
            r#"
            SELECT {}
            FROM domains
            WHERE domain LIKE $1
            ORDER BY (domain LIKE $2) DESC, length(domain) ASC, id ASC
            LIMIT 1
            "#,
            DOMAIN_COLUMNS
        );
        let row = sqlx::query_as::<_, Domain>(&query)
            .bind(format!("{}%", escaped))
            .bind(format!("{}.%", escaped))
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn domains_for_tenant(&self, tenant_id: &str) -> Result<Vec<Domain>, StoreError> {
        let query = format!(
            "SELECT {} FROM domains WHERE tenant_id = $1 ORDER BY domain",
            DOMAIN_COLUMNS
        );
        let rows = sqlx::query_as::<_, Domain>(&query)
            .bind(tenant_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[async_trait]
impl TenantDirectory for PgTenancyStore {
    async fn find(&self, tenant_id: &str) -> Result<Option<Tenant>, StoreError> {
        let query = format!("SELECT {} FROM tenants WHERE id = $1", TENANT_COLUMNS);
        let row = sqlx::query_as::<_, Tenant>(&query)
            .bind(tenant_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError> {
        let query = format!("SELECT {} FROM tenants WHERE slug = $1", TENANT_COLUMNS);
        let row = sqlx::query_as::<_, Tenant>(&query)
            .bind(slug)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn oldest_active(&self) -> Result<Option<Tenant>, StoreError> {
        let query = format!(
            "SELECT {} FROM tenants WHERE status = 'active' ORDER BY created_at ASC, id ASC LIMIT 1",
            TENANT_COLUMNS
        );
        let row = sqlx::query_as::<_, Tenant>(&query)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn list(&self) -> Result<Vec<Tenant>, StoreError> {
        let query = format!(
            "SELECT {} FROM tenants ORDER BY created_at ASC, id ASC",
            TENANT_COLUMNS
        );
        let rows = sqlx::query_as::<_, Tenant>(&query)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_like_wildcards() {
        assert_eq!(like_escape("acme"), "acme");
        assert_eq!(like_escape("a_b%c"), "a\\_b\\%c");
        assert_eq!(like_escape("a\\b"), "a\\\\b");
    }
}
