use async_trait::async_trait;
use thiserror::Error;

use crate::database::models::{Domain, Tenant};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Host → tenant lookup table
#[async_trait]
pub trait DomainRegistry: Send + Sync {
    /// Exact match on the stored (lowercase) domain
    async fn find_by_domain(&self, domain: &str) -> Result<Option<Domain>, StoreError>;

    /// Domain starting with `label.`, else starting with `label`; shortest first
    async fn find_by_label_prefix(&self, label: &str) -> Result<Option<Domain>, StoreError>;

    async fn domains_for_tenant(&self, tenant_id: &str) -> Result<Vec<Domain>, StoreError>;
}

/// Tenant metadata keyed by tenant id
#[async_trait]
pub trait TenantDirectory: Send + Sync {
    async fn find(&self, tenant_id: &str) -> Result<Option<Tenant>, StoreError>;

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError>;

    async fn oldest_active(&self) -> Result<Option<Tenant>, StoreError>;

    /// All tenants, oldest first
    async fn list(&self) -> Result<Vec<Tenant>, StoreError>;
}
