use serde_json::Value;
use sqlx::PgPool;
use tracing::{error, info, warn};

use crate::database::models::{Domain, Tenant, TenantStatus};
use crate::database::{schema, DatabaseError, DatabaseManager};

#[derive(Debug, thiserror::Error)]
pub enum TenantError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Database manager error: {0}")]
    DatabaseManager(#[from] DatabaseError),
    #[error("Tenant already exists: {0}")]
    AlreadyExists(String),
    #[error("Tenant not found: {0}")]
    NotFound(String),
    #[error("Slug already taken: {0}")]
    SlugTaken(String),
    #[error("Domain already registered: {0}")]
    DomainTaken(String),
    #[error("Invalid tenant id: {0}")]
    InvalidId(String),
    #[error("Invalid slug: {0}")]
    InvalidSlug(String),
    #[error("Invalid domain: {0}")]
    InvalidDomain(String),
}

/// Input for provisioning a cooperative
#[derive(Debug, Clone)]
pub struct NewTenant {
    pub id: String,
    pub slug: Option<String>,
    pub domain: Option<String>,
    pub template: Option<String>,
    pub data: Value,
}

/// Platform-admin operations on the central directory
pub struct TenantService {
    central: PgPool,
    database: DatabaseManager,
}

impl TenantService {
    pub async fn new(database: DatabaseManager) -> Result<Self, TenantError> {
        let central = database.central_pool().await?;
        Ok(Self { central, database })
    }

    /// Create the tenant database, then register the tenant and its domain.
    /// The database is dropped again if the registration fails.
    pub async fn create_tenant(&self, new: NewTenant) -> Result<Tenant, TenantError> {
        validate_tenant_id(&new.id)?;
        let slug = tenant_slug(&new)?;
        let domain = new.domain.as_deref().map(normalize_domain).transpose()?;
        let database = self.database.tenant_database_name(&new.id)?;

        if self.tenant_exists(&new.id).await? {
            return Err(TenantError::AlreadyExists(new.id));
        }
        if self.slug_exists(&slug).await? {
            return Err(TenantError::SlugTaken(slug));
        }
        if let Some(domain) = &domain {
            if self.domain_exists(domain).await? {
                return Err(TenantError::DomainTaken(domain.clone()));
            }
        }

        let template_db = new
            .template
            .as_deref()
            .map(|t| format!("template_{}", t));
        self.database
            .create_database(&database, template_db.as_deref())
            .await?;

        let registered = match self.prepare_database(&database, template_db.is_none()).await {
            Ok(()) => self.register(&new.id, &slug, domain.as_deref(), &new.data).await,
            Err(e) => Err(e),
        };

        let tenant = match registered {
            Ok(tenant) => tenant,
            Err(e) => {
                warn!(tenant = %new.id, database = %database, error = %e, "Provisioning failed, dropping database");
                if let Err(cleanup) = self.database.drop_database(&database).await {
                    error!(database = %database, error = %cleanup, "Failed to drop database after provisioning error");
                }
                return Err(e);
            }
        };

        info!(tenant = %tenant.id, database = %database, domain = ?domain, "Provisioned tenant");
        Ok(tenant)
    }

    async fn prepare_database(&self, database: &str, create_schema: bool) -> Result<(), TenantError> {
        if !create_schema {
            return Ok(());
        }
        let pool = self.database.database_pool(database)?;
        let result = schema::ensure_tenant_schema(&pool).await;
        pool.close().await;
        Ok(result?)
    }

    async fn register(
        &self,
        id: &str,
        slug: &str,
        domain: Option<&str>,
        data: &Value,
    ) -> Result<Tenant, TenantError> {
        let mut tx = self.central.begin().await?;
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            INSERT INTO tenants (id, slug, status, data)
            VALUES ($1, $2, 'active', $3)
            RETURNING id, slug, status, data, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(slug)
        .bind(data)
        .fetch_one(&mut *tx)
        .await?;

        if let Some(domain) = domain {
            sqlx::query("INSERT INTO domains (domain, tenant_id) VALUES ($1, $2)")
                .bind(domain)
                .bind(&tenant.id)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(tenant)
    }

    /// Bind another host to an existing tenant
    pub async fn add_domain(&self, tenant_id: &str, domain: &str) -> Result<Domain, TenantError> {
        let domain = normalize_domain(domain)?;
        if !self.tenant_exists(tenant_id).await? {
            return Err(TenantError::NotFound(tenant_id.to_string()));
        }
        if self.domain_exists(&domain).await? {
            return Err(TenantError::DomainTaken(domain));
        }

        let row = sqlx::query_as::<_, Domain>(
            r#"
            INSERT INTO domains (domain, tenant_id)
            VALUES ($1, $2)
            RETURNING id, domain, tenant_id, created_at
            "#,
        )
        .bind(&domain)
        .bind(tenant_id)
        .fetch_one(&self.central)
        .await?;

        info!(tenant = %tenant_id, domain = %row.domain, "Registered domain");
        Ok(row)
    }

    /// Change a tenant's status. Servers read the status on every request,
    /// so a non-active tenant is refused from the next request on; their
    /// pools are closed through the root API, not here.
    pub async fn set_status(&self, tenant_id: &str, status: TenantStatus) -> Result<Tenant, TenantError> {
        let tenant = sqlx::query_as::<_, Tenant>(
            r#"
            UPDATE tenants SET status = $2, updated_at = NOW()
            WHERE id = $1
            RETURNING id, slug, status, data, created_at, updated_at
            "#,
        )
        .bind(tenant_id)
        .bind(status.as_str())
        .fetch_optional(&self.central)
        .await?
        .ok_or_else(|| TenantError::NotFound(tenant_id.to_string()))?;

        info!(tenant = %tenant_id, status = %status, "Updated tenant status");
        Ok(tenant)
    }

    async fn tenant_exists(&self, tenant_id: &str) -> Result<bool, TenantError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tenants WHERE id = $1")
            .bind(tenant_id)
            .fetch_one(&self.central)
            .await?;
        Ok(count.0 > 0)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool, TenantError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM tenants WHERE slug = $1")
            .bind(slug)
            .fetch_one(&self.central)
            .await?;
        Ok(count.0 > 0)
    }

    async fn domain_exists(&self, domain: &str) -> Result<bool, TenantError> {
        let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM domains WHERE domain = $1")
            .bind(domain)
            .fetch_one(&self.central)
            .await?;
        Ok(count.0 > 0)
    }
}

/// Validate tenant id follows rules
fn validate_tenant_id(id: &str) -> Result<(), TenantError> {
    if id.len() < 2 {
        return Err(TenantError::InvalidId("Tenant id must be at least 2 characters".to_string()));
    }
    if !DatabaseManager::is_valid_tenant_id(id) {
        return Err(TenantError::InvalidId(
            "Tenant id can only contain letters, numbers, hyphens, and underscores (max 48)".to_string(),
        ));
    }
    Ok(())
}

/// Slug to store: the explicit one, or the id. Same character rules as ids
/// since slugs appear as subdomain labels.
fn tenant_slug(new: &NewTenant) -> Result<String, TenantError> {
    let slug = new
        .slug
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(&new.id);
    if !DatabaseManager::is_valid_tenant_id(slug) {
        return Err(TenantError::InvalidSlug(slug.to_string()));
    }
    Ok(slug.to_string())
}

/// Domains are stored lowercase, without scheme or path
fn normalize_domain(domain: &str) -> Result<String, TenantError> {
    let normalized = domain.trim().trim_end_matches('.').to_ascii_lowercase();
    let valid = !normalized.is_empty()
        && normalized
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | ':' | '[' | ']'));
    if valid {
        Ok(normalized)
    } else {
        Err(TenantError::InvalidDomain(domain.to_string()))
    }
}
