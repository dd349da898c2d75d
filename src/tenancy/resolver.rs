use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, error, warn};

use super::error::{Diagnostics, TenancyError};
use super::host;
use super::signals::{RequestSignals, SlugSource};
use super::store::{DomainRegistry, TenantDirectory};
use crate::config::{AppConfig, Environment};
use crate::database::models::{Domain, Tenant, TenantStatus};

/// How a request was matched to a tenant
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// A row in the domain registry
    Domain(Domain),
    /// A slug taken from the subdomain or a development override
    Slug { tenant_id: String, source: SlugSource },
    NotFound(Box<Diagnostics>),
}

impl Resolution {
    pub fn tenant_id(&self) -> Option<&str> {
        match self {
            Resolution::Domain(domain) => Some(&domain.tenant_id),
            Resolution::Slug { tenant_id, .. } => Some(tenant_id),
            Resolution::NotFound(_) => None,
        }
    }
}

/// A tenant loaded from the directory plus the way it was matched
#[derive(Debug, Clone)]
pub struct ResolvedTenant {
    pub tenant: Tenant,
    pub resolution: Resolution,
}

#[derive(Debug, Clone)]
pub struct ResolverSettings {
    pub environment: Environment,
    pub allow_slug_overrides: bool,
    pub fallback_to_oldest_tenant: bool,
    pub local_hosts: Vec<String>,
}

impl ResolverSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            environment: config.environment,
            allow_slug_overrides: config.tenancy.allow_slug_overrides,
            fallback_to_oldest_tenant: config.tenancy.fallback_to_oldest_tenant,
            local_hosts: config.tenancy.local_hosts.clone(),
        }
    }

    /// Slug overrides are never honored outside development environments
    fn overrides_enabled(&self) -> bool {
        self.environment.is_development() && self.allow_slug_overrides
    }
}

/// Maps request signals to a tenant: registry first, then local
/// subdomains, then development overrides.
pub struct TenantResolver {
    domains: Arc<dyn DomainRegistry>,
    directory: Arc<dyn TenantDirectory>,
    settings: ResolverSettings,
}

impl TenantResolver {
    pub fn new(
        domains: Arc<dyn DomainRegistry>,
        directory: Arc<dyn TenantDirectory>,
        settings: ResolverSettings,
    ) -> Self {
        Self {
            domains,
            directory,
            settings,
        }
    }

    /// Run the full chain and load the matched tenant
    pub async fn resolve(&self, signals: &RequestSignals) -> Result<ResolvedTenant, TenancyError> {
        let resolution = self.lookup(signals).await?;

        let tenant_id = match &resolution {
            Resolution::NotFound(diagnostics) => {
                warn!(
                    host = ?diagnostics.host,
                    candidates = ?diagnostics.candidates,
                    slug = ?diagnostics.tenant_slug_provided,
                    "Tenant not found"
                );
                return Err(TenancyError::TenantNotFound(diagnostics.clone()));
            }
            other => other.tenant_id().unwrap_or_default().to_string(),
        };

        let tenant = match self.directory.find(&tenant_id).await? {
            Some(tenant) => tenant,
            None => {
                let host = signals.candidate_host();
                error!(tenant = %tenant_id, host = ?host, "Domain points at a tenant missing from the directory");
                return Err(TenancyError::TenantRecordMissing { tenant_id, host });
            }
        };

        if tenant.status != TenantStatus::Active {
            warn!(tenant = %tenant.id, status = %tenant.status, "Request for inactive tenant");
            return Err(TenancyError::TenantInactive {
                tenant_id: tenant.id,
                status: tenant.status,
            });
        }

        debug!(tenant = %tenant.id, resolution = ?resolution, "Resolved tenant");
        Ok(ResolvedTenant { tenant, resolution })
    }

    /// Steps up to the match; does not load or check the tenant record
    pub async fn lookup(&self, signals: &RequestSignals) -> Result<Resolution, TenancyError> {
        let host = signals.candidate_host();
        let mut candidates = Vec::new();

        if let Some(host) = host.as_deref() {
            let bare = host::strip_port(host);

            candidates.push(bare.to_string());
            if let Some(domain) = self.domains.find_by_domain(bare).await? {
                return Ok(Resolution::Domain(domain));
            }

            if bare != host {
                candidates.push(host.to_string());
                if let Some(domain) = self.domains.find_by_domain(host).await? {
                    return Ok(Resolution::Domain(domain));
                }
            }

            if host::is_local(bare, &self.settings.local_hosts) {
                if let Some(resolution) = self.lookup_local(bare, &mut candidates).await? {
                    return Ok(resolution);
                }
            }
        }

        let mut slug_provided = None;
        if self.settings.overrides_enabled() {
            if let Some((slug, source)) = signals.explicit_slug() {
                slug_provided = Some(slug.to_string());
                match self.directory.find_by_slug(slug).await? {
                    Some(tenant) if tenant.is_active() => {
                        debug!(slug, source = ?source, "Tenant selected by development override");
                        return Ok(Resolution::Slug {
                            tenant_id: tenant.id,
                            source,
                        });
                    }
                    _ => {}
                }
            } else if self.settings.fallback_to_oldest_tenant {
                if let Some(tenant) = self.directory.oldest_active().await? {
                    warn!(tenant = %tenant.id, "No tenant signal; falling back to oldest active tenant");
                    return Ok(Resolution::Slug {
                        tenant_id: tenant.id,
                        source: SlugSource::OldestActive,
                    });
                }
            }
        }

        Ok(Resolution::NotFound(Box::new(
            self.diagnostics(host, candidates, slug_provided).await?,
        )))
    }

    async fn lookup_local(
        &self,
        bare: &str,
        candidates: &mut Vec<String>,
    ) -> Result<Option<Resolution>, TenancyError> {
        let Some(label) = host::tenant_label(bare, &self.settings.local_hosts) else {
            return Ok(None);
        };

        if let Some(tenant) = self.directory.find_by_slug(label).await? {
            return Ok(Some(Resolution::Slug {
                tenant_id: tenant.id,
                source: SlugSource::Subdomain,
            }));
        }

        candidates.push(label.to_string());
        if let Some(domain) = self.domains.find_by_domain(label).await? {
            return Ok(Some(Resolution::Domain(domain)));
        }

        candidates.push(format!("{}*", label));
        if let Some(domain) = self.domains.find_by_label_prefix(label).await? {
            return Ok(Some(Resolution::Domain(domain)));
        }

        Ok(None)
    }

    async fn diagnostics(
        &self,
        host: Option<String>,
        candidates: Vec<String>,
        tenant_slug_provided: Option<String>,
    ) -> Result<Diagnostics, TenancyError> {
        // Only enumerate tenants where the list can reach a response body
        let available_tenants = if self.settings.environment.is_development() {
            self.directory
                .list()
                .await?
                .into_iter()
                .filter(Tenant::is_active)
                .map(|t| t.slug)
                .collect()
        } else {
            Vec::new()
        };

        let hint = match (&host, &tenant_slug_provided) {
            (_, Some(slug)) => format!("No active tenant has slug '{}'", slug),
            (Some(host), None) => format!(
                "Register '{}' in the domains table, or send an {} header in development",
                host::strip_port(host),
                super::signals::TENANT_SLUG_HEADER
            ),
            (None, None) => "Request carried no host information".to_string(),
        };

        Ok(Diagnostics {
            host,
            candidates,
            tenant_slug_provided,
            available_tenants,
            hint,
        })
    }
}
