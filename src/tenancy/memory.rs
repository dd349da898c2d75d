use async_trait::async_trait;
use chrono::Utc;
use std::sync::RwLock;

use super::store::{DomainRegistry, StoreError, TenantDirectory};
use crate::database::models::{Domain, Tenant};

/// In-process registry and directory, used by tests and local tooling
#[derive(Default)]
pub struct MemoryTenancyStore {
    tenants: RwLock<Vec<Tenant>>,
    domains: RwLock<Vec<Domain>>,
}

impl MemoryTenancyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_tenant(&self, tenant: Tenant) {
        let mut tenants = self.tenants.write().unwrap_or_else(|e| e.into_inner());
        tenants.retain(|t| t.id != tenant.id);
        tenants.push(tenant);
    }

    pub fn insert_domain(&self, domain: &str, tenant_id: &str) {
        let mut domains = self.domains.write().unwrap_or_else(|e| e.into_inner());
        let id = domains.iter().map(|d| d.id).max().unwrap_or(0) + 1;
        domains.retain(|d| d.domain != domain);
        domains.push(Domain {
            id,
            domain: domain.to_ascii_lowercase(),
            tenant_id: tenant_id.to_string(),
            created_at: Utc::now(),
        });
    }

    fn tenants(&self) -> Vec<Tenant> {
        self.tenants.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn domains(&self) -> Vec<Domain> {
        self.domains.read().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl DomainRegistry for MemoryTenancyStore {
    async fn find_by_domain(&self, domain: &str) -> Result<Option<Domain>, StoreError> {
        Ok(self.domains().into_iter().find(|d| d.domain == domain))
    }

    async fn find_by_label_prefix(&self, label: &str) -> Result<Option<Domain>, StoreError> {
        let dotted = format!("{}.", label);
        Ok(self
            .domains()
            .into_iter()
            .filter(|d| d.domain.starts_with(label))
            .min_by_key(|d| (!d.domain.starts_with(&dotted), d.domain.len(), d.id)))
    }

    async fn domains_for_tenant(&self, tenant_id: &str) -> Result<Vec<Domain>, StoreError> {
        let mut domains: Vec<Domain> = self
            .domains()
            .into_iter()
            .filter(|d| d.tenant_id == tenant_id)
            .collect();
        domains.sort_by(|a, b| a.domain.cmp(&b.domain));
        Ok(domains)
    }
}

#[async_trait]
impl TenantDirectory for MemoryTenancyStore {
    async fn find(&self, tenant_id: &str) -> Result<Option<Tenant>, StoreError> {
        Ok(self.tenants().into_iter().find(|t| t.id == tenant_id))
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tenant>, StoreError> {
        Ok(self.tenants().into_iter().find(|t| t.slug == slug))
    }

    async fn oldest_active(&self) -> Result<Option<Tenant>, StoreError> {
        Ok(self
            .tenants()
            .into_iter()
            .filter(Tenant::is_active)
            .min_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id))))
    }

    async fn list(&self) -> Result<Vec<Tenant>, StoreError> {
        let mut tenants = self.tenants();
        tenants.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(tenants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn prefix_lookup_prefers_dotted_then_shortest() {
        let store = MemoryTenancyStore::new();
        store.insert_domain("acmehomes.example.ng", "other");
        store.insert_domain("acme.smarthousing.ng", "acme");
        store.insert_domain("acme.ng", "acme-short");

        let found = store.find_by_label_prefix("acme").await.unwrap().unwrap();
        assert_eq!(found.tenant_id, "acme-short");

        assert!(store.find_by_label_prefix("zenith").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn reinserting_a_domain_rebinds_it() {
        let store = MemoryTenancyStore::new();
        store.insert_domain("coop.example.ng", "acme");
        store.insert_domain("coop.example.ng", "zenith");

        let found = store.find_by_domain("coop.example.ng").await.unwrap().unwrap();
        assert_eq!(found.tenant_id, "zenith");
    }
}
