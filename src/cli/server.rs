use std::time::Duration;

use anyhow::Context;
use reqwest::StatusCode;

use crate::config::AppConfig;

pub const SERVER_URL_ENV: &str = "TENANCY_SERVER_URL";

/// Root API of a running tenancy server, used for actions that only the
/// server process can perform (its pools live in its own memory)
#[derive(Debug, Clone)]
pub struct ServerClient {
    base_url: String,
    token: String,
}

impl ServerClient {
    /// Needs both `TENANCY_SERVER_URL` and `ROOT_API_TOKEN`
    pub fn from_env(config: &AppConfig) -> Option<Self> {
        let base_url = std::env::var(SERVER_URL_ENV).ok()?;
        Self::new(&base_url, config.security.root_api_token.as_deref()?)
    }

    pub fn new(base_url: &str, token: &str) -> Option<Self> {
        let base_url = base_url.trim().trim_end_matches('/');
        if base_url.is_empty() || token.trim().is_empty() {
            return None;
        }
        Some(Self {
            base_url: base_url.to_string(),
            token: token.trim().to_string(),
        })
    }

    pub fn purge_url(&self, tenant_id: &str) -> String {
        format!("{}/api/root/tenant/{}/connections", self.base_url, tenant_id)
    }

    /// Ask the server to close the tenant's pool. `Ok(false)` when the server
    /// had no pool open for it.
    pub async fn purge_connections(&self, tenant_id: &str) -> anyhow::Result<bool> {
        let url = self.purge_url(tenant_id);
        let response = reqwest::Client::new()
            .delete(&url)
            .bearer_auth(&self.token)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .with_context(|| format!("failed to reach {}", url))?;

        let status = response.status();
        if status != StatusCode::OK {
            anyhow::bail!("server answered {} for {}", status, url);
        }

        let body: serde_json::Value = response.json().await?;
        Ok(body["data"]["purged"].as_bool().unwrap_or(false))
    }
}
