use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub environment: Environment,
    pub database: DatabaseConfig,
    pub tenancy: TenancyConfig,
    pub api: ApiConfig,
    pub security: SecurityConfig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Environment {
    Local,
    Development,
    Testing,
    Staging,
    Production,
}

impl Environment {
    /// Unknown names fall back to `Production` so a typo never enables
    /// slug overrides or diagnostic bodies.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "testing" | "test" => Environment::Testing,
            "local" => Environment::Local,
            "staging" | "stage" => Environment::Staging,
            _ => Environment::Production,
        }
    }

    /// Environments where slug overrides and diagnostic bodies are allowed
    pub fn is_development(&self) -> bool {
        matches!(
            self,
            Environment::Local | Environment::Development | Environment::Testing
        )
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Base connection URL; the path is swapped per database
    pub url: Option<String>,
    pub central_database: String,
    pub max_connections: u32,
    pub acquire_timeout_ms: u64,
    pub verify_on_bind: bool,
}

impl DatabaseConfig {
    pub fn acquire_timeout(&self) -> Duration {
        Duration::from_millis(self.acquire_timeout_ms)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenancyConfig {
    pub database_suffix: String,
    pub allow_slug_overrides: bool,
    pub fallback_to_oldest_tenant: bool,
    pub local_hosts: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub port: u16,
    pub enable_request_logging: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SecurityConfig {
    pub cors_origins: Vec<String>,
    pub root_api_token: Option<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        // Unset means production; development has to be asked for
        let environment = env::var("APP_ENV")
            .map(|v| Environment::parse(&v))
            .unwrap_or(Environment::Production);

        Self::for_environment(environment).with_env_overrides()
    }

    /// Defaults for an environment, without reading any env vars
    pub fn for_environment(environment: Environment) -> Self {
        match environment {
            Environment::Production => Self::production(),
            Environment::Staging => Self::staging(),
            other => Self {
                environment: other,
                ..Self::development()
            },
        }
    }

    fn with_env_overrides(mut self) -> Self {
        // Database overrides
        if let Ok(v) = env::var("DATABASE_URL") {
            self.database.url = Some(v);
        }
        if let Ok(v) = env::var("CENTRAL_DATABASE") {
            self.database.central_database = v;
        }
        if let Ok(v) = env::var("DATABASE_MAX_CONNECTIONS") {
            self.database.max_connections = v.parse().unwrap_or(self.database.max_connections);
        }
        if let Ok(v) = env::var("DATABASE_ACQUIRE_TIMEOUT_MS") {
            self.database.acquire_timeout_ms = v.parse().unwrap_or(self.database.acquire_timeout_ms);
        }
        if let Ok(v) = env::var("DATABASE_VERIFY_ON_BIND") {
            self.database.verify_on_bind = v.parse().unwrap_or(self.database.verify_on_bind);
        }

        // Tenancy overrides
        if let Ok(v) = env::var("TENANCY_DATABASE_SUFFIX") {
            self.tenancy.database_suffix = v;
        }
        if let Ok(v) = env::var("TENANCY_ALLOW_SLUG_OVERRIDES") {
            self.tenancy.allow_slug_overrides = v.parse().unwrap_or(self.tenancy.allow_slug_overrides);
        }
        if let Ok(v) = env::var("TENANCY_FALLBACK_TO_OLDEST") {
            self.tenancy.fallback_to_oldest_tenant =
                v.parse().unwrap_or(self.tenancy.fallback_to_oldest_tenant);
        }
        if let Ok(v) = env::var("TENANCY_LOCAL_HOSTS") {
            self.tenancy.local_hosts = split_list(&v);
        }

        // API overrides
        if let Some(port) = env::var("PORT").ok().and_then(|v| v.parse().ok()) {
            self.api.port = port;
        }
        if let Ok(v) = env::var("API_ENABLE_REQUEST_LOGGING") {
            self.api.enable_request_logging = v.parse().unwrap_or(self.api.enable_request_logging);
        }

        // Security overrides
        if let Ok(v) = env::var("SECURITY_CORS_ORIGINS") {
            self.security.cors_origins = split_list(&v);
        }
        if let Ok(v) = env::var("ROOT_API_TOKEN") {
            if !v.trim().is_empty() {
                self.security.root_api_token = Some(v);
            }
        }

        self
    }

    fn development() -> Self {
        Self {
            environment: Environment::Development,
            database: DatabaseConfig {
                url: None,
                central_database: "smart_housing".to_string(),
                max_connections: 10,
                acquire_timeout_ms: 30_000,
                verify_on_bind: true,
            },
            tenancy: TenancyConfig {
                database_suffix: "smart_housing".to_string(),
                allow_slug_overrides: true,
                fallback_to_oldest_tenant: true,
                local_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: true,
            },
            security: SecurityConfig {
                cors_origins: vec![
                    "http://localhost:3000".to_string(),
                    "http://localhost:5173".to_string(),
                ],
                root_api_token: None,
            },
        }
    }

    fn staging() -> Self {
        let mut config = Self::production();
        config.environment = Environment::Staging;
        config.database.max_connections = 20;
        config.database.acquire_timeout_ms = 10_000;
        config.api.enable_request_logging = true;
        config.security.cors_origins = vec!["https://staging.smarthousing.ng".to_string()];
        config
    }

    fn production() -> Self {
        Self {
            environment: Environment::Production,
            database: DatabaseConfig {
                url: None,
                central_database: "smart_housing".to_string(),
                max_connections: 50,
                acquire_timeout_ms: 5_000,
                verify_on_bind: true,
            },
            tenancy: TenancyConfig {
                database_suffix: "smart_housing".to_string(),
                allow_slug_overrides: false,
                fallback_to_oldest_tenant: false,
                local_hosts: vec!["localhost".to_string(), "127.0.0.1".to_string()],
            },
            api: ApiConfig {
                port: 3000,
                enable_request_logging: false,
            },
            security: SecurityConfig {
                cors_origins: vec!["https://app.smarthousing.ng".to_string()],
                root_api_token: None,
            },
        }
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

// Global singleton config - initialized once at startup
pub static CONFIG: Lazy<AppConfig> = Lazy::new(AppConfig::from_env);

// Convenience function for accessing config
pub fn config() -> &'static AppConfig {
    &CONFIG
}
