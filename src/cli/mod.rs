pub mod commands;
pub mod server;
pub mod utils;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::AppConfig;
use crate::database::{DatabaseManager, PoolSettings};

#[derive(Parser)]
#[command(name = "tenancy")]
#[command(about = "Tenancy CLI - manage cooperatives, domains and tenant resolution")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Create the central tenants and domains tables")]
    Init,

    #[command(about = "Tenant provisioning and lifecycle")]
    Tenant {
        #[command(subcommand)]
        cmd: commands::tenant::TenantCommands,
    },

    #[command(about = "Domain registry management")]
    Domain {
        #[command(subcommand)]
        cmd: commands::domain::DomainCommands,
    },

    #[command(about = "Show which tenant a request would resolve to")]
    Resolve(commands::resolve::ResolveArgs),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

/// Config from the environment; the CLI always needs a database URL
pub fn load_config() -> anyhow::Result<AppConfig> {
    let config = AppConfig::from_env();
    if config.database.url.is_none() {
        anyhow::bail!("DATABASE_URL is not set (put it in the environment or a .env file)");
    }
    Ok(config)
}

pub fn connect() -> anyhow::Result<(AppConfig, DatabaseManager)> {
    let config = load_config()?;
    let database = DatabaseManager::new(PoolSettings::from_config(
        &config.database,
        &config.tenancy.database_suffix,
    ));
    Ok((config, database))
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Init => commands::init::handle(output_format).await,
        Commands::Tenant { cmd } => commands::tenant::handle(cmd, output_format).await,
        Commands::Domain { cmd } => commands::domain::handle(cmd, output_format).await,
        Commands::Resolve(args) => commands::resolve::handle(args, output_format).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_resolve_flags() {
        let cli = Cli::parse_from([
            "tenancy",
            "--json",
            "resolve",
            "--host",
            "acme.localhost:3000",
            "--slug",
            "acme",
        ]);
        assert!(matches!(OutputFormat::from_cli(&cli), OutputFormat::Json));
        match cli.command {
            Commands::Resolve(args) => {
                assert_eq!(args.host.as_deref(), Some("acme.localhost:3000"));
                assert_eq!(args.slug.as_deref(), Some("acme"));
                assert_eq!(args.origin, None);
            }
            _ => panic!("expected resolve command"),
        }
    }

    #[test]
    fn parses_tenant_create() {
        let cli = Cli::parse_from([
            "tenancy",
            "tenant",
            "create",
            "acme",
            "--domain",
            "acme.smarthousing.ng",
        ]);
        match cli.command {
            Commands::Tenant {
                cmd: commands::tenant::TenantCommands::Create { id, domain, template, .. },
            } => {
                assert_eq!(id, "acme");
                assert_eq!(domain.as_deref(), Some("acme.smarthousing.ng"));
                assert!(template.is_none());
            }
            _ => panic!("expected tenant create"),
        }
    }
}
