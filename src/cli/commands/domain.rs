use clap::Subcommand;
use serde_json::json;

use crate::cli::utils::*;
use crate::cli::{connect, OutputFormat};
use crate::services::TenantService;
use crate::tenancy::{DomainRegistry, PgTenancyStore};

#[derive(Subcommand)]
pub enum DomainCommands {
    #[command(about = "List domains bound to a tenant")]
    List {
        #[arg(help = "Tenant ID")]
        tenant: String,
    },

    #[command(about = "Bind a host to a tenant")]
    Add {
        #[arg(help = "Tenant ID")]
        tenant: String,
        #[arg(help = "Host, optionally with port (e.g. acme.smarthousing.ng)")]
        domain: String,
    },
}

pub async fn handle(cmd: DomainCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (_, database) = connect()?;

    match cmd {
        DomainCommands::List { tenant } => {
            let store = PgTenancyStore::new(database.central_pool().await?);
            let domains = store.domains_for_tenant(&tenant).await?;

            if domains.is_empty() {
                return output_empty_collection(
                    &output_format,
                    "domains",
                    &format!("No domains bound to '{}'", tenant),
                );
            }

            match output_format {
                OutputFormat::Json => output_json(&json!({ "domains": domains }))?,
                OutputFormat::Text => {
                    for domain in &domains {
                        println!("{:<40} {}", domain.domain, domain.created_at.format("%Y-%m-%d %H:%M"));
                    }
                }
            }
            Ok(())
        }
        DomainCommands::Add { tenant, domain } => {
            let service = TenantService::new(database).await?;
            let row = service.add_domain(&tenant, &domain).await?;

            output_success(
                &output_format,
                &format!("Domain '{}' now resolves to '{}'", row.domain, row.tenant_id),
                Some(json!({ "domain": row })),
            )
        }
    }
}
