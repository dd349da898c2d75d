use clap::Subcommand;
use serde_json::json;

use crate::cli::server::{ServerClient, SERVER_URL_ENV};
use crate::cli::utils::*;
use crate::cli::{connect, OutputFormat};
use crate::config::AppConfig;
use crate::database::models::TenantStatus;
use crate::database::DatabaseManager;
use crate::services::{NewTenant, TenantService};
use crate::tenancy::{DomainRegistry, PgTenancyStore, TenantDirectory};

#[derive(Subcommand)]
pub enum TenantCommands {
    #[command(about = "List all tenants")]
    List,

    #[command(about = "Show tenant details and domains")]
    Show {
        #[arg(help = "Tenant ID")]
        id: String,
    },

    #[command(about = "Provision a new tenant and its database")]
    Create {
        #[arg(help = "Tenant ID (also the database prefix)")]
        id: String,
        #[arg(long, help = "Slug, defaults to the ID")]
        slug: Option<String>,
        #[arg(long, help = "Primary domain to register")]
        domain: Option<String>,
        #[arg(long, help = "Clone the database from template_<NAME>")]
        template: Option<String>,
    },

    #[command(about = "Suspend a tenant; servers refuse its requests from then on")]
    Suspend {
        #[arg(help = "Tenant ID")]
        id: String,
    },

    #[command(about = "Reactivate a tenant")]
    Activate {
        #[arg(help = "Tenant ID")]
        id: String,
    },

    #[command(about = "Cancel a tenant; servers refuse its requests from then on")]
    Cancel {
        #[arg(help = "Tenant ID")]
        id: String,
    },
}

pub async fn handle(cmd: TenantCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let (config, database) = connect()?;

    match cmd {
        TenantCommands::List => {
            let store = PgTenancyStore::new(database.central_pool().await?);
            let tenants = store.list().await?;

            if tenants.is_empty() {
                return output_empty_collection(&output_format, "tenants", "No tenants registered");
            }

            match output_format {
                OutputFormat::Json => output_json(&json!({ "tenants": tenants }))?,
                OutputFormat::Text => {
                    println!("{:<20} {:<20} {:<10} {:<30} {}", "ID", "SLUG", "STATUS", "DATABASE", "CREATED");
                    println!("{}", "-".repeat(100));
                    for tenant in &tenants {
                        let db = database.tenant_database_name(&tenant.id).unwrap_or_else(|_| "-".to_string());
                        println!(
                            "{:<20} {:<20} {:<10} {:<30} {}",
                            tenant.id,
                            tenant.slug,
                            tenant.status,
                            db,
                            tenant.created_at.format("%Y-%m-%d %H:%M")
                        );
                    }
                }
            }
            Ok(())
        }
        TenantCommands::Show { id } => {
            let store = PgTenancyStore::new(database.central_pool().await?);
            let tenant = store
                .find(&id)
                .await?
                .ok_or_else(|| anyhow::anyhow!("Tenant '{}' not found", id))?;
            let domains = store.domains_for_tenant(&id).await?;
            let db = database.tenant_database_name(&tenant.id)?;

            match output_format {
                OutputFormat::Json => output_json(&json!({
                    "tenant": tenant,
                    "database": db,
                    "domains": domains,
                }))?,
                OutputFormat::Text => {
                    println!("Tenant:   {}", tenant.id);
                    println!("Slug:     {}", tenant.slug);
                    println!("Status:   {}", tenant.status);
                    println!("Database: {}", db);
                    println!("Created:  {}", tenant.created_at.format("%Y-%m-%d %H:%M"));
                    for domain in &domains {
                        println!("Domain:   {}", domain.domain);
                    }
                }
            }
            Ok(())
        }
        TenantCommands::Create { id, slug, domain, template } => {
            let service = TenantService::new(database.clone()).await?;
            let tenant = service
                .create_tenant(NewTenant {
                    id,
                    slug,
                    domain,
                    template,
                    data: json!({}),
                })
                .await?;

            output_success(
                &output_format,
                &format!(
                    "Tenant '{}' provisioned with database '{}_{}'",
                    tenant.id, tenant.id, config.tenancy.database_suffix
                ),
                Some(json!({ "tenant": tenant })),
            )
        }
        TenantCommands::Suspend { id } => {
            set_status(&config, &database, &id, TenantStatus::Suspended, &output_format).await
        }
        TenantCommands::Activate { id } => {
            set_status(&config, &database, &id, TenantStatus::Active, &output_format).await
        }
        TenantCommands::Cancel { id } => {
            set_status(&config, &database, &id, TenantStatus::Cancelled, &output_format).await
        }
    }
}

async fn set_status(
    config: &AppConfig,
    database: &DatabaseManager,
    id: &str,
    status: TenantStatus,
    output_format: &OutputFormat,
) -> anyhow::Result<()> {
    let service = TenantService::new(database.clone()).await?;
    let tenant = service.set_status(id, status).await?;

    // Idle connections live in the server process; ask it to drop them
    let connections_closed = match (status, ServerClient::from_env(config)) {
        (TenantStatus::Active, _) => None,
        (_, Some(server)) => match server.purge_connections(&tenant.id).await {
            Ok(purged) => Some(purged),
            Err(e) => {
                tracing::warn!(tenant = %tenant.id, error = %e, "Could not close server connections");
                None
            }
        },
        (_, None) => {
            tracing::warn!(
                tenant = %tenant.id,
                "{} not set; server pools close on the next DELETE /api/root/tenant/{}/connections",
                SERVER_URL_ENV,
                tenant.id
            );
            None
        }
    };

    output_success(
        output_format,
        &format!("Tenant '{}' is now {}", tenant.id, tenant.status),
        Some(json!({ "tenant": tenant, "connections_closed": connections_closed })),
    )
}
