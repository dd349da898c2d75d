use clap::Args;
use serde_json::json;

use crate::app::AppState;
use crate::cli::utils::output_json;
use crate::cli::{load_config, OutputFormat};
use crate::tenancy::{RequestSignals, Resolution};

/// Request signals to test against the live registry
#[derive(Args, Debug)]
pub struct ResolveArgs {
    #[arg(long, help = "Host header value, e.g. acme.localhost:3000")]
    pub host: Option<String>,
    #[arg(long, help = "Origin header value")]
    pub origin: Option<String>,
    #[arg(long, help = "X-Forwarded-Host header value")]
    pub forwarded_host: Option<String>,
    #[arg(long, help = "X-Tenant-Slug header value (development only)")]
    pub slug: Option<String>,
}

/// Dry-run tenant resolution without binding a database
pub async fn handle(args: ResolveArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let config = load_config()?;
    let environment = config.environment;
    let state = AppState::connect(config).await?;
    let database = &state.database;

    let signals = RequestSignals {
        forwarded_host: args.forwarded_host,
        origin: args.origin,
        host: args.host,
        tenant_slug_header: args.slug,
        ..Default::default()
    };

    let resolution = state.resolver.lookup(&signals).await?;
    let outcome = state.resolver.resolve(&signals).await;

    match output_format {
        OutputFormat::Json => {
            let body = match &outcome {
                Ok(resolved) => json!({
                    "candidate_host": signals.candidate_host(),
                    "resolution": resolution,
                    "tenant": resolved.tenant,
                    "database": database.tenant_database_name(&resolved.tenant.id)?,
                }),
                Err(e) => json!({
                    "candidate_host": signals.candidate_host(),
                    "resolution": resolution,
                    "error": e.to_api_error().to_json(),
                    "debug": e.debug_details(),
                }),
            };
            output_json(&body)?;
        }
        OutputFormat::Text => {
            println!("Environment: {:?}", environment);
            println!("Host:        {}", signals.candidate_host().unwrap_or_else(|| "-".to_string()));
            match &resolution {
                Resolution::Domain(domain) => println!("Matched:     domain '{}'", domain.domain),
                Resolution::Slug { tenant_id, source } => {
                    println!("Matched:     slug '{}' via {:?}", tenant_id, source)
                }
                Resolution::NotFound(diagnostics) => {
                    println!("Matched:     nothing (tried {})", diagnostics.candidates.join(", "))
                }
            }
            match &outcome {
                Ok(resolved) => {
                    println!("Tenant:      {} ({})", resolved.tenant.id, resolved.tenant.status);
                    println!("Database:    {}", database.tenant_database_name(&resolved.tenant.id)?);
                }
                Err(e) => println!("Result:      {}", e),
            }
        }
    }

    Ok(())
}
