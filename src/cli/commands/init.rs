use crate::cli::utils::output_success;
use crate::cli::{connect, OutputFormat};
use crate::database::schema;

/// Create the central tenants/domains tables if they are missing
pub async fn handle(output_format: OutputFormat) -> anyhow::Result<()> {
    let (config, database) = connect()?;
    let pool = database.central_pool().await?;

    schema::ensure_central_schema(&pool).await?;

    output_success(
        &output_format,
        &format!("Central schema ready in '{}'", config.database.central_database),
        None,
    )
}
