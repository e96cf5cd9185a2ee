use std::path::Path;

use tabled::Tabled;

use crate::api::gateway::AuthGateway;
use crate::api::response::{expect_ok, read_data};
use crate::cli::output::print_table;
use crate::config::RuntimeConfig;
use crate::error::AppError;
use crate::models::project::ProjectConfiguration;
use crate::models::script::Script;

#[derive(Debug, Tabled)]
pub struct InfoRow {
    #[tabled(rename = "FIELD")]
    pub field: &'static str,
    #[tabled(rename = "VALUE")]
    pub value: String,
}

fn row(field: &'static str, value: impl Into<String>) -> InfoRow {
    InfoRow {
        field,
        value: value.into(),
    }
}

/// Rows describing the project in `dir`, fetching its remote state when published.
pub async fn project_info(gateway: &AuthGateway, dir: &Path) -> Result<Vec<InfoRow>, AppError> {
    let configuration = ProjectConfiguration::read(dir)?;

    let Some(id) = configuration.id.clone() else {
        return Ok(vec![
            row("Name", configuration.name.unwrap_or_default()),
            row("Status", "NOT PUBLISHED"),
        ]);
    };

    let response = expect_ok(
        gateway.get_script(&id, false).await?,
        "Error obtaining info of script.",
    )
    .await?;
    let script: Script = read_data(response).await?;
    let run_url = gateway.url(&format!("/api/v1/script/{}/run?params", script.name))?;

    Ok(vec![
        row("Id", script.id),
        row("Name", script.name),
        row("Slug", script.slug),
        row("Status", script.status.to_string()),
        row("CreatedAt", script.created_at.unwrap_or_default()),
        row("Run script", run_url),
    ])
}

pub async fn handle(config: &RuntimeConfig) -> Result<(), AppError> {
    let gateway = AuthGateway::from_store(config.store())?;
    let dir = std::env::current_dir()?;
    let rows = project_info(&gateway, &dir).await?;
    print_table(&rows);
    Ok(())
}
