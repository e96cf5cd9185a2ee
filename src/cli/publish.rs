use std::path::Path;

use dialoguer::Confirm;
use serde::Deserialize;
use tracing::debug;

use crate::api::gateway::AuthGateway;
use crate::api::response::{expect_ok, read_data};
use crate::cli::output::print_success;
use crate::config::RuntimeConfig;
use crate::error::AppError;
use crate::models::project::ProjectConfiguration;
use crate::package::Tarball;

#[derive(Debug, Deserialize)]
struct PublishedScript {
    id: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct PublishOptions {
    pub public: bool,
    pub overwrite: bool,
}

fn confirm_overwrite() -> Result<bool, AppError> {
    Confirm::new()
        .with_prompt("With this action you will overwrite this script. Are you sure?")
        .default(true)
        .interact()
        .map_err(|e| AppError::InvalidInput(e.to_string()))
}

/// Fails with `Cancelled` when an already published script would be replaced
/// and the user does not confirm.
fn check_overwrite(
    published: bool,
    options: PublishOptions,
    confirm: impl FnOnce() -> Result<bool, AppError>,
) -> Result<(), AppError> {
    if published && !options.overwrite && !confirm()? {
        return Err(AppError::Cancelled("Publish cancelled.".into()));
    }
    Ok(())
}

/// Package and upload the project in `dir`, recording the returned id in its
/// configuration.
pub async fn publish(
    gateway: &AuthGateway,
    dir: &Path,
    options: PublishOptions,
) -> Result<String, AppError> {
    let mut configuration = ProjectConfiguration::read(dir)?;
    let name = configuration
        .name
        .clone()
        .ok_or_else(|| AppError::InvalidInput("Name required in configuration file".into()))?;

    check_overwrite(configuration.id.is_some(), options, confirm_overwrite)?;

    let tarball = Tarball::create(dir, &name)?;
    debug!("Doing request with file {}", tarball.path().display());
    let bytes = tarball.read()?;

    let response = gateway
        .upload_script(configuration.id.as_deref(), &tarball.file_name(), &bytes)
        .await?;
    let response = expect_ok(response, "Error publishing script.").await?;
    let published: PublishedScript = read_data(response).await?;

    configuration.id = Some(published.id.clone());
    configuration.write(dir)?;

    if options.public {
        let response = gateway.publish_script(&published.id).await?;
        expect_ok(response, "Error making the script public.").await?;
    }

    Ok(published.id)
}

pub async fn handle(options: PublishOptions, config: &RuntimeConfig) -> Result<(), AppError> {
    let gateway = AuthGateway::from_store(config.store())?;
    let dir = std::env::current_dir()?;

    let id = publish(&gateway, &dir, options).await?;
    print_success(&format!("Script published with id {}", id));
    Ok(())
}
