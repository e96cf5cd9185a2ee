use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::output::print_success;
use crate::config::{RuntimeConfig, KEY_EE_SERVICE_ACCOUNT, KEY_ROLLBAR_TOKEN};
use crate::docker;
use crate::error::AppError;
use crate::models::project::{ProjectConfiguration, REQUIREMENTS_FILE, SRC_DIR};

fn copy_dir_all(from: &Path, to: &Path) -> std::io::Result<()> {
    fs::create_dir_all(to)?;
    for entry in fs::read_dir(from)? {
        let entry = entry?;
        let target = to.join(entry.file_name());
        if entry.file_type()?.is_dir() {
            copy_dir_all(&entry.path(), &target)?;
        } else {
            fs::copy(entry.path(), &target)?;
        }
    }
    Ok(())
}

/// Lay out a docker build context for the project in `project_dir` inside `context`.
pub fn prepare_context(project_dir: &Path, context: &Path) -> Result<(), AppError> {
    debug!("Copying Dockerfile ...");
    fs::write(context.join("Dockerfile"), docker::DOCKERFILE)?;

    debug!("Copying src folder ...");
    copy_dir_all(&project_dir.join(SRC_DIR), &context.join(SRC_DIR))
        .map_err(|_| AppError::NotAProject)?;

    debug!("Copying requirements ...");
    fs::copy(
        project_dir.join(REQUIREMENTS_FILE),
        context.join(REQUIREMENTS_FILE),
    )
    .map_err(|_| AppError::NotAProject)?;
    Ok(())
}

async fn build_and_run(
    project_dir: &Path,
    param: &str,
    payload: Option<&Path>,
    config: &RuntimeConfig,
) -> Result<(), AppError> {
    let configuration = ProjectConfiguration::read(project_dir)?;
    let encoded = docker::encode_params(param, payload)?;

    let context = tempfile::tempdir()?;
    prepare_context(project_dir, context.path())?;

    let tag = docker::local_tag();
    debug!("Building {} ...", tag);
    docker::build(
        context.path(),
        &tag,
        configuration.environment(),
        configuration.environment_version(),
    )
    .await?;

    let store = config.store();
    debug!("Running script....");
    docker::run(
        &tag,
        &store.get(KEY_EE_SERVICE_ACCOUNT)?,
        &store.get(KEY_ROLLBAR_TOKEN)?,
        &encoded,
    )
    .await
}

pub async fn handle(
    param: &str,
    payload: Option<PathBuf>,
    config: &RuntimeConfig,
) -> Result<(), AppError> {
    let dir = std::env::current_dir()?;

    tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => return Err(AppError::Interrupted),
        result = build_and_run(&dir, param, payload.as_deref(), config) => result?,
    }

    print_success("Script finished.");
    Ok(())
}
