use crate::cli::output::print_success;
use crate::config::RuntimeConfig;
use crate::docker;
use crate::error::AppError;

pub async fn handle(_config: &RuntimeConfig) -> Result<(), AppError> {
    let removed = docker::clear_local().await;
    print_success(&format!("Cleaned up! Removed {} local docker artifacts.", removed));
    Ok(())
}
