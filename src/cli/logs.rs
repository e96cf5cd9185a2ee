use std::path::Path;

use tracing::debug;

use crate::api::gateway::AuthGateway;
use crate::api::response::{expect_ok, read_data};
use crate::cli::output::print_failure;
use crate::config::RuntimeConfig;
use crate::error::AppError;
use crate::models::project::ProjectConfiguration;
use crate::models::script::Script;
use crate::tail::{LogTailer, TailEnd, TailReport};

fn lookback(since_hours: f64) -> Result<chrono::Duration, AppError> {
    if !since_hours.is_finite() || since_hours <= 0.0 {
        return Err(AppError::InvalidInput(
            "--since must be a positive number of hours".into(),
        ));
    }
    Ok(chrono::Duration::seconds((since_hours * 3600.0).round() as i64))
}

/// Print and follow the logs of the project in `dir`. Returns `None` when the
/// project was never published.
pub async fn follow<W: std::io::Write>(
    tailer: &LogTailer<'_>,
    gateway: &AuthGateway,
    dir: &Path,
    out: &mut W,
) -> Result<Option<TailReport>, AppError> {
    let configuration = ProjectConfiguration::read(dir)?;
    let Some(id) = configuration.id.clone() else {
        return Ok(None);
    };

    let response = expect_ok(
        gateway.get_script(&id, true).await?,
        "Error obtaining info of script.",
    )
    .await?;
    let script: Script = read_data(response).await?;

    let report = tailer.run(&script, out).await?;
    debug!(
        "Tailing ended: {:?} after {} polls, {} entries printed",
        report.end, report.polls, report.printed
    );
    if report.end == TailEnd::Unauthenticated {
        return Err(AppError::NotAuthenticated);
    }
    Ok(Some(report))
}

pub async fn handle(since_hours: f64, config: &RuntimeConfig) -> Result<(), AppError> {
    let gateway = AuthGateway::from_store(config.store())?;
    let tailer = LogTailer::new(&gateway).with_lookback(lookback(since_hours)?);
    let dir = std::env::current_dir()?;
    let mut stdout = std::io::stdout();

    let followed = tokio::select! {
        biased;
        _ = tokio::signal::ctrl_c() => return Err(AppError::Interrupted),
        followed = follow(&tailer, &gateway, &dir, &mut stdout) => followed?,
    };

    if followed.is_none() {
        print_failure("Script NOT PUBLISHED");
    }
    Ok(())
}
