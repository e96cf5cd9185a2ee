pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod docker;
pub mod error;
pub mod models;
pub mod package;
pub mod tail;

use tracing_subscriber::EnvFilter;

use cli::output::print_error;
use config::{default_config_path, RuntimeConfig};
use error::AppError;

/// Install the stderr log subscriber. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default_level = if verbose { "trends=debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

pub async fn run(cli_args: cli::Cli) -> i32 {
    let config = RuntimeConfig {
        verbose: cli_args.verbose,
        config_path: cli_args.config_file.unwrap_or_else(default_config_path),
    };

    let result = dispatch(cli_args.command, &config).await;

    match result {
        Ok(()) => 0,
        Err(err) => {
            tracing::debug!("{} error: {:?}", err.error_type(), err);
            print_error(&err);
            err.exit_code()
        }
    }
}

async fn dispatch(command: cli::Commands, config: &RuntimeConfig) -> Result<(), AppError> {
    match command {
        cli::Commands::Login => cli::auth::handle_login(config).await,
        cli::Commands::Logout { all } => cli::auth::handle_logout(all, config).await,
        cli::Commands::Config { action, key, value } => {
            cli::config::handle(action, &key, value.as_deref(), config)
        }
        cli::Commands::Info => cli::info::handle(config).await,
        cli::Commands::Logs { since } => cli::logs::handle(since, config).await,
        cli::Commands::Publish { public, overwrite } => {
            cli::publish::handle(cli::publish::PublishOptions { public, overwrite }, config).await
        }
        cli::Commands::Start { param, payload } => {
            cli::start::handle(&param, payload, config).await
        }
        cli::Commands::Clear => cli::clear::handle(config).await,
        cli::Commands::Create { name } => cli::create::handle(&name, config),
    }
}
