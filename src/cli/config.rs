use clap::ValueEnum;

use crate::cli::output::print_success;
use crate::config::{ConfigStore, RuntimeConfig};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigAction {
    Set,
    Show,
    Unset,
}

/// Apply a settings action. `show` returns the value, the others `None`.
pub fn apply(
    store: &ConfigStore,
    action: ConfigAction,
    key: &str,
    value: Option<&str>,
) -> Result<Option<String>, AppError> {
    match action {
        ConfigAction::Set => {
            let value = value
                .ok_or_else(|| AppError::InvalidInput(format!("A value is required to set '{}'", key)))?;
            store.set(key, value)?;
            Ok(None)
        }
        ConfigAction::Show => Ok(Some(store.get(key)?)),
        ConfigAction::Unset => {
            store.unset(key)?;
            Ok(None)
        }
    }
}

pub fn handle(
    action: ConfigAction,
    key: &str,
    value: Option<&str>,
    config: &RuntimeConfig,
) -> Result<(), AppError> {
    match apply(&config.store(), action, key, value)? {
        Some(value) => println!("Value: {}", value),
        None => print_success(&format!("Updated {}", config.config_path.display())),
    }
    Ok(())
}
