use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AppError;

pub const CONFIGURATION_FILE: &str = "configuration.json";
pub const REQUIREMENTS_FILE: &str = "requirements.txt";
pub const SRC_DIR: &str = "src";

pub const DEFAULT_ENVIRONMENT: &str = "trends.earth-environment";
pub const DEFAULT_ENVIRONMENT_VERSION: &str = "0.1.6";

/// `configuration.json` of a local script project. Unknown keys are kept so
/// that writing the file back does not drop them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectConfiguration {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub environment_version: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl ProjectConfiguration {
    pub fn read(dir: &Path) -> Result<Self, AppError> {
        let path = dir.join(CONFIGURATION_FILE);
        debug!("Reading configuration file in path: {}", dir.display());
        let raw = fs::read_to_string(&path).map_err(|e| {
            debug!("Cannot read {}: {}", path.display(), e);
            AppError::NotAProject
        })?;
        serde_json::from_str(&raw).map_err(|e| {
            debug!("Invalid {}: {}", path.display(), e);
            AppError::NotAProject
        })
    }

    pub fn write(&self, dir: &Path) -> Result<(), AppError> {
        debug!("Writing configuration file in path: {}", dir.display());
        fs::write(
            dir.join(CONFIGURATION_FILE),
            serde_json::to_string_pretty(self)?,
        )?;
        Ok(())
    }

    pub fn environment(&self) -> &str {
        self.environment.as_deref().unwrap_or(DEFAULT_ENVIRONMENT)
    }

    pub fn environment_version(&self) -> &str {
        self.environment_version
            .as_deref()
            .unwrap_or(DEFAULT_ENVIRONMENT_VERSION)
    }
}
