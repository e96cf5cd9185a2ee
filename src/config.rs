use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;

use crate::error::AppError;

pub const KEY_URL_API: &str = "url_api";
pub const KEY_JWT: &str = "JWT";
pub const KEY_REFRESH_TOKEN: &str = "refresh_token";
pub const KEY_TOKEN_EXPIRES_AT: &str = "token_expires_at";
pub const KEY_EMAIL: &str = "email";
pub const KEY_PASSWORD: &str = "password";
pub const KEY_EE_SERVICE_ACCOUNT: &str = "EE_SERVICE_ACCOUNT_JSON";
pub const KEY_ROLLBAR_TOKEN: &str = "ROLLBAR_SCRIPT_TOKEN";

pub const DEFAULT_URL_API: &str = "https://api.trends.earth";

const CONFIG_FILE_NAME: &str = ".tecli.yml";

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub verbose: bool,
    pub config_path: PathBuf,
}

impl RuntimeConfig {
    pub fn store(&self) -> ConfigStore {
        ConfigStore::new(&self.config_path)
    }
}

/// Location of the user settings file, `~/.tecli.yml`.
pub fn default_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(CONFIG_FILE_NAME)
}

/// File-backed key/value settings.
///
/// Every operation re-reads the file, so two handles on the same path always
/// observe each other's writes. Missing keys read as the empty string.
#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, Value>, AppError> {
        let mut settings = BTreeMap::new();
        settings.insert(KEY_URL_API.to_string(), Value::String(DEFAULT_URL_API.to_string()));

        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(settings),
            Err(e) => return Err(e.into()),
        };
        if raw.trim().is_empty() {
            return Ok(settings);
        }

        let stored: Option<BTreeMap<String, Value>> = serde_yaml_ng::from_str(&raw)?;
        settings.extend(stored.unwrap_or_default());
        Ok(settings)
    }

    fn save(&self, settings: &BTreeMap<String, Value>) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_yaml_ng::to_string(settings)?)?;
        Ok(())
    }

    pub fn get(&self, key: &str) -> Result<String, AppError> {
        let settings = self.load()?;
        Ok(settings.get(key).map(value_to_string).unwrap_or_default())
    }

    pub fn set(&self, key: &str, value: &str) -> Result<(), AppError> {
        let mut settings = self.load()?;
        settings.insert(key.to_string(), Value::String(value.to_string()));
        self.save(&settings)
    }

    pub fn unset(&self, key: &str) -> Result<(), AppError> {
        let mut settings = self.load()?;
        if settings.remove(key).is_some() {
            self.save(&settings)?;
        }
        Ok(())
    }

    /// Base URL of the scripts API with any trailing slash removed.
    pub fn api_url(&self) -> Result<String, AppError> {
        let url = self.get(KEY_URL_API)?;
        let url = url.trim_end_matches('/');
        if url.is_empty() {
            return Err(AppError::Config(format!("'{}' is not set", KEY_URL_API)));
        }
        Ok(url.to_string())
    }
}

fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => serde_yaml_ng::to_string(other)
            .map(|s| s.trim_end().to_string())
            .unwrap_or_default(),
    }
}
