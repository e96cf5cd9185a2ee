use chrono::{DateTime, Duration, Local, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::config::{ConfigStore, KEY_JWT, KEY_REFRESH_TOKEN, KEY_TOKEN_EXPIRES_AT};
use crate::error::AppError;

/// Tokens are treated as expired this long before their recorded expiry.
pub const EXPIRY_BUFFER_SECS: i64 = 5 * 60;

/// Body returned by both `/auth` and `/auth/refresh`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenSet {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_at: Option<DateTime<Utc>>,
}

impl TokenSet {
    /// Build a token set from a server response received at `received_at`.
    /// An `expires_in` that cannot be represented as a date is rejected.
    pub fn from_response(
        response: TokenResponse,
        received_at: DateTime<Utc>,
    ) -> Result<Self, AppError> {
        let expires_at = match response.expires_in {
            Some(secs) => Some(
                Duration::try_seconds(secs)
                    .and_then(|lifetime| received_at.checked_add_signed(lifetime))
                    .ok_or_else(|| AppError::Auth {
                        message: format!("Invalid expires_in in token response: {}", secs),
                        status: None,
                    })?,
            ),
            None => None,
        };
        Ok(TokenSet {
            access_token: response.access_token,
            refresh_token: response.refresh_token,
            expires_at,
        })
    }

    /// Persist the token set. Absent optional fields leave the stored value untouched.
    pub fn store(&self, store: &ConfigStore) -> Result<(), AppError> {
        store.set(KEY_JWT, &self.access_token)?;
        if let Some(ref refresh_token) = self.refresh_token {
            store.set(KEY_REFRESH_TOKEN, refresh_token)?;
        }
        if let Some(expires_at) = self.expires_at {
            store.set(KEY_TOKEN_EXPIRES_AT, &expires_at.to_rfc3339())?;
        }
        Ok(())
    }
}

pub fn clear_tokens(store: &ConfigStore) -> Result<(), AppError> {
    store.unset(KEY_JWT)?;
    store.unset(KEY_REFRESH_TOKEN)?;
    store.unset(KEY_TOKEN_EXPIRES_AT)?;
    Ok(())
}

/// Parse a stored expiry. Values without an offset are read as local time.
pub fn parse_expiry(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    let naive = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f").ok()?;
    Local
        .from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}

pub fn is_expired_at(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> bool {
    match expires_at {
        Some(expires_at) => now + Duration::seconds(EXPIRY_BUFFER_SECS) >= expires_at,
        None => true,
    }
}
