use chrono::Utc;
use tracing::debug;

use crate::api::client::TrendsApi;
use crate::auth::token::{clear_tokens, is_expired_at, parse_expiry, TokenSet};
use crate::config::{ConfigStore, KEY_JWT, KEY_REFRESH_TOKEN, KEY_TOKEN_EXPIRES_AT};
use crate::error::AppError;

/// Owns the stored session: expiry checks, refresh and login.
#[derive(Debug, Clone)]
pub struct TokenManager {
    api: TrendsApi,
}

impl TokenManager {
    pub fn new(api: TrendsApi) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &TrendsApi {
        &self.api
    }

    fn store(&self) -> &ConfigStore {
        self.api.store()
    }

    /// True when no usable expiry is recorded or it falls within the buffer.
    pub fn is_expired(&self) -> bool {
        let raw = match self.store().get(KEY_TOKEN_EXPIRES_AT) {
            Ok(raw) => raw,
            Err(e) => {
                debug!("Could not read token expiry: {}", e);
                return true;
            }
        };
        is_expired_at(parse_expiry(&raw), Utc::now())
    }

    /// Refresh the stored session. Any failure after a refresh token was found
    /// clears the whole session.
    pub async fn refresh(&self) -> bool {
        match self.try_refresh().await {
            Ok(refreshed) => refreshed,
            Err(e) => {
                debug!("Error refreshing token: {}", e);
                if let Err(e) = clear_tokens(self.store()) {
                    debug!("Could not clear stored tokens: {}", e);
                }
                false
            }
        }
    }

    async fn try_refresh(&self) -> Result<bool, AppError> {
        let refresh_token = self.store().get(KEY_REFRESH_TOKEN)?;
        if refresh_token.is_empty() {
            debug!("No refresh token available, need to login again");
            return Ok(false);
        }

        let response = self.api.refresh_token(&refresh_token).await?;
        TokenSet::from_response(response, Utc::now())?.store(self.store())?;
        debug!("Access token refreshed successfully");
        Ok(true)
    }

    /// The stored access token, refreshed first when it is expired.
    pub async fn get_valid_token(&self) -> Option<String> {
        if self.is_expired() {
            debug!("Token is expired or about to expire, attempting refresh");
            if !self.refresh().await {
                debug!("Token refresh failed, need to login again");
                return None;
            }
        }
        self.current_token()
    }

    pub(crate) fn current_token(&self) -> Option<String> {
        self.store()
            .get(KEY_JWT)
            .ok()
            .filter(|token| !token.is_empty())
    }

    /// Authenticate with email and password and persist the new session.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenSet, AppError> {
        let response = self.api.login(email, password).await?;
        let tokens = TokenSet::from_response(response, Utc::now())?;
        tokens.store(self.store())?;
        Ok(tokens)
    }

    pub fn clear(&self) -> Result<(), AppError> {
        clear_tokens(self.store())
    }
}
