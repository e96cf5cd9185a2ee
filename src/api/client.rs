use reqwest::StatusCode;
use serde_json::json;
use tracing::debug;

use crate::auth::token::TokenResponse;
use crate::config::ConfigStore;
use crate::error::AppError;

const PATH_LOGIN: &str = "/auth";
const PATH_REFRESH_TOKEN: &str = "/auth/refresh";

pub fn build_http_client() -> Result<reqwest::Client, AppError> {
    Ok(reqwest::Client::builder()
        .user_agent(concat!("trends-cli/", env!("CARGO_PKG_VERSION")))
        .timeout(std::time::Duration::from_secs(600))
        .build()?)
}

/// Unauthenticated access to the scripts API.
#[derive(Debug, Clone)]
pub struct TrendsApi {
    http: reqwest::Client,
    store: ConfigStore,
}

impl TrendsApi {
    pub fn new(store: ConfigStore) -> Result<Self, AppError> {
        Ok(Self {
            http: build_http_client()?,
            store,
        })
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.http
    }

    pub fn store(&self) -> &ConfigStore {
        &self.store
    }

    /// Absolute URL for `path`, resolved against the configured `url_api`.
    pub fn url(&self, path: &str) -> Result<String, AppError> {
        Ok(format!("{}{}", self.store.api_url()?, path))
    }

    /// Exchange email and password for a token set.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, AppError> {
        let url = self.url(PATH_LOGIN)?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&json!({"email": email, "password": password}))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            debug!("Login failed with status {}: {}", status, body);
            return Err(AppError::Auth {
                message: format!("login rejected with status {}", status),
                status: Some(status.as_u16()),
            });
        }

        Ok(response.json().await?)
    }

    /// Exchange a refresh token for a new token set.
    pub async fn refresh_token(&self, refresh_token: &str) -> Result<TokenResponse, AppError> {
        let url = self.url(PATH_REFRESH_TOKEN)?;
        debug!("POST {}", url);

        let response = self
            .http
            .post(&url)
            .json(&json!({"refresh_token": refresh_token}))
            .send()
            .await?;

        let status = response.status();
        if status != StatusCode::OK {
            return Err(AppError::Auth {
                message: format!("token refresh failed with status {}", status),
                status: Some(status.as_u16()),
            });
        }

        Ok(response.json().await?)
    }
}
