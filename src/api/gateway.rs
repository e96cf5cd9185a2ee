use reqwest::header::{HeaderValue, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use tracing::{debug, error};

use super::client::TrendsApi;
use crate::auth::TokenManager;
use crate::config::ConfigStore;
use crate::error::AppError;

/// Sends requests with a bearer token and retries once after a 401.
///
/// `Ok(None)` means no valid token could be obtained. Transport failures are
/// returned as errors; every HTTP status is handed back to the caller.
#[derive(Debug, Clone)]
pub struct AuthGateway {
    tokens: TokenManager,
}

impl AuthGateway {
    pub fn new(tokens: TokenManager) -> Self {
        Self { tokens }
    }

    pub fn from_store(store: ConfigStore) -> Result<Self, AppError> {
        Ok(Self::new(TokenManager::new(TrendsApi::new(store)?)))
    }

    pub fn tokens(&self) -> &TokenManager {
        &self.tokens
    }

    /// Absolute URL for an API path.
    pub fn url(&self, path: &str) -> Result<String, AppError> {
        self.tokens.api().url(path)
    }

    /// `options` is applied to a fresh builder for every attempt, so it must
    /// be able to rebuild bodies such as multipart forms.
    pub async fn request<F>(
        &self,
        method: Method,
        url: &str,
        options: F,
    ) -> Result<Option<Response>, AppError>
    where
        F: Fn(RequestBuilder) -> Result<RequestBuilder, AppError>,
    {
        let Some(token) = self.tokens.get_valid_token().await else {
            error!("No valid token available. Please login first.");
            return Ok(None);
        };

        let response = self.send(&method, url, &options, &token).await?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(Some(response));
        }

        debug!("Got 401 response, attempting to refresh token");
        if !self.tokens.refresh().await {
            error!("Token refresh failed. Please login again.");
            return Ok(Some(response));
        }

        let Some(token) = self.tokens.current_token() else {
            return Ok(Some(response));
        };
        let retried = self.send(&method, url, &options, &token).await?;
        Ok(Some(retried))
    }

    pub async fn get(&self, url: &str) -> Result<Option<Response>, AppError> {
        self.request(Method::GET, url, Ok).await
    }

    pub async fn post(&self, url: &str) -> Result<Option<Response>, AppError> {
        self.request(Method::POST, url, Ok).await
    }

    async fn send<F>(
        &self,
        method: &Method,
        url: &str,
        options: &F,
        token: &str,
    ) -> Result<Response, AppError>
    where
        F: Fn(RequestBuilder) -> Result<RequestBuilder, AppError>,
    {
        let http = self.tokens.api().http();
        let mut request = options(http.request(method.clone(), url))?.build()?;

        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", token))
            .map_err(|_| AppError::Auth {
                message: "stored access token is not a valid header value".into(),
                status: None,
            })?;
        bearer.set_sensitive(true);
        request.headers_mut().insert(AUTHORIZATION, bearer);

        debug!("{} {}", method, url);
        Ok(http.execute(request).await?)
    }
}
