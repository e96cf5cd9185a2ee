use reqwest::{Response, StatusCode};
use serde::Deserialize;
use tracing::error;

use crate::error::AppError;

/// The `{"data": ...}` envelope used by every scripts endpoint.
#[derive(Debug, Deserialize)]
pub struct ApiResponse<T> {
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn into_data(self) -> Option<T> {
        self.data
    }
}

/// Turn a gateway result into a 200 response or the matching error.
/// `failure` is the message reported for any status other than 200 and 401.
pub async fn expect_ok(response: Option<Response>, failure: &str) -> Result<Response, AppError> {
    let response = response.ok_or(AppError::NotAuthenticated)?;
    match response.status() {
        StatusCode::OK => Ok(response),
        StatusCode::UNAUTHORIZED => Err(AppError::Auth {
            message: "Do you need to login?".into(),
            status: Some(401),
        }),
        status => {
            let body = response.text().await.unwrap_or_default();
            error!("{} responded {}: {}", failure, status, body);
            Err(AppError::api(status, failure))
        }
    }
}

/// Read the `data` member of a 200 response.
pub async fn read_data<T: serde::de::DeserializeOwned>(response: Response) -> Result<T, AppError> {
    let status = response.status();
    let body: ApiResponse<T> = response.json().await?;
    body.into_data()
        .ok_or_else(|| AppError::api(status, "response has no data"))
}
