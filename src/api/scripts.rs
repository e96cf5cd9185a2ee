use reqwest::multipart::{Form, Part};
use reqwest::{Method, Response};

use super::gateway::AuthGateway;
use crate::error::AppError;

const PATH_SCRIPT: &str = "/api/v1/script";
const PATH_LOGOUT: &str = "/auth/logout";
const PATH_LOGOUT_ALL: &str = "/auth/logout-all";

/// Authenticated script endpoints. Each call returns the raw response so the
/// command layer decides how to report status codes; `None` means not logged in.
impl AuthGateway {
    pub async fn get_script(
        &self,
        id: &str,
        include_logs: bool,
    ) -> Result<Option<Response>, AppError> {
        let url = self.url(&format!("{}/{}", PATH_SCRIPT, id))?;
        self.request(Method::GET, &url, |builder| {
            Ok(if include_logs {
                builder.query(&[("include", "logs")])
            } else {
                builder
            })
        })
        .await
    }

    /// Log entries strictly after `start` (RFC 3339).
    pub async fn get_script_logs(
        &self,
        id: &str,
        start: Option<&str>,
    ) -> Result<Option<Response>, AppError> {
        let url = self.url(&format!("{}/{}/log", PATH_SCRIPT, id))?;
        self.request(Method::GET, &url, |builder| {
            Ok(match start {
                Some(start) => builder.query(&[("start", start)]),
                None => builder,
            })
        })
        .await
    }

    /// Upload a packaged script. With an `id` the existing script is replaced.
    pub async fn upload_script(
        &self,
        id: Option<&str>,
        file_name: &str,
        bytes: &[u8],
    ) -> Result<Option<Response>, AppError> {
        let (method, url) = match id {
            Some(id) => (Method::PATCH, self.url(&format!("{}/{}", PATH_SCRIPT, id))?),
            None => (Method::POST, self.url(PATH_SCRIPT)?),
        };
        self.request(method, &url, |builder| {
            let part = Part::bytes(bytes.to_vec())
                .file_name(file_name.to_string())
                .mime_str("application/gzip")?;
            Ok(builder.multipart(Form::new().part("file", part)))
        })
        .await
    }

    pub async fn publish_script(&self, id: &str) -> Result<Option<Response>, AppError> {
        let url = self.url(&format!("{}/{}/publish", PATH_SCRIPT, id))?;
        self.post(&url).await
    }

    pub async fn logout(&self, all_sessions: bool) -> Result<Option<Response>, AppError> {
        let path = if all_sessions {
            PATH_LOGOUT_ALL
        } else {
            PATH_LOGOUT
        };
        let url = self.url(path)?;
        self.post(&url).await
    }
}
