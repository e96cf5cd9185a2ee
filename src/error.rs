#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Authentication failed: {message}")]
    Auth {
        message: String,
        status: Option<u16>,
    },

    #[error("Not authenticated. Run 'trends login' first.")]
    NotAuthenticated,

    #[error("API error: {message}")]
    Api {
        message: String,
        status: Option<u16>,
    },

    #[error("Execute this command in a GEF project")]
    NotAProject,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Docker error: {0}")]
    Docker(String),

    #[error("{0}")]
    InvalidInput(String),

    #[error("{0}")]
    Cancelled(String),

    #[error("Interrupted")]
    Interrupted,

    #[error(transparent)]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl AppError {
    pub fn api(status: reqwest::StatusCode, message: impl Into<String>) -> Self {
        AppError::Api {
            message: message.into(),
            status: Some(status.as_u16()),
        }
    }

    pub fn exit_code(&self) -> i32 {
        match self {
            AppError::Auth { .. } | AppError::NotAuthenticated => 2,
            AppError::NotAProject => 3,
            AppError::Docker(_) => 4,
            AppError::Interrupted => 130,
            _ => 1,
        }
    }

    pub fn error_type(&self) -> &'static str {
        match self {
            AppError::Auth { .. } => "auth",
            AppError::NotAuthenticated => "not_authenticated",
            AppError::Api { .. } => "api",
            AppError::NotAProject => "not_a_project",
            AppError::Config(_) => "config",
            AppError::Docker(_) => "docker",
            AppError::InvalidInput(_) => "invalid_input",
            AppError::Cancelled(_) => "cancelled",
            AppError::Interrupted => "interrupted",
            AppError::Http(_) => "http",
            AppError::Json(_) => "json",
            AppError::Yaml(_) => "yaml",
            AppError::Io(_) => "io",
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            AppError::Auth { status, .. } | AppError::Api { status, .. } => *status,
            _ => None,
        }
    }
}
