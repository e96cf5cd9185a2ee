use dialoguer::{Input, Password};
use reqwest::StatusCode;

use crate::api::client::TrendsApi;
use crate::api::gateway::AuthGateway;
use crate::auth::credentials::{is_valid_email, stored_credentials, Credentials};
use crate::auth::TokenManager;
use crate::cli::output::{print_success, print_warning};
use crate::config::RuntimeConfig;
use crate::error::AppError;

fn prompt_credentials(email: Option<String>, password: Option<String>) -> Result<Credentials, AppError> {
    let email = match email {
        Some(email) => email,
        None => Input::new()
            .with_prompt("Please enter your email")
            .validate_with(|input: &String| {
                if is_valid_email(input) {
                    Ok(())
                } else {
                    Err("Not a valid email address")
                }
            })
            .interact_text()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?,
    };
    let password = match password {
        Some(password) => password,
        None => Password::new()
            .with_prompt("Please enter your password")
            .interact()
            .map_err(|e| AppError::InvalidInput(e.to_string()))?,
    };
    Ok(Credentials { email, password })
}

pub async fn handle_login(config: &RuntimeConfig) -> Result<(), AppError> {
    let store = config.store();
    let (email, password) = stored_credentials(&store)?;
    let credentials = prompt_credentials(email, password)?;

    let tokens = TokenManager::new(TrendsApi::new(store)?);
    tokens
        .login(&credentials.email, &credentials.password)
        .await
        .map_err(|e| match e {
            AppError::Auth { status, .. } => AppError::Auth {
                message: "Error login.".into(),
                status,
            },
            other => other,
        })?;

    print_success("Login successful!");
    Ok(())
}

pub async fn handle_logout(all_sessions: bool, config: &RuntimeConfig) -> Result<(), AppError> {
    let gateway = AuthGateway::from_store(config.store())?;
    let response = gateway.logout(all_sessions).await?;

    match response {
        None => print_warning("Authentication failed. Already logged out."),
        Some(response) if response.status() == StatusCode::OK => {
            if all_sessions {
                print_success("Successfully logged out from all sessions.");
            } else {
                print_success("Successfully logged out.");
            }
        }
        Some(response) => {
            let message = if all_sessions {
                "Error logging out from all sessions."
            } else {
                "Error logging out."
            };
            return Err(AppError::api(response.status(), message));
        }
    }

    gateway.tokens().clear()
}
