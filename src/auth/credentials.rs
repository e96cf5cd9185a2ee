use std::env;
use std::sync::OnceLock;

use regex::Regex;

use crate::config::{ConfigStore, KEY_EMAIL, KEY_PASSWORD};
use crate::error::AppError;

pub struct Credentials {
    pub email: String,
    pub password: String,
}

fn email_regex() -> &'static Regex {
    static EMAIL: OnceLock<Regex> = OnceLock::new();
    EMAIL.get_or_init(|| Regex::new(r"^[^@]+@[^@]+\.[^@]+").expect("valid email pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    !email.is_empty() && email_regex().is_match(email)
}

pub fn is_valid_password(password: &str) -> bool {
    !password.is_empty()
}

/// Get credentials from env vars, falling back to the settings file.
/// Either half may be missing; the caller prompts for it.
pub fn stored_credentials(store: &ConfigStore) -> Result<(Option<String>, Option<String>), AppError> {
    let email = match env::var("TRENDS_EMAIL") {
        Ok(email) if !email.is_empty() => email,
        _ => store.get(KEY_EMAIL)?,
    };
    let password = match env::var("TRENDS_PASSWORD") {
        Ok(password) if !password.is_empty() => password,
        _ => store.get(KEY_PASSWORD)?,
    };

    Ok((
        Some(email).filter(|e| is_valid_email(e)),
        Some(password).filter(|p| is_valid_password(p)),
    ))
}
