use std::fs;
use std::path::Path;
use std::process::Stdio;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::{Map, Value};
use tokio::process::Command;
use tracing::{debug, error};

use crate::error::AppError;

/// Tag prefix for images and containers built by `trends start`.
pub const LOCAL_TAG_PREFIX: &str = "gef-local";

/// Dockerfile used to run a project locally.
pub const DOCKERFILE: &str = include_str!("../assets/Dockerfile");

pub fn local_tag() -> String {
    format!("{}-{}", LOCAL_TAG_PREFIX, uuid::Uuid::new_v4().simple())
}

/// Parse `a=1&b=2` into a JSON object of strings.
pub fn query_to_map(query: &str) -> Result<Map<String, Value>, AppError> {
    let mut params = Map::new();
    if query.is_empty() {
        return Ok(params);
    }
    for pair in query.split('&') {
        let (key, value) = pair
            .split_once('=')
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid parameter '{}'", pair)))?;
        params.insert(key.to_string(), Value::String(value.to_string()));
    }
    Ok(params)
}

/// Merge query parameters with a JSON payload file and encode them for the container.
/// Payload keys win over query keys.
pub fn encode_params(query: &str, payload: Option<&Path>) -> Result<String, AppError> {
    let mut params = query_to_map(query)?;
    if let Some(path) = payload {
        let raw = fs::read_to_string(path)?;
        match serde_json::from_str::<Value>(&raw)? {
            Value::Object(payload) => params.extend(payload),
            _ => {
                return Err(AppError::InvalidInput(format!(
                    "Payload {} must contain a JSON object",
                    path.display()
                )))
            }
        }
    }
    let serialized = serde_json::to_string(&Value::Object(params))?;
    Ok(STANDARD.encode(serialized))
}

async fn docker(args: &[&str], cwd: Option<&Path>) -> Result<(), AppError> {
    debug!("docker {}", args.join(" "));
    let mut command = Command::new("docker");
    command.args(args);
    if let Some(cwd) = cwd {
        command.current_dir(cwd);
    }
    let status = command
        .status()
        .await
        .map_err(|e| AppError::Docker(format!("cannot run docker: {}", e)))?;
    if !status.success() {
        return Err(AppError::Docker(format!(
            "'docker {}' exited with {}",
            args.first().copied().unwrap_or_default(),
            status
        )));
    }
    Ok(())
}

async fn docker_output(args: &[&str]) -> Result<String, AppError> {
    debug!("docker {}", args.join(" "));
    let output = Command::new("docker")
        .args(args)
        .stderr(Stdio::inherit())
        .output()
        .await
        .map_err(|e| AppError::Docker(format!("cannot run docker: {}", e)))?;
    if !output.status.success() {
        return Err(AppError::Docker(format!(
            "'docker {}' exited with {}",
            args.join(" "),
            output.status
        )));
    }
    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

pub async fn build(context: &Path, tag: &str, environment: &str, version: &str) -> Result<(), AppError> {
    debug!("Building with environment {}:{}...", environment, version);
    let environment = format!("ENVIRONMENT={}", environment);
    let version = format!("ENVIRONMENT_VERSION={}", version);
    docker(
        &[
            "build",
            "--build-arg",
            &environment,
            "--build-arg",
            &version,
            "-t",
            tag,
            ".",
        ],
        Some(context),
    )
    .await
}

pub async fn run(tag: &str, service_account: &str, rollbar_token: &str, param: &str) -> Result<(), AppError> {
    let service_account = format!("EE_SERVICE_ACCOUNT_JSON={}", service_account);
    let rollbar_token = format!("ROLLBAR_SCRIPT_TOKEN={}", rollbar_token);
    docker(
        &[
            "run",
            "-e",
            "ENV=dev",
            "-e",
            &service_account,
            "-e",
            &rollbar_token,
            "--rm",
            tag,
            param,
        ],
        None,
    )
    .await
}

/// Select ids from `<id> <name>` lines whose name starts with the local prefix.
/// Ids of listed artifacts named after a local run, each at most once.
fn local_ids(listing: &str) -> Vec<String> {
    let mut ids: Vec<String> = listing
        .lines()
        .filter_map(|line| line.split_once(' '))
        .filter(|(_, name)| name.starts_with(LOCAL_TAG_PREFIX))
        .map(|(id, _)| id.to_string())
        .collect();
    ids.sort();
    ids.dedup();
    ids
}

/// Remove containers and images left behind by local runs. Failures are logged only.
pub async fn clear_local() -> usize {
    let mut removed = 0;

    match docker_output(&["ps", "-a", "--format", "{{.ID}} {{.Image}}"]).await {
        Ok(listing) => {
            for id in local_ids(&listing) {
                match docker(&["rm", "-fv", &id], None).await {
                    Ok(()) => removed += 1,
                    Err(e) => error!("{}", e),
                }
            }
        }
        Err(e) => error!("{}", e),
    }

    match docker_output(&["images", "-a", "--format", "{{.ID}} {{.Repository}}"]).await {
        Ok(listing) => {
            for id in local_ids(&listing) {
                match docker(&["rmi", "-f", &id], None).await {
                    Ok(()) => removed += 1,
                    Err(e) => error!("{}", e),
                }
            }
        }
        Err(e) => error!("{}", e),
    }

    removed
}
