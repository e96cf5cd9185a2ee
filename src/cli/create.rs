use std::fs;
use std::path::{Path, PathBuf};

use crate::cli::output::print_success;
use crate::config::RuntimeConfig;
use crate::error::AppError;
use crate::models::project::{ProjectConfiguration, REQUIREMENTS_FILE, SRC_DIR};

const SKELETON_REQUIREMENTS: &str = include_str!("../../assets/skeleton/requirements.txt");
const SKELETON_INIT: &str = include_str!("../../assets/skeleton/src/__init__.py");
const SKELETON_MAIN: &str = include_str!("../../assets/skeleton/src/main.py");

/// Scaffold a new project named `name` under `parent`.
pub fn create_project(parent: &Path, name: &str) -> Result<PathBuf, AppError> {
    if name.is_empty() || name.contains(['/', '\\']) {
        return Err(AppError::InvalidInput(format!(
            "'{}' is not a valid project name",
            name
        )));
    }

    let dir = parent.join(name);
    if dir.exists() {
        return Err(AppError::InvalidInput(format!(
            "{} already exists",
            dir.display()
        )));
    }

    fs::create_dir_all(dir.join(SRC_DIR))?;
    ProjectConfiguration {
        name: Some(name.to_string()),
        ..Default::default()
    }
    .write(&dir)?;
    fs::write(dir.join(REQUIREMENTS_FILE), SKELETON_REQUIREMENTS)?;
    fs::write(dir.join(SRC_DIR).join("__init__.py"), SKELETON_INIT)?;
    fs::write(dir.join(SRC_DIR).join("main.py"), SKELETON_MAIN)?;
    Ok(dir)
}

pub fn handle(name: &str, _config: &RuntimeConfig) -> Result<(), AppError> {
    let dir = create_project(&std::env::current_dir()?, name)?;
    print_success(&format!("Project created in {}", dir.display()));
    Ok(())
}
