use std::fs::{self, File};
use std::path::{Path, PathBuf};

use flate2::write::GzEncoder;
use flate2::Compression;
use tracing::debug;

use crate::error::AppError;
use crate::models::project::{CONFIGURATION_FILE, REQUIREMENTS_FILE, SRC_DIR};

/// A `<name>.tar.gz` built from a project directory. The file is removed on drop.
pub struct Tarball {
    path: PathBuf,
}

impl Tarball {
    /// Archive `configuration.json`, `requirements.txt` and `src/` of `project_dir`.
    pub fn create(project_dir: &Path, name: &str) -> Result<Self, AppError> {
        let path = project_dir.join(format!("{}.tar.gz", name));
        debug!("Creating tar.gz file in path: {}", project_dir.display());

        let tarball = Tarball { path };
        let file = File::create(&tarball.path)?;
        let mut archive = tar::Builder::new(GzEncoder::new(file, Compression::default()));

        archive
            .append_path_with_name(project_dir.join(CONFIGURATION_FILE), CONFIGURATION_FILE)
            .map_err(missing_project_file)?;
        archive
            .append_path_with_name(project_dir.join(REQUIREMENTS_FILE), REQUIREMENTS_FILE)
            .map_err(missing_project_file)?;
        archive
            .append_dir_all(SRC_DIR, project_dir.join(SRC_DIR))
            .map_err(missing_project_file)?;

        archive.into_inner()?.finish()?;
        Ok(tarball)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn read(&self) -> Result<Vec<u8>, AppError> {
        Ok(fs::read(&self.path)?)
    }
}

impl Drop for Tarball {
    fn drop(&mut self) {
        if let Err(e) = fs::remove_file(&self.path) {
            debug!("Could not remove {}: {}", self.path.display(), e);
        }
    }
}

fn missing_project_file(e: std::io::Error) -> AppError {
    debug!("Packaging failed: {}", e);
    AppError::NotAProject
}
