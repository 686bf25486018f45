//! Loading the project file.

use std::path::{Path, PathBuf};

use thiserror::Error;
use trellis_control::DeployInputs;

/// Default project file name.
pub const DEFAULT_PROJECT_FILE: &str = "framework.toml";

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Project file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid project file: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Read deployment inputs from a TOML project file.
pub fn load_project(path: &Path) -> Result<DeployInputs, ProjectError> {
    if !path.exists() {
        return Err(ProjectError::NotFound(path.to_path_buf()));
    }

    let content = std::fs::read_to_string(path)?;
    let inputs: DeployInputs = toml::from_str(&content)?;
    Ok(inputs)
}
