//! Subcommand implementations.

pub mod deploy;
pub mod plan;
pub mod remove;

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;
use trellis_control::{store, AdapterConfig, DeployError, FrameworkDeployer, HttpComponent};

use crate::project::ProjectError;

#[derive(Error, Debug)]
pub enum CommandError {
    #[error(transparent)]
    Project(#[from] ProjectError),

    #[error(transparent)]
    Deploy(#[from] DeployError),

    #[error("Failed to render output: {0}")]
    Output(#[from] serde_json::Error),
}

/// Build a deployer from the adapter configuration.
///
/// Reads `trellis.toml` from the working directory unless `config_path` is
/// given.
pub fn deployer(config_path: Option<&Path>) -> Result<FrameworkDeployer, DeployError> {
    let config = match config_path {
        Some(path) => AdapterConfig::from_file(path)?,
        None => AdapterConfig::load()?,
    };

    let store = store::from_config(&config.state);
    let component = HttpComponent::new(&config.component)?;

    Ok(FrameworkDeployer::new(store, Arc::new(component), config))
}
