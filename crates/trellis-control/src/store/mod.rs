//! Deployment state storage backends.
//!
//! State is read once at the start of a deploy or remove and written once at
//! the end, so backends only need whole-record load and replace. A JSON file
//! store is used by the CLI; an in-memory store is provided for testing.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{StateBackend, StateConfig};
use crate::error::DeployResult;
use crate::types::{DeploymentState, ProjectId};

/// Backend for storing deployment state per project.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Load the recorded state for a project.
    ///
    /// Returns `None` if nothing was recorded or the state was cleared.
    async fn load(&self, project: &ProjectId) -> DeployResult<Option<DeploymentState>>;

    /// Replace the recorded state for a project.
    async fn save(&self, project: &ProjectId, state: &DeploymentState) -> DeployResult<()>;

    /// Clear the recorded state for a project.
    async fn clear(&self, project: &ProjectId) -> DeployResult<()>;
}

/// Build the store selected by configuration.
#[must_use]
pub fn from_config(config: &StateConfig) -> Arc<dyn StateStore> {
    match config.backend {
        StateBackend::File => Arc::new(FileStore::new(&config.dir)),
        StateBackend::Memory => Arc::new(MemoryStore::new()),
    }
}
