//! In-memory state store for testing.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{DeployError, DeployResult};
use crate::types::{DeploymentState, ProjectId};

use super::StateStore;

/// In-memory state store for testing.
///
/// This implementation is not suitable for production use as data is lost
/// when the process exits.
#[derive(Debug, Default)]
pub struct MemoryStore {
    states: RwLock<HashMap<String, DeploymentState>>,
}

impl MemoryStore {
    /// Create a new empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with one project's state.
    #[must_use]
    pub fn with_state(project: &ProjectId, state: DeploymentState) -> Self {
        let store = Self::new();
        if let Ok(mut states) = store.states.write() {
            states.insert(project.as_str().to_owned(), state);
        }
        store
    }
}

#[async_trait]
impl StateStore for MemoryStore {
    async fn load(&self, project: &ProjectId) -> DeployResult<Option<DeploymentState>> {
        let states = self
            .states
            .read()
            .map_err(|_| DeployError::internal("lock poisoned"))?;

        Ok(states.get(project.as_str()).cloned())
    }

    async fn save(&self, project: &ProjectId, state: &DeploymentState) -> DeployResult<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| DeployError::internal("lock poisoned"))?;

        states.insert(project.as_str().to_owned(), state.clone());
        Ok(())
    }

    async fn clear(&self, project: &ProjectId) -> DeployResult<()> {
        let mut states = self
            .states
            .write()
            .map_err(|_| DeployError::internal("lock poisoned"))?;

        states.remove(project.as_str());
        Ok(())
    }
}
