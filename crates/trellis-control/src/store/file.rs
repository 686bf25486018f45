//! JSON file state store.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tracing::debug;

use crate::error::{DeployError, DeployResult};
use crate::types::{DeploymentState, ProjectId};

use super::StateStore;

/// Stores each project's state as `<dir>/<project>.json`.
///
/// Writes go to a temporary file that is renamed into place, so a crash never
/// leaves a half-written record behind. Clearing writes an empty object.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created on first write.
    #[must_use]
    pub fn new(dir: impl AsRef<Path>) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    /// Path of the state file for `project`.
    #[must_use]
    pub fn path_for(&self, project: &ProjectId) -> PathBuf {
        let name: String = project
            .as_str()
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' => '_',
                c => c,
            })
            .collect();
        self.dir.join(format!("{name}.json"))
    }

    async fn write_atomic(&self, path: &Path, contents: &[u8]) -> DeployResult<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, contents).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl StateStore for FileStore {
    async fn load(&self, project: &ProjectId) -> DeployResult<Option<DeploymentState>> {
        let path = self.path_for(project);
        let contents = match tokio::fs::read(&path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        let value: serde_json::Value = serde_json::from_slice(&contents)
            .map_err(|e| DeployError::store(format!("{}: {e}", path.display())))?;

        if value.as_object().is_some_and(serde_json::Map::is_empty) {
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| DeployError::store(format!("{}: {e}", path.display())))
    }

    async fn save(&self, project: &ProjectId, state: &DeploymentState) -> DeployResult<()> {
        let path = self.path_for(project);
        let contents = serde_json::to_vec_pretty(state)?;
        self.write_atomic(&path, &contents).await?;
        debug!(project = %project, path = %path.display(), "state saved");
        Ok(())
    }

    async fn clear(&self, project: &ProjectId) -> DeployResult<()> {
        let path = self.path_for(project);
        self.write_atomic(&path, b"{}").await?;
        debug!(project = %project, path = %path.display(), "state cleared");
        Ok(())
    }
}
