//! Writing the startup script into a code artifact.
//!
//! Custom runtimes start by executing `bootstrap` at the root of the code
//! directory. When the artifact is a directory without one, or the user
//! asked for it to be replaced, the configured script is written there.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::DeployResult;

/// File name of the startup script.
pub const BOOTSTRAP_FILE: &str = "bootstrap";

/// What happened to the bootstrap file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BootstrapOutcome {
    /// The artifact is a single file; nothing to do.
    NotADirectory,
    /// A bootstrap already exists and no override was requested.
    AlreadyPresent,
    /// A write was needed but no script content is configured.
    NoContent,
    /// The script was written to the given path.
    Written(PathBuf),
}

/// Ensure `code_uri` carries a bootstrap script.
///
/// # Errors
///
/// Fails if `code_uri` does not exist or the script cannot be written.
pub async fn write_bootstrap(
    code_uri: &Path,
    content: Option<&str>,
    force: bool,
) -> DeployResult<BootstrapOutcome> {
    let metadata = tokio::fs::symlink_metadata(code_uri).await?;
    if !metadata.is_dir() {
        debug!(path = %code_uri.display(), "code artifact is not a directory");
        return Ok(BootstrapOutcome::NotADirectory);
    }

    let path = code_uri.join(BOOTSTRAP_FILE);
    if !force && tokio::fs::try_exists(&path).await? {
        debug!(path = %path.display(), "keeping existing bootstrap");
        return Ok(BootstrapOutcome::AlreadyPresent);
    }

    let Some(content) = content else {
        warn!(path = %path.display(), "no bootstrap content configured, skipping");
        return Ok(BootstrapOutcome::NoContent);
    };

    tokio::fs::write(&path, content).await?;
    set_executable(&path).await?;

    info!(path = %path.display(), "bootstrap written");
    Ok(BootstrapOutcome::Written(path))
}

#[cfg(unix)]
async fn set_executable(path: &Path) -> DeployResult<()> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o777)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn set_executable(_path: &Path) -> DeployResult<()> {
    Ok(())
}
