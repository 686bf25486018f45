//! Implementation of the `trellis deploy` command.

use std::path::Path;

use tracing::info;

use super::CommandError;
use crate::project::load_project;

pub async fn run(config: Option<&Path>, project_file: &Path) -> Result<(), CommandError> {
    let inputs = load_project(project_file)?;
    let deployer = super::deployer(config)?;

    info!(project = %inputs.project.project_name, "deploying");
    let report = deployer.deploy(inputs).await?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
