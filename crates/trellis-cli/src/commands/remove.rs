//! Implementation of the `trellis remove` command.

use std::path::Path;

use super::CommandError;
use crate::project::load_project;

pub async fn run(config: Option<&Path>, project_file: &Path) -> Result<(), CommandError> {
    let inputs = load_project(project_file)?;
    let name = inputs.project.project_name.clone();
    let deployer = super::deployer(config)?;

    deployer.remove(inputs).await?;

    println!("Removed {name}");
    Ok(())
}
