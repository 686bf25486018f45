//! Implementation of the `trellis plan` command.

use std::path::Path;

use super::CommandError;
use crate::project::load_project;

pub async fn run(config: Option<&Path>, project_file: &Path) -> Result<(), CommandError> {
    let inputs = load_project(project_file)?;
    let deployer = super::deployer(config)?;

    let plan = deployer.plan(&inputs).await?;
    println!("{}", serde_json::to_string_pretty(&plan)?);
    Ok(())
}
