//! Trellis CLI - deploy functions with stable domains.

mod commands;
mod project;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "trellis")]
#[command(about = "Deploy serverless functions and keep their domains stable")]
#[command(version)]
struct Cli {
    /// Adapter configuration file (defaults to trellis.toml)
    #[arg(long, global = true, env = "TRELLIS_CONFIG")]
    config: Option<PathBuf>,

    /// Project file describing the function
    #[arg(long, global = true, default_value = project::DEFAULT_PROJECT_FILE)]
    project_file: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show what would be deployed without deploying it
    Plan,

    /// Deploy the function
    Deploy,

    /// Remove the function and clear its recorded state
    Remove,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config.as_deref();
    let project_file = cli.project_file.as_path();

    let result: Result<(), anyhow::Error> = match cli.command {
        Commands::Plan => commands::plan::run(config, project_file)
            .await
            .map_err(Into::into),
        Commands::Deploy => commands::deploy::run(config, project_file)
            .await
            .map_err(Into::into),
        Commands::Remove => commands::remove::run(config, project_file)
            .await
            .map_err(Into::into),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
