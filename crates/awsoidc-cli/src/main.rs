//! aws-cli-oidc CLI entrypoint.

use clap::Parser;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;
mod handlers;
mod terminal;

use commands::Commands;
use config::CliConfig;

#[derive(Parser)]
#[command(name = "aws-cli-oidc")]
#[command(author, version, about = "CLI tool for retrieving AWS temporary credentials using OIDC provider", long_about = None)]
struct Cli {
    /// Directory holding config.yaml
    #[arg(long, global = true, env = config::CONFIG_DIR_ENV)]
    config_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env(config::LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(err) = run(cli) {
        eprintln!("Error: {}", err);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let config = CliConfig::resolve(cli.config_dir)?;

    match cli.command {
        Commands::Setup => handlers::setup(&config)?,
        Commands::List => handlers::list(&config)?,
    }

    Ok(())
}
