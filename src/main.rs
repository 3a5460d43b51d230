//! gitgutter CLI entry point

use clap::Parser;
use gitgutter::cli::{self, Cli, Commands};
use gitgutter::core::error::Result;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_env("GITGUTTER_LOG"))
        .init();

    let cli = Cli::parse();
    let config = cli::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Tree(args) => cli::tree::run(args, &config).await,
        Commands::Ls(args) => cli::ls::run(args, &config).await,
        Commands::Serve(args) => cli::serve::run(args, &config).await,
    }
}
