mod cli;
mod commands;

use anyhow::Context;
use clap::Parser;
use cli::{Cli, Commands};
use tracing_subscriber::EnvFilter;

fn init_logging(cli: &Cli) {
    let default = if cli.verbose { "dotconf=debug" } else { "dotconf=warn" };
    let filter = cli
        .log
        .as_deref()
        .and_then(|filter| EnvFilter::try_new(filter).ok())
        .unwrap_or_else(|| EnvFilter::new(default));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);

    match &cli.command {
        Commands::Get { file, path, list } => {
            commands::Get::execute(file, path, *list).context("Failed to execute get command")?;
        }
        Commands::Keys { file, path, deep } => {
            commands::Keys::execute(file, path.as_deref(), *deep)
                .context("Failed to execute keys command")?;
        }
        Commands::Merge {
            file,
            defaults,
            ignore,
            dry_run,
        } => {
            commands::Merge::execute(file, defaults, ignore, *dry_run)
                .context("Failed to execute merge command")?;
        }
        Commands::Dump { file, json } => {
            commands::Dump::execute(file, *json).context("Failed to execute dump command")?;
        }
    }

    Ok(())
}
