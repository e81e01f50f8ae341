//! Operational CLI for the conversational orchestrator core: a thin
//! `clap` binary wiring the composition root together for local
//! testing/operational use — spec §0's `orchestrator-cli` crate.

mod cli_args;
mod commands;
mod composition;
mod demo;
mod logging;

use clap::Parser;
use cli_args::{CliArgs, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = orchestrator_config::load(args.config.as_deref())?;
    logging::setup_logging(&config.log_level);

    match args.command {
        Commands::Serve => commands::serve::run(&config).await,
        Commands::Replay { file, user_id } => commands::replay::run(&config, file.as_deref(), &user_id).await,
        Commands::Health => commands::health::run(&config).await,
        Commands::Config => commands::config_cmd::run(&config),
    }
}
