use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Operational CLI for the conversational orchestrator core.
#[derive(Parser, Debug)]
#[command(name = "orchestrator", about = "Conversational orchestrator core: health checks, message replay, composition-root binary")]
pub struct CliArgs {
    /// Path to `config.toml`. Defaults to the platform config dir, falling
    /// back to built-in defaults if nothing is found there either.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the pipeline's composition root and idle until interrupted.
    /// Real deployments attach platform adapters upstream of `process()`;
    /// this just proves the lifecycle (init health monitor -> wait ->
    /// shutdown) wires up cleanly.
    Serve,

    /// Feed a single message through the pipeline and print the
    /// resulting `PipelineResult` as JSON.
    Replay {
        /// JSON-encoded `UnifiedMessage`. Reads from `--file` if given,
        /// else from stdin.
        #[arg(long)]
        file: Option<PathBuf>,

        /// The `RequestContext.userId` to process the message as.
        #[arg(long, default_value = "demo-user")]
        user_id: String,
    },

    /// Print the configured failover chain per tier and current provider
    /// health snapshot.
    Health,

    /// Print the effective configuration (file + environment overlay) as
    /// TOML.
    Config,
}
