//! The `process(message, context)` entrypoint: deduplicate, gate,
//! classify, enrich, check flow triggers, run built-ins, route intent,
//! check the swarm, and fall back to direct AI — spec §4.1. Ties together
//! every other `orchestrator-*` crate; nothing downstream depends on this
//! one.

pub mod builtins;
pub mod collaborators;
pub mod dedup;
pub mod error;
pub mod pipeline;
pub mod swarm;
pub mod telemetry;

pub use collaborators::{AgentSummary, Database, FlowEngine, FlowSummary, Ingestor, SwarmAgent};
pub use error::PipelineError;
pub use pipeline::{Pipeline, PipelineOptions};
pub use telemetry::{PipelineTelemetry, TelemetryBuilder};
