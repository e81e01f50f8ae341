use thiserror::Error;

/// Errors surfaced by the out-of-scope collaborators the pipeline depends
/// on ([`crate::collaborators::Database`], [`crate::collaborators::FlowEngine`],
/// [`crate::collaborators::Ingestor`]). Per spec §7, none of these ever
/// escape `process()`: every call site logs and falls back to a safe
/// default rather than aborting the turn.
#[derive(Debug, Error, Clone)]
pub enum PipelineError {
    #[error("database lookup failed: {0}")]
    Database(String),

    #[error("flow engine failed: {0}")]
    FlowEngine(String),

    #[error("ingestion pipeline failed: {0}")]
    Ingestion(String),
}
