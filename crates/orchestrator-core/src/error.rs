//! Error kinds the core recognizes.
//!
//! Each variant maps to an "Error kind" from the orchestrator's error
//! handling design: a handful (`DuplicateMessage`, `Gated`, ...) are
//! swallowed by the pipeline and turned into a terminal `PipelineResult`;
//! the rest degrade control flow (next provider, clarify) or are logged
//! without aborting the turn. Nothing here is ever thrown out of
//! `process()` — see `orchestrator-pipeline`.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error, Clone, Serialize, Deserialize)]
#[non_exhaustive]
pub enum OrchestratorError {
    #[error("duplicate message within dedup window")]
    DuplicateMessage,

    #[error("gated by {gate}: {reason}")]
    Gated { gate: String, reason: String },

    #[error("tool '{tool_id}' access denied: {reason}")]
    AccessDenied { tool_id: String, reason: String },

    #[error("could not parse AI response as JSON: {0}")]
    ParseFailure(String),

    #[error("classification confidence {confidence} below threshold {threshold}")]
    LowConfidence { confidence: f32, threshold: f32 },

    #[error("provider chain exhausted, attempted: {attempted:?}")]
    ProviderFailure { attempted: Vec<String> },

    #[error("child process failure ({reason})")]
    ChildProcessFailure { reason: String },

    #[error("async execution went stale: no output for {idle_ms}ms")]
    Stale { idle_ms: u64 },

    #[error("async execution exceeded max timeout of {max_ms}ms")]
    Timeout { max_ms: u64 },

    #[error("persistence failure (non-fatal): {0}")]
    PersistenceFailure(String),

    #[error("media enrichment failed (non-fatal): {0}")]
    EnrichmentFailure(String),

    #[error("delivery failure: {0}")]
    DeliveryFailure(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl OrchestratorError {
    /// Errors inside a gate implementation or an enricher are fail-open:
    /// they log and the pipeline proceeds as though the step had passed.
    pub fn is_fail_open(&self) -> bool {
        matches!(
            self,
            OrchestratorError::Gated { .. }
                | OrchestratorError::EnrichmentFailure(_)
                | OrchestratorError::PersistenceFailure(_)
        )
    }
}
