//! Shared value types for the conversational orchestrator: the unified
//! message record, classification, tool invocation chains, the pipeline
//! result contract and the crate-wide error enum. No I/O lives here.

pub mod classification;
pub mod context;
pub mod error;
pub mod fingerprint;
pub mod message;
pub mod result;
pub mod tool_invocation;

pub use classification::{Classification, Confidence, Intent};
pub use context::RequestContext;
pub use error::OrchestratorError;
pub use fingerprint::Fingerprint;
pub use message::{ContentType, Platform, Sender, UnifiedMessage};
pub use result::{PipelineResult, ResultType};
pub use tool_invocation::{Parameters, ToolChain, ToolInvocation};
