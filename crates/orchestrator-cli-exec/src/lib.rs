//! Spawns and supervises long-running CLI-backed tool executions whose
//! wall time may exceed a synchronous reasoning-loop budget — spec §4.4.

pub mod delivery;
pub mod error;
pub mod manager;
pub mod output_files;
pub mod record;
mod ring;

pub use delivery::{DeliveryContext, DeliveryOutcome, DirectContext, RecallContext, ResultDeliverer};
pub use error::CliExecError;
pub use manager::{CliExecManager, StartOptions, ABSOLUTE_MAX_TIMEOUT, DEFAULT_MAX_TIMEOUT, DEFAULT_STALE_THRESHOLD, STDOUT_CAP_BYTES};
pub use record::{CliExecEvent, DeliveryStatus, ExecutionRecord, ExecutionStatus, GeneratedFile};
