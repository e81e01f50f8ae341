//! Tiered task classification, ordered provider failover, health tracking
//! and a uniform call surface over local, remote and CLI-backed providers
//! — spec §4.3.

pub mod chat;
pub mod cli_provider;
pub mod error;
pub mod failover;
pub mod health;
pub mod provider;
pub mod tier;

pub use chat::{CallOptions, ChatMessage, ChatRole, ProviderResponse, Usage};
pub use cli_provider::{CliBackedProvider, CliType};
pub use error::ProviderError;
pub use failover::{CallRequest, CallResult, FailoverConfig, FailoverRouter};
pub use health::{CircuitState, HealthTable, ProviderHealth};
pub use provider::LLMProvider;
pub use tier::{TaskClassifier, TaskTier, TierResult};
