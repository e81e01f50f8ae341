//! The five ordered pre-AI gates (echo, allowlist, mention, rate-limit,
//! content) and the ~60s-TTL cache in front of per-user gating config —
//! spec §4.7.

pub mod cache;
pub mod config;
pub mod error;
pub mod gates;
pub mod rate_limit;

pub use cache::{GatingConfigCache, GatingConfigStore};
pub use config::{ContentGateConfig, GatingConfig, RateLimitConfig};
pub use error::GatingError;
pub use gates::{gate_allowlist, gate_content, gate_echo, gate_mention, gate_rate_limit, run_gates, GateResult};
pub use rate_limit::{InMemoryRateLimitStore, RateLimitStore};
