//! Typed configuration loading: a TOML file on disk, located via
//! `dirs::config_dir()`, overlaid with `ORCHESTRATOR_*` environment
//! variables — the ambient config surface for every persisted knob named
//! in spec §3 that doesn't already have a per-user database row.

pub mod error;
pub mod loader;
pub mod settings;

pub use error::ConfigError;
pub use loader::{default_config_path, load};
pub use settings::{AppConfig, AsyncCliSettings, FailoverSettings, WorkspaceSettings};
