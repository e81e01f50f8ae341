use crate::error::ConfigError;
use orchestrator_gating::GatingConfig;
use orchestrator_provider::{FailoverConfig, TaskTier};
use orchestrator_router::UserToolSettings;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;

fn default_log_level() -> String {
    "info".to_string()
}

fn default_stale_threshold_secs() -> u64 {
    5 * 60
}

fn default_max_timeout_secs() -> u64 {
    60 * 60
}

fn default_max_concurrent_per_user() -> usize {
    3
}

fn default_health_monitor_interval_secs() -> u64 {
    60
}

fn default_workspace_cleanup_after_days() -> i64 {
    30
}

fn default_workspace_base_dir() -> PathBuf {
    PathBuf::from("./workspaces")
}

/// Async CLI Execution Manager policy defaults (spec §3 "policy":
/// `staleThresholdMs`, `maxTimeoutMs`) plus the concurrency cap from §4.4's
/// testable "Async concurrency cap" property. Per-execution overrides (set
/// by a caller on a specific `StartOptions`) always win over these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AsyncCliSettings {
    pub stale_threshold_secs: u64,
    pub max_timeout_secs: u64,
    pub max_concurrent_per_user: usize,
}

impl Default for AsyncCliSettings {
    fn default() -> Self {
        Self {
            stale_threshold_secs: default_stale_threshold_secs(),
            max_timeout_secs: default_max_timeout_secs(),
            max_concurrent_per_user: default_max_concurrent_per_user(),
        }
    }
}

/// Workspace Manager process-wide settings: where per-agent sandboxes
/// live and how old a soft-deleted workspace must be before `cleanup`
/// hard-removes it — spec §4.5.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceSettings {
    pub base_dir: PathBuf,
    pub cleanup_after_days: i64,
}

impl Default for WorkspaceSettings {
    fn default() -> Self {
        Self {
            base_dir: default_workspace_base_dir(),
            cleanup_after_days: default_workspace_cleanup_after_days(),
        }
    }
}

/// On-disk shape of the active failover hierarchy (spec §3 "Failover
/// Configuration"): tier name -> ordered provider tags. Kept as plain
/// strings here since `orchestrator_provider::FailoverConfig` deliberately
/// doesn't derive `Deserialize` (it's runtime, not persisted, state) —
/// `into_failover_config` does the one-time conversion.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FailoverSettings {
    pub chains: HashMap<String, Vec<String>>,
}

impl FailoverSettings {
    /// Starts from `FailoverConfig::default()` (spec §4.3's default
    /// chains) and overlays any tier explicitly configured here.
    pub fn into_failover_config(self) -> Result<FailoverConfig, ConfigError> {
        let mut config = FailoverConfig::default();
        for (tier_name, chain) in self.chains {
            let tier = parse_tier(&tier_name)?;
            config.set_chain(tier, chain);
        }
        Ok(config)
    }
}

fn parse_tier(name: &str) -> Result<TaskTier, ConfigError> {
    match name.to_uppercase().as_str() {
        "TRIVIAL" => Ok(TaskTier::Trivial),
        "SIMPLE" => Ok(TaskTier::Simple),
        "MODERATE" => Ok(TaskTier::Moderate),
        "COMPLEX" => Ok(TaskTier::Complex),
        "CRITICAL" => Ok(TaskTier::Critical),
        other => Err(ConfigError::UnknownTier(other.to_string())),
    }
}

/// The aggregate, process-wide configuration surface: fallback defaults
/// for the persisted per-user records (spec §3) plus the ambient knobs
/// that have no natural per-user home (async CLI policy, health-monitor
/// cadence, workspace base directory).
///
/// Per-user `GatingConfig` and `UserToolSettings` rows are normally loaded
/// from the database through their respective store traits; the copies
/// here exist only as the value used before a user's first persisted row
/// is created, and for the CLI binary's standalone commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub log_level: String,
    pub gating_defaults: GatingConfig,
    pub user_tool_defaults: UserToolSettings,
    pub failover: FailoverSettings,
    pub async_cli: AsyncCliSettings,
    pub workspace: WorkspaceSettings,
    pub health_monitor_interval_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            gating_defaults: GatingConfig::default(),
            user_tool_defaults: UserToolSettings::default(),
            failover: FailoverSettings::default(),
            async_cli: AsyncCliSettings::default(),
            workspace: WorkspaceSettings::default(),
            health_monitor_interval_secs: default_health_monitor_interval_secs(),
        }
    }
}
