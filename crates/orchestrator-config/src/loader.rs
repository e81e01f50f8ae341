use crate::error::ConfigError;
use crate::settings::AppConfig;
use std::path::{Path, PathBuf};

const ENV_PREFIX: &str = "ORCHESTRATOR_";

/// Default config file location: `<dirs::config_dir()>/orchestrator/config.toml`.
/// Returns `None` if the platform has no notion of a config directory.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("orchestrator").join("config.toml"))
}

/// Loads [`AppConfig`] from `path` if given, else from
/// [`default_config_path`] if that file exists, else pure defaults —
/// then applies process-environment overrides.
///
/// A missing config file at the default location is not an error (fresh
/// installs have none); a missing file at an *explicitly given* path is.
pub fn load(explicit_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let config = match explicit_path {
        Some(path) => load_file(path)?,
        None => match default_config_path() {
            Some(path) if path.exists() => load_file(&path)?,
            _ => AppConfig::default(),
        },
    };
    Ok(apply_env_overrides(config))
}

fn load_file(path: &Path) -> Result<AppConfig, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.display().to_string(),
        source,
    })?;
    toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.display().to_string(),
        source,
    })
}

/// Overlays a handful of `ORCHESTRATOR_*` environment variables on top of
/// the file-derived config, following the same "file sets the baseline,
/// environment overrides it" layering the ambient stack uses elsewhere.
/// Unset or unparseable variables leave the existing value untouched.
fn apply_env_overrides(mut config: AppConfig) -> AppConfig {
    if let Some(level) = env_var("LOG_LEVEL") {
        config.log_level = level;
    }
    if let Some(secs) = env_var("ASYNC_CLI_STALE_THRESHOLD_SECS").and_then(|v| v.parse().ok()) {
        config.async_cli.stale_threshold_secs = secs;
    }
    if let Some(secs) = env_var("ASYNC_CLI_MAX_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
        config.async_cli.max_timeout_secs = secs;
    }
    if let Some(n) = env_var("ASYNC_CLI_MAX_CONCURRENT_PER_USER").and_then(|v| v.parse().ok()) {
        config.async_cli.max_concurrent_per_user = n;
    }
    if let Some(dir) = env_var("WORKSPACE_BASE_DIR") {
        config.workspace.base_dir = PathBuf::from(dir);
    }
    if let Some(days) = env_var("WORKSPACE_CLEANUP_AFTER_DAYS").and_then(|v| v.parse().ok()) {
        config.workspace.cleanup_after_days = days;
    }
    if let Some(secs) = env_var("HEALTH_MONITOR_INTERVAL_SECS").and_then(|v| v.parse().ok()) {
        config.health_monitor_interval_secs = secs;
    }
    config
}

fn env_var(suffix: &str) -> Option<String> {
    std::env::var(format!("{ENV_PREFIX}{suffix}")).ok()
}
