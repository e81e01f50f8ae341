use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    pub max: u64,
    pub window_seconds: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max: 30,
            window_seconds: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentGateConfig {
    pub min_length: usize,
    pub block_media_only: bool,
}

impl Default for ContentGateConfig {
    fn default() -> Self {
        Self {
            min_length: 1,
            block_media_only: false,
        }
    }
}

/// Per-user gating configuration, persisted in `message_gating_config` /
/// `message_gating_group_allowlist` (spec §3). Short-cached in memory with
/// a ~60s TTL — see [`crate::cache::GatingConfigCache`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatingConfig {
    pub echo_enabled: bool,
    #[serde(default)]
    pub bot_identifiers: HashSet<String>,

    pub allowlist_enabled: bool,
    /// `(group_id, platform)` pairs allowed to reach the bot in a group.
    #[serde(default)]
    pub group_allowlist: HashSet<(String, String)>,

    pub mention_enabled: bool,
    #[serde(default)]
    pub bot_names: Vec<String>,

    pub rate_limit_enabled: bool,
    pub rate_limit: RateLimitConfig,

    pub content_enabled: bool,
    pub content: ContentGateConfig,
}

impl Default for GatingConfig {
    fn default() -> Self {
        Self {
            echo_enabled: true,
            bot_identifiers: HashSet::new(),
            allowlist_enabled: false,
            group_allowlist: HashSet::new(),
            mention_enabled: true,
            bot_names: Vec::new(),
            rate_limit_enabled: true,
            rate_limit: RateLimitConfig::default(),
            content_enabled: true,
            content: ContentGateConfig::default(),
        }
    }
}
