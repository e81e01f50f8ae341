use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AutoSendMode {
    Restricted,
    Open,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiRouterMode {
    Full,
    ClassifyOnly,
    Disabled,
}

/// Persisted per-user router configuration (spec §3 "User Tool Settings").
/// Created lazily with defaults and never partially written: callers
/// should always go through [`UserToolSettings::default`] and override
/// fields, rather than constructing a half-populated record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserToolSettings {
    pub auto_send_mode: AutoSendMode,
    /// `None` means "all tools enabled" (spec's `null=all`).
    pub enabled_tools: Option<HashSet<String>>,
    pub tool_confidence_threshold: f32,
    pub ai_router_mode: AiRouterMode,
    pub ocr_enabled: bool,
    pub vision_enabled: bool,
    pub document_extract_enabled: bool,
    pub voice_transcription_enabled: bool,
    pub voice_language: Option<String>,
}

impl Default for UserToolSettings {
    fn default() -> Self {
        Self {
            auto_send_mode: AutoSendMode::Restricted,
            enabled_tools: None,
            tool_confidence_threshold: 0.70,
            ai_router_mode: AiRouterMode::Full,
            ocr_enabled: true,
            vision_enabled: true,
            document_extract_enabled: true,
            voice_transcription_enabled: true,
            voice_language: None,
        }
    }
}

impl UserToolSettings {
    pub fn is_tool_enabled(&self, tool_id: &str) -> bool {
        match &self.enabled_tools {
            None => true,
            Some(set) => set.contains(tool_id),
        }
    }

    /// Deterministic key ingredient for the intent-cache fingerprint (spec
    /// §4.2 step 2): the sorted enabled-tool-id list, or a sentinel for
    /// "all tools" so the cache key is stable regardless of registry
    /// iteration order.
    pub fn sorted_enabled_tool_ids(&self) -> Vec<String> {
        match &self.enabled_tools {
            None => vec!["*".to_string()],
            Some(set) => {
                let mut ids: Vec<String> = set.iter().cloned().collect();
                ids.sort();
                ids
            }
        }
    }
}
