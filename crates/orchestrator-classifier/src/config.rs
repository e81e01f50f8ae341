use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessingMode {
    /// Normal source/content-based classification.
    Normal,
    /// Force every message from this agent to classify as PASSIVE.
    Passive,
    /// Force every message from this agent to classify as SKIP.
    Disabled,
    /// Classify normally, but the pipeline should only consult flow
    /// triggers for this agent (never the intent router / direct AI
    /// fallback). Carried as a signal; enforcement lives in the pipeline.
    FlowOnly,
}

impl Default for ProcessingMode {
    fn default() -> Self {
        ProcessingMode::Normal
    }
}

/// Per-agent classifier overrides, §4.8.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentClassifyConfig {
    pub processing_mode: ProcessingMode,
    #[serde(default)]
    pub skip_sources: Vec<String>,
    #[serde(default = "default_passive_sources")]
    pub passive_sources: Vec<String>,
}

fn default_passive_sources() -> Vec<String> {
    vec!["@newsletter".into(), "@broadcast".into(), "@channel".into()]
}

impl AgentClassifyConfig {
    pub fn new() -> Self {
        Self {
            processing_mode: ProcessingMode::Normal,
            skip_sources: Vec::new(),
            passive_sources: default_passive_sources(),
        }
    }
}
