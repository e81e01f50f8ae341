use orchestrator_core::ContentType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PatternType {
    Any,
    Contains,
    StartsWith,
    EndsWith,
    Regex,
    ExactMatch,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentConstraint {
    #[serde(default)]
    pub pattern_type: Option<PatternType>,
    #[serde(default)]
    pub pattern: Option<String>,
    #[serde(default)]
    pub case_sensitive: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SenderConstraint {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub not_from: Option<String>,
    /// Comma-separated substring list matched against the lower-cased
    /// sender id.
    #[serde(default)]
    pub sender_filter: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GroupConstraint {
    #[serde(default)]
    pub is_group: Option<bool>,
    #[serde(default)]
    pub from_groups: Option<Vec<String>>,
    #[serde(default)]
    pub from_private: Option<bool>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageTypeAllow {
    #[serde(default)]
    pub allowed_content_types: Option<Vec<ContentType>>,
}

/// A persisted flow's trigger configuration, evaluated against one
/// inbound message — spec §4.9.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FlowTrigger {
    pub flow_id: String,
    /// Exact platform tag, or `"any"`.
    pub platform: String,
    #[serde(default)]
    pub message_type: MessageTypeAllow,
    #[serde(default)]
    pub content: ContentConstraint,
    #[serde(default)]
    pub sender: SenderConstraint,
    #[serde(default)]
    pub group: GroupConstraint,
}
