use serde::{Deserialize, Serialize};

/// Carried alongside a [`crate::message::UnifiedMessage`] through one
/// `process()` call. `reply_function` itself is a capability, not data, so
/// it lives as a trait object one layer up (`orchestrator-pipeline`); this
/// struct is the serializable part of the contract described in spec §6.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub account_id: Option<String>,
    #[serde(default)]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub mode: Option<String>,
}

impl RequestContext {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            ..Default::default()
        }
    }
}
