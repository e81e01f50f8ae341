use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The terminal kind for one `process(message, context)` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResultType {
    FlowExecuted,
    ToolExecuted,
    AiResponse,
    SwarmDelegated,
    PassiveIngested,
    Silent,
    NoAction,
    Clarification,
    Error,
}

/// The pipeline never throws outward; every step either returns one of
/// these or hands off to the next step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineResult {
    #[serde(rename = "type")]
    pub result_type: ResultType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response: Option<String>,
    #[serde(default)]
    pub metadata: Value,
}

impl PipelineResult {
    pub fn new(result_type: ResultType) -> Self {
        Self {
            result_type,
            response: None,
            metadata: Value::Null,
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.response = Some(response.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn no_action(reason: impl Into<String>) -> Self {
        Self::new(ResultType::NoAction).with_metadata(serde_json::json!({ "reason": reason.into() }))
    }

    pub fn gated(gate: &str, why: impl AsRef<str>) -> Self {
        Self::no_action(format!("gated:{gate}:{}", why.as_ref()))
    }

    pub fn duplicate() -> Self {
        Self::no_action("duplicate")
    }

    pub fn clarification(question: impl Into<String>) -> Self {
        let question = question.into();
        Self::new(ResultType::Clarification)
            .with_metadata(serde_json::json!({ "question": question.clone() }))
            .with_response(question)
    }

    pub fn error(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(ResultType::Error).with_metadata(serde_json::json!({ "error": message }))
    }

    pub fn silent() -> Self {
        Self::new(ResultType::Silent)
    }
}
