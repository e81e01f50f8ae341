use crate::error::ToolError;
use crate::tool::{Tool, ToolContext};
use async_trait::async_trait;
use orchestrator_core::Parameters;
use serde_json::{json, Value};

/// Terminal pseudo-tool synthesized by the router on parse failure or
/// low-confidence routing (spec §4.2 step 4), and registered like any
/// other tool so the chain machinery needs no special case for it.
pub struct Clarify;

#[async_trait]
impl Tool for Clarify {
    fn id(&self) -> &str {
        "clarify"
    }

    fn description(&self) -> &str {
        "Asks the user a clarifying question instead of taking an action."
    }

    async fn call(&self, parameters: &Parameters, _ctx: &ToolContext) -> Result<Value, ToolError> {
        let question = parameters
            .get("question")
            .and_then(Value::as_str)
            .unwrap_or("Could you clarify what you'd like me to do?");
        Ok(json!({ "question": question }))
    }
}
