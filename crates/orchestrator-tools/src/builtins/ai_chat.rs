use crate::error::ToolError;
use crate::tool::{Tool, ToolContext};
use async_trait::async_trait;
use orchestrator_core::Parameters;
use orchestrator_provider::{CallOptions, CallRequest, ChatMessage, FailoverRouter};
use serde_json::{json, Value};
use std::sync::Arc;

/// Bridges the tool invocation surface to the tiered provider failover
/// router, so a chain step like `{tool:"aiChat", parameters:{prompt:"..."}}`
/// gets the same tiering/failover/health-tracking behavior as any other
/// provider call in the pipeline.
pub struct AiChat {
    router: Arc<FailoverRouter>,
}

impl AiChat {
    pub fn new(router: Arc<FailoverRouter>) -> Self {
        Self { router }
    }
}

#[async_trait]
impl Tool for AiChat {
    fn id(&self) -> &str {
        "aiChat"
    }

    fn description(&self) -> &str {
        "Sends a prompt to the tiered provider failover chain and returns the model's reply."
    }

    async fn call(&self, parameters: &Parameters, ctx: &ToolContext) -> Result<Value, ToolError> {
        let prompt = parameters
            .get("prompt")
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| ToolError::InvalidParameters("missing required string parameter \"prompt\"".into()))?;

        let request = CallRequest {
            messages: vec![ChatMessage::user(prompt)],
            user_id: Some(ctx.request.user_id.clone()),
            ..Default::default()
        };

        let result = self
            .router
            .process(request, CallOptions::default())
            .await
            .map_err(|e| ToolError::BackendUnavailable(e.to_string()))?;

        Ok(json!({
            "content": result.content,
            "model": result.model,
            "provider": result.provider,
        }))
    }
}
