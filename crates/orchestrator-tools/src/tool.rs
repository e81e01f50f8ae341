use crate::error::ToolError;
use async_trait::async_trait;
use orchestrator_core::{Parameters, RequestContext, ToolChain};
use serde_json::Value;
use std::sync::Arc;

/// Everything a tool implementation is allowed to see about the call it is
/// handling: the resolved parameters, the request's identity/routing
/// context, and read access to the chain accumulated so far (for tools
/// that branch on what already ran, e.g. a summarizer keyed off which file
/// reader produced `previous_output`).
pub struct ToolContext {
    pub request: RequestContext,
    pub chain_so_far: ToolChain,
}

impl ToolContext {
    pub fn new(request: RequestContext, chain_so_far: ToolChain) -> Self {
        Self { request, chain_so_far }
    }
}

/// One callable capability in the registry. Mirrors the provider trait's
/// shape: a stable id plus a single async entrypoint, so the router can
/// treat every tool — built-in or CLI-bridged — uniformly.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable identifier used in enabled-tool lists, access control and
    /// chain records, e.g. `"searchWeb"`, `"sendWhatsApp"`.
    fn id(&self) -> &str;

    /// Short human-readable description surfaced to the LLM doing intent
    /// routing, so it can decide whether this tool applies.
    fn description(&self) -> &str;

    /// True for tools capable of reaching a third party directly (message
    /// sends, outbound webhooks). The router enforces a stricter access
    /// check before invoking these, per spec §4.2 step 8.
    fn is_messaging_tool(&self) -> bool {
        false
    }

    async fn call(&self, parameters: &Parameters, ctx: &ToolContext) -> Result<Value, ToolError>;
}

/// Static metadata surfaced to the LLM when building the routing prompt —
/// deliberately decoupled from the `Tool` trait object so the router can
/// list definitions without holding a reference to the registry.
#[derive(Debug, Clone)]
pub struct ToolDefinition {
    pub id: String,
    pub description: String,
    pub is_messaging_tool: bool,
}

impl ToolDefinition {
    pub fn of(tool: &Arc<dyn Tool>) -> Self {
        Self {
            id: tool.id().to_string(),
            description: tool.description().to_string(),
            is_messaging_tool: tool.is_messaging_tool(),
        }
    }
}
