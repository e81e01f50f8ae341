use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub type Parameters = Map<String, Value>;

/// One tool call, before or after execution. A chain shares a monotonic
/// output buffer across invocations (see [`ToolChain`]).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolInvocation {
    pub tool_id: String,
    pub parameters: Parameters,
    #[serde(default)]
    pub blocked: bool,
    #[serde(default)]
    pub block_reason: Option<String>,
    pub success: bool,
    #[serde(default)]
    pub output: Option<Value>,
    #[serde(default)]
    pub error: Option<String>,
    pub duration_ms: u64,
}

impl ToolInvocation {
    pub fn pending(tool_id: impl Into<String>, parameters: Parameters) -> Self {
        Self {
            tool_id: tool_id.into(),
            parameters,
            blocked: false,
            block_reason: None,
            success: false,
            output: None,
            error: None,
            duration_ms: 0,
        }
    }

    pub fn blocked(tool_id: impl Into<String>, parameters: Parameters, reason: impl Into<String>) -> Self {
        Self {
            tool_id: tool_id.into(),
            parameters,
            blocked: true,
            block_reason: Some(reason.into()),
            success: false,
            output: None,
            error: None,
            duration_ms: 0,
        }
    }
}

/// An ordered sequence of tool invocations sharing `previous_output` and
/// `all_results`. Chain termination is testable: the number of executed
/// tools equals `index_of_first_nonblocked_failure + 1`, or the full chain
/// length if every invocation succeeded or was blocked.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolChain {
    pub all_results: Vec<ToolInvocation>,
}

impl ToolChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, invocation: ToolInvocation) {
        self.all_results.push(invocation);
    }

    /// Output of the last non-blocked, successful invocation, or `None` if
    /// there isn't one yet.
    pub fn previous_output(&self) -> Option<&Value> {
        self.all_results
            .iter()
            .rev()
            .find(|inv| !inv.blocked && inv.success)
            .and_then(|inv| inv.output.as_ref())
    }

    pub fn last_output_of(&self, tool_ids: &[&str]) -> Option<&Value> {
        self.all_results
            .iter()
            .rev()
            .find(|inv| !inv.blocked && inv.success && tool_ids.contains(&inv.tool_id.as_str()))
            .and_then(|inv| inv.output.as_ref())
    }

    /// Per the chain-termination invariant: stop after the first
    /// non-blocked failure.
    pub fn should_stop_after(&self, invocation: &ToolInvocation) -> bool {
        !invocation.blocked && !invocation.success
    }
}
