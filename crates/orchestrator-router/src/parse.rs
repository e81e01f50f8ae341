use orchestrator_core::Parameters;
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Clone, Deserialize)]
pub struct PlannedTool {
    pub tool: String,
    #[serde(default)]
    pub parameters: Parameters,
}

#[derive(Debug, Clone)]
pub struct RouteDecision {
    pub tools: Vec<PlannedTool>,
    pub confidence: f32,
    pub reasoning: String,
}

/// The two response shapes the router prompt permits (spec §4.2 step 4):
/// a single `{tool, parameters, confidence, reasoning}` or a
/// `{tools:[...], confidence, reasoning}` batch.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawDecision {
    Single {
        tool: String,
        #[serde(default)]
        parameters: Parameters,
        confidence: f32,
        #[serde(default)]
        reasoning: String,
    },
    Batch {
        tools: Vec<PlannedTool>,
        confidence: f32,
        #[serde(default)]
        reasoning: String,
    },
}

impl From<RawDecision> for RouteDecision {
    fn from(raw: RawDecision) -> Self {
        match raw {
            RawDecision::Single { tool, parameters, confidence, reasoning } => {
                RouteDecision { tools: vec![PlannedTool { tool, parameters }], confidence, reasoning }
            }
            RawDecision::Batch { tools, confidence, reasoning } => RouteDecision { tools, confidence, reasoning },
        }
    }
}

/// Strips a ```json ... ``` / ``` ... ``` code-fence wrapper a model
/// sometimes adds despite a JSON-only instruction.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.trim_start_matches(['\n', '\r']);
    rest.strip_suffix("```").unwrap_or(rest).trim()
}

#[derive(Debug, thiserror::Error)]
#[error("could not parse routing decision: {0}")]
pub struct ParseError(pub String);

pub fn parse_route_decision(raw: &str) -> Result<RouteDecision, ParseError> {
    let cleaned = strip_code_fence(raw);
    let value: Value = serde_json::from_str(cleaned).map_err(|e| ParseError(e.to_string()))?;
    let raw_decision: RawDecision = serde_json::from_value(value).map_err(|e| ParseError(e.to_string()))?;
    Ok(raw_decision.into())
}
