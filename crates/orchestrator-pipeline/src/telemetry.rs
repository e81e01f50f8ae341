use orchestrator_core::{Classification, ResultType, ToolChain};
use orchestrator_provider::Usage;
use serde::Serialize;
use std::time::Instant;

/// One structured record per completed `process()` call: classification,
/// provider chain attempted/used, token usage, tool list, timings and the
/// result type — the observability contract in spec §4.1.
#[derive(Debug, Serialize)]
pub struct PipelineTelemetry {
    pub message_id: String,
    pub platform: String,
    pub intent: Option<String>,
    pub intent_confidence: Option<f32>,
    pub task_tier: Option<String>,
    pub task_confidence: Option<f32>,
    pub providers_attempted: Vec<String>,
    pub provider_used: Option<String>,
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub tools: Vec<ToolSummary>,
    pub total_ms: u64,
    pub result_type: ResultType,
}

#[derive(Debug, Serialize)]
pub struct ToolSummary {
    pub tool_id: String,
    pub success: bool,
    pub blocked: bool,
    pub duration_ms: u64,
}

/// Accumulates the fields above across one `process()` call; `finish`
/// serializes and logs at `info`, then returns the record so callers that
/// also want it (tests, a future metrics sink) don't have to re-derive it.
pub struct TelemetryBuilder {
    started: Instant,
    message_id: String,
    platform: String,
    intent: Option<String>,
    intent_confidence: Option<f32>,
    task_tier: Option<String>,
    task_confidence: Option<f32>,
    providers_attempted: Vec<String>,
    provider_used: Option<String>,
    usage: Option<Usage>,
    tools: Vec<ToolSummary>,
}

impl TelemetryBuilder {
    pub fn new(message_id: impl Into<String>, platform: impl Into<String>) -> Self {
        Self {
            started: Instant::now(),
            message_id: message_id.into(),
            platform: platform.into(),
            intent: None,
            intent_confidence: None,
            task_tier: None,
            task_confidence: None,
            providers_attempted: Vec::new(),
            provider_used: None,
            usage: None,
            tools: Vec::new(),
        }
    }

    pub fn record_classification(&mut self, classification: &Classification) {
        self.intent = Some(format!("{:?}", classification.intent));
        self.intent_confidence = Some(classification.confidence.value());
    }

    pub fn record_provider_call(&mut self, attempted: &[String], used: Option<&str>, usage: Option<Usage>) {
        self.providers_attempted = attempted.to_vec();
        self.provider_used = used.map(str::to_string);
        self.usage = usage;
    }

    pub fn record_task_tier(&mut self, tier: &str, confidence: f32) {
        self.task_tier = Some(tier.to_string());
        self.task_confidence = Some(confidence);
    }

    pub fn record_chain(&mut self, chain: &ToolChain) {
        self.tools = chain
            .all_results
            .iter()
            .map(|inv| ToolSummary {
                tool_id: inv.tool_id.clone(),
                success: inv.success,
                blocked: inv.blocked,
                duration_ms: inv.duration_ms,
            })
            .collect();
    }

    pub fn finish(self, result_type: ResultType) -> PipelineTelemetry {
        let telemetry = PipelineTelemetry {
            message_id: self.message_id,
            platform: self.platform,
            intent: self.intent,
            intent_confidence: self.intent_confidence,
            task_tier: self.task_tier,
            task_confidence: self.task_confidence,
            providers_attempted: self.providers_attempted,
            provider_used: self.provider_used,
            prompt_tokens: self.usage.map(|u| u.prompt_tokens),
            completion_tokens: self.usage.map(|u| u.completion_tokens),
            tools: self.tools,
            total_ms: self.started.elapsed().as_millis() as u64,
            result_type,
        };
        match serde_json::to_string(&telemetry) {
            Ok(line) => log::info!("pipeline_turn {line}"),
            Err(err) => log::warn!("telemetry serialization failed: {err}"),
        }
        telemetry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::Intent;

    #[test]
    fn finish_reports_total_elapsed_and_result_type() {
        let mut builder = TelemetryBuilder::new("m1", "wa");
        builder.record_classification(&Classification::new(Intent::Active, "direct", "source"));
        let telemetry = builder.finish(ResultType::AiResponse);
        assert_eq!(telemetry.intent.as_deref(), Some("Active"));
        assert_eq!(telemetry.result_type, ResultType::AiResponse);
    }
}
