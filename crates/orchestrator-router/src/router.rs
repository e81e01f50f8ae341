use crate::access::{check_access, AccessDecision};
use crate::autoswitch::{bare_url_in_message, ecommerce_auto_switch};
use crate::cache::IntentCache;
use crate::config::{AiRouterMode, UserToolSettings};
use crate::format::{append_blocked_notices, format_output};
use crate::history::{ConversationHistoryEntry, ConversationHistoryStore};
use crate::parse::{parse_route_decision, PlannedTool, RouteDecision};
use orchestrator_core::{PipelineResult, RequestContext, ToolChain, ToolInvocation};
use orchestrator_provider::{CallOptions, CallRequest, ChatMessage, FailoverRouter};
use orchestrator_tools::{resolve_placeholders, PlaceholderContext, ToolContext, ToolRegistry};
use serde_json::Value;
use std::sync::Arc;
use std::time::Instant;

const FILE_TOOLS: [&str; 5] = ["readPdf", "readExcel", "readDocx", "readText", "readCsv"];
const HISTORY_EXCHANGES_FOR_PROMPT: usize = 10;

/// LLM-driven intent classification, parameter extraction, chained tool
/// execution, access control and confidence gating — spec §4.2.
pub struct IntentRouter {
    registry: ToolRegistry,
    provider_router: Arc<FailoverRouter>,
    cache: IntentCache,
    history: ConversationHistoryStore,
}

impl IntentRouter {
    pub fn new(registry: ToolRegistry, provider_router: Arc<FailoverRouter>) -> Self {
        Self {
            registry,
            provider_router,
            cache: IntentCache::default(),
            history: ConversationHistoryStore::new(),
        }
    }

    pub async fn route(
        &self,
        message_content: &str,
        request: RequestContext,
        session_id: &str,
        settings: &UserToolSettings,
        now_ms: i64,
    ) -> PipelineResult {
        if settings.ai_router_mode == AiRouterMode::Disabled {
            return PipelineResult::no_action("skipped:ai_router_disabled");
        }

        let normalized = message_content.trim().to_lowercase();
        let enabled_ids = settings.sorted_enabled_tool_ids();
        let cache_key = IntentCache::key(&normalized, &enabled_ids);

        let decision = match self.cache.get(&cache_key).await {
            Some(cached) => cached,
            None => match self
                .classify(message_content, &request, session_id, settings)
                .await
            {
                Some(decision) => {
                    self.cache.put_if_confident(cache_key, decision.clone()).await;
                    decision
                }
                None => {
                    return self.clarify_result("I couldn't understand that — could you rephrase?");
                }
            },
        };

        if decision.confidence < settings.tool_confidence_threshold {
            return self.clarify_result(&decision.reasoning);
        }

        if settings.ai_router_mode == AiRouterMode::ClassifyOnly {
            return self.classify_only_result(&decision);
        }

        let bare_url = bare_url_in_message(message_content);
        let chain = self
            .execute_chain(&decision.tools, &request, settings, bare_url, now_ms)
            .await;

        let response = self.format_chain_response(&chain).await;
        self.history
            .append(
                &request.user_id,
                session_id,
                ConversationHistoryEntry::new(
                    message_content,
                    chain.all_results.first().map(|i| i.tool_id.clone()),
                    &response,
                    now_ms,
                ),
            )
            .await;

        PipelineResult::new(orchestrator_core::ResultType::ToolExecuted)
            .with_response(response)
            .with_metadata(serde_json::to_value(&chain).unwrap_or(Value::Null))
    }

    async fn classify(
        &self,
        message_content: &str,
        request: &RequestContext,
        session_id: &str,
        settings: &UserToolSettings,
    ) -> Option<RouteDecision> {
        let history = self.history.last(&request.user_id, session_id, HISTORY_EXCHANGES_FOR_PROMPT).await;
        let definitions = self.registry.definitions_for(&settings.sorted_enabled_tool_ids());

        let mut prompt = String::from(
            "You are a tool-routing assistant. Respond with a single JSON object matching \
             {\"tool\":string,\"parameters\":object,\"confidence\":number,\"reasoning\":string} or \
             {\"tools\":[{\"tool\":string,\"parameters\":object}],\"confidence\":number,\"reasoning\":string}. \
             Available tools:\n",
        );
        for def in &definitions {
            prompt.push_str(&format!("- {}: {}\n", def.id, def.description));
        }
        if !history.is_empty() {
            prompt.push_str("\nRecent conversation:\n");
            for entry in &history {
                prompt.push_str(&format!("user: {}\n", entry.user_message));
            }
        }
        prompt.push_str(&format!("\nMessage: {message_content}"));

        let request_msgs = vec![ChatMessage::system(prompt), ChatMessage::user(message_content)];
        let call_request = CallRequest {
            messages: request_msgs,
            user_id: Some(request.user_id.clone()),
            ..Default::default()
        };
        let opts = CallOptions::default().with_temperature(0.3).json();

        let result = self.provider_router.process(call_request, opts).await.ok()?;
        parse_route_decision(&result.content).ok()
    }

    async fn execute_chain(
        &self,
        planned: &[PlannedTool],
        request: &RequestContext,
        settings: &UserToolSettings,
        bare_url: Option<&str>,
        now_ms: i64,
    ) -> ToolChain {
        let mut chain = ToolChain::new();
        let mut search_results: Option<String> = None;
        let mut scraped_data: Option<String> = None;

        for planned_tool in planned {
            let rewritten_id = self.rewrite_tool_id(planned_tool, bare_url);

            let access = check_access(&rewritten_id, settings);
            if let AccessDecision::Blocked { reason } = access {
                let invocation = ToolInvocation::blocked(rewritten_id, planned_tool.parameters.clone(), reason);
                chain.push(invocation);
                continue;
            }

            let ctx_placeholders = PlaceholderContext {
                previous_output: chain.previous_output().map(|v| v.to_string()),
                search_results: search_results.clone(),
                scraped_data: scraped_data.clone(),
                ai_generated: None,
            };
            let resolved_params = resolve_placeholders(&planned_tool.parameters, &ctx_placeholders);

            let started = Instant::now();
            let mut invocation = ToolInvocation::pending(rewritten_id.clone(), resolved_params.clone());

            match self.registry.get(&rewritten_id) {
                Some(tool) => {
                    let tool_ctx = ToolContext::new(request.clone(), chain.clone());
                    match tool.call(&resolved_params, &tool_ctx).await {
                        Ok(output) => {
                            if rewritten_id == "searchWeb" {
                                search_results = Some(
                                    output
                                        .get("results")
                                        .map(|v| v.to_string())
                                        .unwrap_or_else(|| output.to_string()),
                                );
                            }
                            if rewritten_id == "fetchWebPage" || rewritten_id == "fetchJsPage" {
                                scraped_data = output.get("text").map(|v| v.to_string()).or(Some(output.to_string()));
                            }
                            invocation.success = true;
                            invocation.output = Some(output);
                        }
                        Err(err) => {
                            invocation.success = false;
                            invocation.error = Some(err.to_string());
                        }
                    }
                }
                None => {
                    invocation.success = false;
                    invocation.error = Some(format!("tool \"{rewritten_id}\" is not registered"));
                }
            }
            invocation.duration_ms = started.elapsed().as_millis() as u64;

            let should_stop = chain.should_stop_after(&invocation);
            chain.push(invocation);
            if should_stop {
                break;
            }
        }

        if let Some(summary) = self.summarize_if_file_tool(&chain, now_ms).await {
            if let Some(last) = chain.all_results.last_mut() {
                if let Some(output) = last.output.as_mut() {
                    if let Some(obj) = output.as_object_mut() {
                        obj.insert("summary".to_string(), Value::String(summary));
                    }
                }
            }
        }

        chain
    }

    fn rewrite_tool_id(&self, planned_tool: &PlannedTool, bare_url: Option<&str>) -> String {
        let url_param = planned_tool
            .parameters
            .get("url")
            .and_then(Value::as_str)
            .or(bare_url);
        ecommerce_auto_switch(&planned_tool.tool, url_param)
    }

    /// Spec §4.2 step 10: after the last tool, if it is a file reader and
    /// succeeded, synthesize a <=500-word summary via the provider router.
    async fn summarize_if_file_tool(&self, chain: &ToolChain, _now_ms: i64) -> Option<String> {
        let last = chain.all_results.last()?;
        if !last.success || !FILE_TOOLS.contains(&last.tool_id.as_str()) {
            return None;
        }
        let text = last.output.as_ref()?.get("text").and_then(Value::as_str)?;
        let prompt = format!(
            "Summarize the following document in 500 words or fewer, plain text only:\n\n{text}"
        );
        let call_request = CallRequest {
            messages: vec![ChatMessage::user(prompt)],
            ..Default::default()
        };
        let opts = CallOptions::default().with_temperature(0.3).with_max_tokens(1500);
        let result = self.provider_router.process(call_request, opts).await.ok()?;
        Some(result.content)
    }

    async fn format_chain_response(&self, chain: &ToolChain) -> String {
        let blocked_reasons: Vec<String> = chain
            .all_results
            .iter()
            .filter(|inv| inv.blocked)
            .filter_map(|inv| inv.block_reason.clone())
            .collect();

        let base = chain
            .all_results
            .last()
            .and_then(|inv| inv.output.as_ref())
            .map(format_output)
            .unwrap_or_else(|| "No tool produced a usable result.".to_string());

        append_blocked_notices(base, &blocked_reasons)
    }

    fn clarify_result(&self, question: &str) -> PipelineResult {
        PipelineResult::clarification(question)
    }

    fn classify_only_result(&self, decision: &RouteDecision) -> PipelineResult {
        let synthetic: Vec<Value> = decision
            .tools
            .iter()
            .map(|t| {
                serde_json::json!({
                    "toolId": t.tool,
                    "parameters": t.parameters,
                    "error": "Not executed (classify_only mode)",
                })
            })
            .collect();
        PipelineResult::new(orchestrator_core::ResultType::ToolExecuted).with_metadata(serde_json::json!({
            "classifyOnly": true,
            "confidence": decision.confidence,
            "reasoning": decision.reasoning,
            "tools": synthetic,
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rewrite_tool_id_applies_ecommerce_switch() {
        let registry = ToolRegistry::new();
        let provider_router = Arc::new(FailoverRouter::new(
            orchestrator_provider::FailoverConfig::default(),
            orchestrator_provider::HealthTable::default(),
        ));
        let router = IntentRouter::new(registry, provider_router);
        let planned = PlannedTool {
            tool: "fetchWebPage".to_string(),
            parameters: {
                let mut m = orchestrator_core::Parameters::new();
                m.insert("url".into(), Value::String("https://shopee.tw/xyz".into()));
                m
            },
        };
        assert_eq!(router.rewrite_tool_id(&planned, None), "fetchJsPage");
    }
}
