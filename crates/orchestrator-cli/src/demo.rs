//! Minimal in-process stand-ins for the out-of-scope collaborators named
//! in spec §1/§6 (database, flow engine, ingestion pipeline, delivery
//! queue). Real deployments inject production adapters that satisfy the
//! same traits; this binary exists for local health checks and
//! single-message replay, so it wires up the cheapest thing that makes
//! the pipeline actually runnable end to end.

use async_trait::async_trait;
use orchestrator_classifier::AgentClassifyConfig;
use orchestrator_cli_exec::{CliExecError, DirectContext, RecallContext, ResultDeliverer};
use orchestrator_core::{RequestContext, UnifiedMessage};
use orchestrator_flows::{FlowInput, FlowTrigger};
use orchestrator_pipeline::{AgentSummary, Database, FlowSummary, Ingestor, PipelineError, SwarmAgent};
use orchestrator_provider::{CallOptions, ChatMessage, LLMProvider, ProviderError, ProviderResponse};
use orchestrator_router::UserToolSettings;

/// A database with nothing configured: every user gets default settings,
/// there are no flows/swarm agents, and nothing is ever a reply to the
/// bot. Good enough to exercise the full pipeline shape without a real
/// persistence layer.
#[derive(Default)]
pub struct EmptyDatabase;

#[async_trait]
impl Database for EmptyDatabase {
    async fn user_tool_settings(&self, _user_id: &str) -> Result<UserToolSettings, PipelineError> {
        Ok(UserToolSettings::default())
    }

    async fn classify_config(&self, _agent_id: Option<&str>) -> Result<AgentClassifyConfig, PipelineError> {
        Ok(AgentClassifyConfig::default())
    }

    async fn agent_name(&self, _agent_id: Option<&str>) -> Result<String, PipelineError> {
        Ok(String::new())
    }

    async fn is_reply_to_bot(&self, _message: &UnifiedMessage) -> Result<bool, PipelineError> {
        Ok(false)
    }

    async fn flow_triggers(&self, _context: &RequestContext) -> Result<Vec<FlowTrigger>, PipelineError> {
        Ok(Vec::new())
    }

    async fn swarm_agents(&self, _user_id: &str) -> Result<Vec<SwarmAgent>, PipelineError> {
        Ok(Vec::new())
    }

    async fn list_flows(&self, _user_id: &str) -> Result<Vec<FlowSummary>, PipelineError> {
        Ok(Vec::new())
    }

    async fn list_agents(&self, _user_id: &str) -> Result<Vec<AgentSummary>, PipelineError> {
        Ok(Vec::new())
    }
}

/// No flow engine configured; `EmptyDatabase::flow_triggers` never
/// returns a candidate so this is never actually invoked, but the
/// pipeline still requires a collaborator to construct.
pub struct NoopFlowEngine;

#[async_trait]
impl orchestrator_pipeline::FlowEngine for NoopFlowEngine {
    async fn execute(&self, input: FlowInput) -> Result<String, PipelineError> {
        Ok(format!("flow {} executed", input.flow_id))
    }
}

/// Logs and discards. A real deployment wires this to the
/// retrieval-augmented-generation ingestion pipeline (spec §1, out of
/// scope here).
#[derive(Default)]
pub struct LoggingIngestor;

#[async_trait]
impl Ingestor for LoggingIngestor {
    async fn ingest(&self, message: UnifiedMessage, _context: RequestContext) -> Result<(), PipelineError> {
        tracing::info!(message_id = %message.id, "passive message handed to ingestion (demo: discarded)");
        Ok(())
    }
}

/// Logs delivery instead of enqueuing to a real delivery queue.
#[derive(Default)]
pub struct LoggingDeliverer;

#[async_trait]
impl ResultDeliverer for LoggingDeliverer {
    async fn recall(&self, ctx: RecallContext) -> Result<(), CliExecError> {
        tracing::info!(
            tracking_id = %ctx.tracking_id,
            agent_id = %ctx.agent_id,
            conversation_id = %ctx.conversation_id,
            files = ctx.files.len(),
            "recall delivery (demo: logged, not dispatched)"
        );
        Ok(())
    }

    async fn direct(&self, ctx: DirectContext) -> Result<(), CliExecError> {
        tracing::info!(
            tracking_id = %ctx.tracking_id,
            user_id = %ctx.user_id,
            files = ctx.files.len(),
            "direct delivery (demo: logged, not dispatched)"
        );
        Ok(())
    }
}

/// Deterministic echo provider standing in for the "local" tier-0
/// backend: no model call, always succeeds. Lets `replay`/`health` run
/// without any real provider credentials configured.
pub struct LocalEchoProvider;

#[async_trait]
impl LLMProvider for LocalEchoProvider {
    fn tag(&self) -> &str {
        "local"
    }

    async fn call(&self, messages: &[ChatMessage], _opts: &CallOptions) -> Result<ProviderResponse, ProviderError> {
        let last_user = messages
            .iter()
            .rev()
            .find(|m| matches!(m.role, orchestrator_provider::ChatRole::User))
            .map(|m| m.content.as_str())
            .unwrap_or("");
        Ok(ProviderResponse {
            content: format!("[local echo] {last_user}"),
            model: "local-echo".to_string(),
            usage: None,
        })
    }
}
