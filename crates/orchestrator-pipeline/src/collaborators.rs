use crate::error::PipelineError;
use async_trait::async_trait;
use orchestrator_classifier::AgentClassifyConfig;
use orchestrator_core::{RequestContext, UnifiedMessage};
use orchestrator_flows::{FlowInput, FlowTrigger};
use orchestrator_router::UserToolSettings;

/// One of a user's configured auto-respond agents: if `content` contains
/// any of `keywords` (case-insensitive), spec §4.1 step 10 delegates the
/// turn to it rather than running the direct AI fallback.
#[derive(Debug, Clone)]
pub struct SwarmAgent {
    pub agent_id: String,
    pub name: String,
    pub keywords: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct FlowSummary {
    pub flow_id: String,
    pub name: String,
    pub enabled: bool,
}

#[derive(Debug, Clone)]
pub struct AgentSummary {
    pub agent_id: String,
    pub name: String,
    pub processing_mode: String,
}

/// The persistent database (spec §1: out of scope, "contracts only in
/// §6"). Everything the pipeline needs to read that isn't already covered
/// by a dedicated collaborator trait (gating config, rate limits,
/// conversation history, intent cache) lives behind this one contract,
/// mirroring spec §6's single `Database` line item.
#[async_trait]
pub trait Database: Send + Sync {
    async fn user_tool_settings(&self, user_id: &str) -> Result<UserToolSettings, PipelineError>;

    async fn classify_config(&self, agent_id: Option<&str>) -> Result<AgentClassifyConfig, PipelineError>;

    async fn agent_name(&self, agent_id: Option<&str>) -> Result<String, PipelineError>;

    /// Whether `message` is a reply to a message the bot itself sent —
    /// used by the mention gate's reply-to-bot bypass (spec §4.7 gate 3).
    async fn is_reply_to_bot(&self, message: &UnifiedMessage) -> Result<bool, PipelineError>;

    /// Active flow triggers whose platform/type could plausibly apply to
    /// this turn; final filter evaluation happens in
    /// `orchestrator_flows::first_match`.
    async fn flow_triggers(&self, context: &RequestContext) -> Result<Vec<FlowTrigger>, PipelineError>;

    async fn swarm_agents(&self, user_id: &str) -> Result<Vec<SwarmAgent>, PipelineError>;

    async fn list_flows(&self, user_id: &str) -> Result<Vec<FlowSummary>, PipelineError>;

    async fn list_agents(&self, user_id: &str) -> Result<Vec<AgentSummary>, PipelineError>;
}

/// The flow execution engine (spec §1: out of scope, "contracts only in
/// §6"). On a trigger match the pipeline hands off a [`FlowInput`] and
/// propagates whatever user-facing text the flow produced.
#[async_trait]
pub trait FlowEngine: Send + Sync {
    async fn execute(&self, input: FlowInput) -> Result<String, PipelineError>;
}

/// The retrieval-augmented-generation ingestion pipeline (spec §1: out of
/// scope). PASSIVE messages are hand off fire-and-forget per spec §4.1
/// step 4 — the pipeline never awaits this beyond spawning the task.
#[async_trait]
pub trait Ingestor: Send + Sync {
    async fn ingest(&self, message: UnifiedMessage, context: RequestContext) -> Result<(), PipelineError>;
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use orchestrator_core::ContentType;

    /// Minimal in-memory stand-in for [`Database`] used by pipeline tests:
    /// every list is empty, settings/configs are defaults, nothing is ever
    /// a reply to the bot.
    #[derive(Default)]
    pub struct InMemoryDatabase {
        pub settings: UserToolSettings,
        pub classify_config: AgentClassifyConfig,
        pub agent_name: String,
        pub triggers: Vec<FlowTrigger>,
        pub swarm: Vec<SwarmAgent>,
    }

    #[async_trait]
    impl Database for InMemoryDatabase {
        async fn user_tool_settings(&self, _user_id: &str) -> Result<UserToolSettings, PipelineError> {
            Ok(self.settings.clone())
        }

        async fn classify_config(&self, _agent_id: Option<&str>) -> Result<AgentClassifyConfig, PipelineError> {
            Ok(self.classify_config.clone())
        }

        async fn agent_name(&self, _agent_id: Option<&str>) -> Result<String, PipelineError> {
            Ok(self.agent_name.clone())
        }

        async fn is_reply_to_bot(&self, _message: &UnifiedMessage) -> Result<bool, PipelineError> {
            Ok(false)
        }

        async fn flow_triggers(&self, _context: &RequestContext) -> Result<Vec<FlowTrigger>, PipelineError> {
            Ok(self.triggers.clone())
        }

        async fn swarm_agents(&self, _user_id: &str) -> Result<Vec<SwarmAgent>, PipelineError> {
            Ok(self.swarm.clone())
        }

        async fn list_flows(&self, _user_id: &str) -> Result<Vec<FlowSummary>, PipelineError> {
            Ok(Vec::new())
        }

        async fn list_agents(&self, _user_id: &str) -> Result<Vec<AgentSummary>, PipelineError> {
            Ok(Vec::new())
        }
    }

    pub struct NoopFlowEngine;

    #[async_trait]
    impl FlowEngine for NoopFlowEngine {
        async fn execute(&self, input: FlowInput) -> Result<String, PipelineError> {
            Ok(format!("flow {} executed", input.flow_id))
        }
    }

    #[derive(Default)]
    pub struct NoopIngestor;

    #[async_trait]
    impl Ingestor for NoopIngestor {
        async fn ingest(&self, _message: UnifiedMessage, _context: RequestContext) -> Result<(), PipelineError> {
            Ok(())
        }
    }

    pub fn text_message(content: &str) -> UnifiedMessage {
        UnifiedMessage {
            id: "m1".into(),
            platform: orchestrator_core::Platform::new("wa"),
            external_id: None,
            conversation_id: "c1".into(),
            from: "u1".into(),
            to: None,
            content: content.to_string(),
            content_type: ContentType::Text,
            media_url: None,
            mime_type: None,
            sender: orchestrator_core::Sender::default(),
            is_group: false,
            group_id: None,
            group_name: None,
            from_me: false,
            timestamp: 0,
            metadata: Default::default(),
        }
    }
}
