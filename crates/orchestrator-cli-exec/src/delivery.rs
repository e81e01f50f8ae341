use crate::error::CliExecError;
use crate::record::GeneratedFile;
use async_trait::async_trait;

/// Where a completed execution's result should go, resolved once on exit.
/// Mirrors the three branches of spec §4.4's "result delivery" step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    NotNeeded,
    Recalled,
    Direct,
}

/// Context carried from `start()` describing where to deliver a result, if
/// anywhere. `None` means the caller fired-and-forgot the execution.
#[derive(Debug, Clone, Default)]
pub struct DeliveryContext {
    pub agent_id: Option<String>,
    pub conversation_id: Option<String>,
}

impl DeliveryContext {
    pub fn none() -> Self {
        Self::default()
    }

    fn is_recall(&self) -> bool {
        self.agent_id.is_some() && self.conversation_id.is_some()
    }
}

pub struct RecallContext {
    pub tracking_id: String,
    pub agent_id: String,
    pub conversation_id: String,
    pub summary: String,
    pub files: Vec<GeneratedFile>,
}

pub struct DirectContext {
    pub tracking_id: String,
    pub user_id: String,
    pub files: Vec<GeneratedFile>,
}

/// Delivers a finished execution's result back into the rest of the
/// system. Recall mode re-enters the owning agent's reasoning loop; direct
/// mode enqueues files (and a listing message) straight to the delivery
/// queue. Kept as a narrow capability trait, injected at construction, the
/// same pattern used for `MessageDispatcher` in `orchestrator-tools`.
#[async_trait]
pub trait ResultDeliverer: Send + Sync {
    async fn recall(&self, ctx: RecallContext) -> Result<(), CliExecError>;
    async fn direct(&self, ctx: DirectContext) -> Result<(), CliExecError>;
}

/// Resolves delivery for one finished execution. `delivery` is `None` when
/// the caller fired-and-forgot the run; otherwise recall mode is used when
/// both an agent and a conversation id are present, direct mode otherwise.
pub(crate) async fn deliver(
    deliverer: &dyn ResultDeliverer,
    delivery: Option<&DeliveryContext>,
    tracking_id: &str,
    user_id: &str,
    summary: String,
    files: Vec<GeneratedFile>,
) -> Result<DeliveryOutcome, CliExecError> {
    let Some(delivery) = delivery else {
        return Ok(DeliveryOutcome::NotNeeded);
    };
    if delivery.is_recall() {
        deliverer
            .recall(RecallContext {
                tracking_id: tracking_id.to_string(),
                agent_id: delivery.agent_id.clone().expect("checked by is_recall"),
                conversation_id: delivery.conversation_id.clone().expect("checked by is_recall"),
                summary,
                files,
            })
            .await?;
        Ok(DeliveryOutcome::Recalled)
    } else {
        deliverer
            .direct(DirectContext {
                tracking_id: tracking_id.to_string(),
                user_id: user_id.to_string(),
                files,
            })
            .await?;
        Ok(DeliveryOutcome::Direct)
    }
}
