use crate::chat::{CallOptions, ChatMessage, ProviderResponse};
use crate::error::ProviderError;
use async_trait::async_trait;

/// The uniform client surface over local, remote and CLI-backed model
/// backends, per spec §6: `call({messages, temperature?, maxTokens?}) ->
/// {content, model, usage}`.
#[async_trait]
pub trait LLMProvider: Send + Sync {
    /// Stable tag used in failover chains and health tracking, e.g.
    /// `"local"`, `"remote-free"`, `"cli-claude"`.
    fn tag(&self) -> &str;

    async fn call(
        &self,
        messages: &[ChatMessage],
        opts: &CallOptions,
    ) -> Result<ProviderResponse, ProviderError>;

    /// Cheap capability ping used by the ~60s health monitor. Defaults to
    /// `Ok(())`, i.e. "assume healthy" for providers that don't expose a
    /// dedicated probe.
    async fn health_check(&self) -> Result<(), ProviderError> {
        Ok(())
    }
}
