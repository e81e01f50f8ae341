use crate::chat::{CallOptions, ChatMessage, ProviderResponse};
use crate::health::HealthTable;
use crate::provider::LLMProvider;
use crate::tier::{TaskClassifier, TaskTier, TierResult};
use log::{info, warn};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Ordered provider tags for each tier. Only one row is "active" in the
/// persisted `ai_failover_config` table (spec §3); this in-memory type is
/// that row's runtime shape.
#[derive(Debug, Clone)]
pub struct FailoverConfig {
    chains: HashMap<TaskTier, Vec<String>>,
}

impl Default for FailoverConfig {
    fn default() -> Self {
        use TaskTier::*;
        let mut chains = HashMap::new();
        chains.insert(Trivial, vec!["local", "remote-free", "cli-opencode"]);
        chains.insert(Simple, vec!["remote-free", "local", "cli-opencode"]);
        chains.insert(Moderate, vec!["remote-free", "cli-opencode", "cli-gemini"]);
        chains.insert(Complex, vec!["cli-claude", "cli-gemini", "cli-opencode", "remote-free"]);
        chains.insert(Critical, vec!["cli-claude", "cli-gemini", "cli-opencode", "remote-free"]);
        Self {
            chains: chains
                .into_iter()
                .map(|(k, v)| (k, v.into_iter().map(String::from).collect()))
                .collect(),
        }
    }
}

impl FailoverConfig {
    pub fn chain_for(&self, tier: TaskTier) -> Vec<String> {
        self.chains.get(&tier).cloned().unwrap_or_default()
    }

    pub fn set_chain(&mut self, tier: TaskTier, chain: Vec<String>) {
        self.chains.insert(tier, chain);
    }
}

#[derive(Debug, Default, Clone)]
pub struct CallRequest {
    pub messages: Vec<ChatMessage>,
    pub user_id: Option<String>,
    pub force_tier: Option<TaskTier>,
    pub prefer_free: bool,
}

#[derive(Debug, Clone)]
pub struct CallResult {
    pub content: String,
    pub model: String,
    pub provider: String,
    pub usage: Option<crate::chat::Usage>,
    pub classification: TierResult,
}

/// Task tiering, ordered provider chain with health tracking, model
/// selection and a uniform call surface — spec §4.3.
pub struct FailoverRouter {
    providers: HashMap<String, Arc<dyn LLMProvider>>,
    config: FailoverConfig,
    health: HealthTable,
}

impl FailoverRouter {
    pub fn new(config: FailoverConfig, health: HealthTable) -> Self {
        Self {
            providers: HashMap::new(),
            config,
            health,
        }
    }

    pub fn register(&mut self, provider: Arc<dyn LLMProvider>) {
        self.providers.insert(provider.tag().to_string(), provider);
    }

    pub fn health(&self) -> &HealthTable {
        &self.health
    }

    pub async fn process(&self, request: CallRequest, opts: CallOptions) -> Result<CallResult, crate::error::ProviderError> {
        let task_text = request
            .messages
            .iter()
            .map(|m| m.content.as_str())
            .collect::<Vec<_>>()
            .join("\n");
        let classification = TaskClassifier::classify(&task_text, request.force_tier);

        let mut chain = self.config.chain_for(classification.tier);
        if request.prefer_free {
            chain.sort_by_key(|tag| !tag.contains("free"));
        }

        let mut attempted = Vec::new();
        for tag in &chain {
            if !self.health.is_available(tag).await {
                info!("provider {tag} skipped: circuit open");
                continue;
            }
            let Some(provider) = self.providers.get(tag) else {
                warn!("provider {tag} listed in failover chain but not registered");
                continue;
            };
            attempted.push(tag.clone());
            match provider.call(&request.messages, &opts).await {
                Ok(ProviderResponse { content, model, usage }) => {
                    self.health.record_success(tag).await;
                    return Ok(CallResult {
                        content,
                        model,
                        provider: tag.clone(),
                        usage,
                        classification,
                    });
                }
                Err(err) => {
                    warn!("provider {tag} failed: {err}");
                    self.health.record_failure(tag).await;
                }
            }
        }

        Err(crate::error::ProviderError::Provider(format!(
            "all providers in chain exhausted, attempted: {attempted:?}"
        )))
    }

    /// Spawn the ~60s health-ping ticker described in spec §4.3 and the
    /// lazy-singleton design note in §9. Returns a handle the composition
    /// root aborts on `shutdown()`.
    pub fn spawn_health_monitor(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let router = Arc::clone(self);
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                for (tag, provider) in &router.providers {
                    match provider.health_check().await {
                        Ok(()) => router.health.record_success(tag).await,
                        Err(err) => {
                            warn!("health check failed for {tag}: {err}");
                            router.health.record_failure(tag).await;
                        }
                    }
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ProviderResponse;
    use crate::error::ProviderError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FlakyProvider {
        tag: &'static str,
        fail_times: AtomicUsize,
    }

    #[async_trait]
    impl LLMProvider for FlakyProvider {
        fn tag(&self) -> &str {
            self.tag
        }

        async fn call(&self, _messages: &[ChatMessage], _opts: &CallOptions) -> Result<ProviderResponse, ProviderError> {
            if self.fail_times.load(Ordering::SeqCst) > 0 {
                self.fail_times.fetch_sub(1, Ordering::SeqCst);
                return Err(ProviderError::Provider("simulated failure".into()));
            }
            Ok(ProviderResponse {
                content: "ok".into(),
                model: self.tag.to_string(),
                usage: None,
            })
        }
    }

    #[tokio::test]
    async fn falls_through_to_next_provider_on_failure() {
        let mut config = FailoverConfig::default();
        config.set_chain(TaskTier::Trivial, vec!["a".into(), "b".into()]);
        let mut router = FailoverRouter::new(config, HealthTable::default());
        router.register(Arc::new(FlakyProvider {
            tag: "a",
            fail_times: AtomicUsize::new(10),
        }));
        router.register(Arc::new(FlakyProvider {
            tag: "b",
            fail_times: AtomicUsize::new(0),
        }));

        let result = router
            .process(
                CallRequest {
                    messages: vec![ChatMessage::user("hi")],
                    force_tier: Some(TaskTier::Trivial),
                    ..Default::default()
                },
                CallOptions::default(),
            )
            .await
            .unwrap();
        assert_eq!(result.provider, "b");
    }

    #[tokio::test]
    async fn all_providers_failing_surfaces_error() {
        let mut config = FailoverConfig::default();
        config.set_chain(TaskTier::Trivial, vec!["a".into()]);
        let mut router = FailoverRouter::new(config, HealthTable::default());
        router.register(Arc::new(FlakyProvider {
            tag: "a",
            fail_times: AtomicUsize::new(10),
        }));

        let err = router
            .process(
                CallRequest {
                    messages: vec![ChatMessage::user("hi")],
                    force_tier: Some(TaskTier::Trivial),
                    ..Default::default()
                },
                CallOptions::default(),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ProviderError::Provider(_)));
    }
}
