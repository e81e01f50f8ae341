use crate::parse::RouteDecision;
use orchestrator_core::Fingerprint;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const DEFAULT_TTL: Duration = Duration::from_secs(300);
const MAX_ENTRIES: usize = 1000;

struct Entry {
    decision: RouteDecision,
    cached_at: Instant,
}

/// Intent Cache Entry (spec §3), keyed on `(normalized_message,
/// sorted_enabled_tool_ids)`. Distinct from
/// `orchestrator-classifier::ClassificationCache`, which only memoizes the
/// cheap rule-based SKIP/PASSIVE/ACTIVE tag; this one memoizes the
/// LLM-driven routing decision (tool/parameters/confidence) so repeated
/// near-identical prompts skip the model call entirely.
#[derive(Clone)]
pub struct IntentCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<Fingerprint, Entry>>>,
}

impl Default for IntentCache {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl IntentCache {
    pub fn key(normalized_message: &str, sorted_enabled_tool_ids: &[String]) -> Fingerprint {
        let joined = sorted_enabled_tool_ids.join(",");
        Fingerprint::of_parts(&[normalized_message, &joined])
    }

    pub async fn get(&self, key: &Fingerprint) -> Option<RouteDecision> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|entry| {
            if entry.cached_at.elapsed() < self.ttl {
                Some(entry.decision.clone())
            } else {
                None
            }
        })
    }

    /// Only cache decisions with confidence >= 0.80, per spec §4.2 step 5.
    pub async fn put_if_confident(&self, key: Fingerprint, decision: RouteDecision) {
        if decision.confidence < 0.80 {
            return;
        }
        let mut entries = self.entries.lock().await;
        if entries.len() >= MAX_ENTRIES && !entries.contains_key(&key) {
            if let Some(oldest) = entries.iter().min_by_key(|(_, e)| e.cached_at).map(|(k, _)| k.clone()) {
                entries.remove(&oldest);
            }
        }
        entries.insert(key, Entry { decision, cached_at: Instant::now() });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::PlannedTool;
    use serde_json::Map;

    fn decision(confidence: f32) -> RouteDecision {
        RouteDecision {
            tools: vec![PlannedTool { tool: "searchWeb".into(), parameters: Map::new() }],
            confidence,
            reasoning: "r".into(),
        }
    }

    #[tokio::test]
    async fn low_confidence_decisions_are_not_cached() {
        let cache = IntentCache::default();
        let key = IntentCache::key("hi", &["*".into()]);
        cache.put_if_confident(key.clone(), decision(0.5)).await;
        assert!(cache.get(&key).await.is_none());
    }

    #[tokio::test]
    async fn confident_decisions_are_cached_and_retrievable() {
        let cache = IntentCache::default();
        let key = IntentCache::key("hi", &["*".into()]);
        cache.put_if_confident(key.clone(), decision(0.9)).await;
        assert!(cache.get(&key).await.is_some());
    }
}
