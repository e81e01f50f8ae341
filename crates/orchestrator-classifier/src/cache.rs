use orchestrator_core::{Classification, Fingerprint};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const DEFAULT_TTL: Duration = Duration::from_secs(300);
const MAX_ENTRIES: usize = 1000;

struct Entry {
    classification: Classification,
    cached_at: Instant,
}

/// Memoizes `classify()` by a `(platform, content)` fingerprint. Distinct
/// from the intent router's tool-routing cache in `orchestrator-router` —
/// this one only ever stores the cheap rule-based SKIP/PASSIVE/ACTIVE
/// call, matching the "Classifier + cache" line item in spec §2.
#[derive(Clone)]
pub struct ClassificationCache {
    ttl: Duration,
    entries: Arc<Mutex<HashMap<Fingerprint, Entry>>>,
}

impl Default for ClassificationCache {
    fn default() -> Self {
        Self {
            ttl: DEFAULT_TTL,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl ClassificationCache {
    pub fn fingerprint(platform: &str, content: &str) -> Fingerprint {
        Fingerprint::of_parts(&[platform, content])
    }

    pub async fn get(&self, key: &Fingerprint) -> Option<Classification> {
        let entries = self.entries.lock().await;
        entries.get(key).and_then(|entry| {
            if entry.cached_at.elapsed() < self.ttl {
                Some(entry.classification.clone())
            } else {
                None
            }
        })
    }

    pub async fn put(&self, key: Fingerprint, classification: Classification) {
        let mut entries = self.entries.lock().await;
        if entries.len() >= MAX_ENTRIES && !entries.contains_key(&key) {
            // Oldest-first eviction.
            if let Some(oldest) = entries
                .iter()
                .min_by_key(|(_, e)| e.cached_at)
                .map(|(k, _)| k.clone())
            {
                entries.remove(&oldest);
            }
        }
        entries.insert(
            key,
            Entry {
                classification,
                cached_at: Instant::now(),
            },
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchestrator_core::Intent;

    #[tokio::test]
    async fn evicts_oldest_when_full() {
        let cache = ClassificationCache {
            ttl: DEFAULT_TTL,
            entries: Arc::new(Mutex::new(HashMap::new())),
        };
        for i in 0..1000 {
            let key = Fingerprint::of_parts(&["wa", &i.to_string()]);
            cache
                .put(key, Classification::new(Intent::Active, "r", "s"))
                .await;
        }
        let first_key = Fingerprint::of_parts(&["wa", "0"]);
        assert!(cache.get(&first_key).await.is_some());
        // One more insert should evict the oldest entry.
        let overflow_key = Fingerprint::of_parts(&["wa", "overflow"]);
        cache
            .put(overflow_key.clone(), Classification::new(Intent::Active, "r", "s"))
            .await;
        assert!(cache.get(&overflow_key).await.is_some());
        assert_eq!(cache.entries.lock().await.len(), 1000);
    }
}
