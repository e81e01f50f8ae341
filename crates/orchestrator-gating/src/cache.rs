use crate::config::GatingConfig;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const DEFAULT_TTL: Duration = Duration::from_secs(60);

#[async_trait::async_trait]
pub trait GatingConfigStore: Send + Sync {
    async fn load(&self, user_id: &str) -> Result<GatingConfig, crate::error::GatingError>;
}

/// Mutex-protected, ~60s-TTL in-memory cache in front of the persisted
/// per-user gating config, per spec §4.7 / §5.
#[derive(Clone)]
pub struct GatingConfigCache {
    store: Arc<dyn GatingConfigStore>,
    ttl: Duration,
    entries: Arc<Mutex<HashMap<String, (Instant, GatingConfig)>>>,
}

impl GatingConfigCache {
    pub fn new(store: Arc<dyn GatingConfigStore>) -> Self {
        Self {
            store,
            ttl: DEFAULT_TTL,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    pub async fn get(&self, user_id: &str) -> Result<GatingConfig, crate::error::GatingError> {
        {
            let entries = self.entries.lock().await;
            if let Some((cached_at, config)) = entries.get(user_id) {
                if cached_at.elapsed() < self.ttl {
                    return Ok(config.clone());
                }
            }
        }
        let config = self.store.load(user_id).await?;
        let mut entries = self.entries.lock().await;
        entries.insert(user_id.to_string(), (Instant::now(), config.clone()));
        Ok(config)
    }

    pub async fn invalidate(&self, user_id: &str) {
        self.entries.lock().await.remove(user_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl GatingConfigStore for CountingStore {
        async fn load(&self, _user_id: &str) -> Result<GatingConfig, crate::error::GatingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(GatingConfig::default())
        }
    }

    #[tokio::test]
    async fn caches_within_ttl() {
        let store = Arc::new(CountingStore {
            calls: AtomicUsize::new(0),
        });
        let cache = GatingConfigCache::new(store.clone());
        cache.get("u1").await.unwrap();
        cache.get("u1").await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn invalidate_forces_reload() {
        let store = Arc::new(CountingStore {
            calls: AtomicUsize::new(0),
        });
        let cache = GatingConfigCache::new(store.clone());
        cache.get("u1").await.unwrap();
        cache.invalidate("u1").await;
        cache.get("u1").await.unwrap();
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }
}
