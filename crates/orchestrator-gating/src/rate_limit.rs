use async_trait::async_trait;

/// External KV store contract for rate-limit counters (spec §6): atomic
/// `incr` + `expire`, window set on first increment.
#[async_trait]
pub trait RateLimitStore: Send + Sync {
    /// Increments the counter for `key`, setting its expiry to
    /// `window_seconds` if this is the first increment in the window.
    /// Returns the counter's new value.
    async fn incr(&self, key: &str, window_seconds: u64) -> Result<u64, crate::error::GatingError>;
}

/// In-memory store used for tests and for single-process deployments
/// without an external KV dependency.
#[derive(Default)]
pub struct InMemoryRateLimitStore {
    counters: tokio::sync::Mutex<std::collections::HashMap<String, (u64, std::time::Instant, u64)>>,
}

#[async_trait]
impl RateLimitStore for InMemoryRateLimitStore {
    async fn incr(&self, key: &str, window_seconds: u64) -> Result<u64, crate::error::GatingError> {
        let mut counters = self.counters.lock().await;
        let now = std::time::Instant::now();
        let entry = counters.entry(key.to_string()).or_insert((0, now, window_seconds));
        if entry.1.elapsed().as_secs() >= entry.2 {
            *entry = (0, now, window_seconds);
        }
        entry.0 += 1;
        Ok(entry.0)
    }
}
