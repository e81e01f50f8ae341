use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

/// Consecutive-failure threshold before a provider's circuit opens.
const DEFAULT_FAILURE_THRESHOLD: u32 = 3;
/// How long a circuit stays open before the provider is tried again
/// (half-open probe on the next chain walk).
const DEFAULT_COOLDOWN: Duration = Duration::from_secs(60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

#[derive(Debug, Clone)]
pub struct ProviderHealth {
    pub last_ok_at: Option<Instant>,
    pub consecutive_failures: u32,
    opened_at: Option<Instant>,
}

impl Default for ProviderHealth {
    fn default() -> Self {
        Self {
            last_ok_at: None,
            consecutive_failures: 0,
            opened_at: None,
        }
    }
}

impl ProviderHealth {
    pub fn circuit_state(&self, cooldown: Duration) -> CircuitState {
        match self.opened_at {
            None => CircuitState::Closed,
            Some(opened_at) if opened_at.elapsed() >= cooldown => CircuitState::HalfOpen,
            Some(_) => CircuitState::Open,
        }
    }
}

/// Per-provider health, mutex-protected for concurrent read/write across
/// tasks — see spec §5's shared-resource policy.
#[derive(Clone)]
pub struct HealthTable {
    inner: Arc<Mutex<HashMap<String, ProviderHealth>>>,
    failure_threshold: u32,
    cooldown: Duration,
}

impl Default for HealthTable {
    fn default() -> Self {
        Self::new(DEFAULT_FAILURE_THRESHOLD, DEFAULT_COOLDOWN)
    }
}

impl HealthTable {
    pub fn new(failure_threshold: u32, cooldown: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            failure_threshold,
            cooldown,
        }
    }

    pub async fn record_success(&self, tag: &str) {
        let mut table = self.inner.lock().await;
        let entry = table.entry(tag.to_string()).or_default();
        entry.last_ok_at = Some(Instant::now());
        entry.consecutive_failures = 0;
        entry.opened_at = None;
    }

    pub async fn record_failure(&self, tag: &str) {
        let mut table = self.inner.lock().await;
        let entry = table.entry(tag.to_string()).or_default();
        entry.consecutive_failures += 1;
        if entry.consecutive_failures >= self.failure_threshold && entry.opened_at.is_none() {
            entry.opened_at = Some(Instant::now());
        }
    }

    /// A provider is usable if its circuit is closed or half-open (the
    /// half-open probe is what lets a cooled-down provider back into the
    /// chain without an explicit reset).
    pub async fn is_available(&self, tag: &str) -> bool {
        let table = self.inner.lock().await;
        match table.get(tag) {
            None => true,
            Some(entry) => entry.circuit_state(self.cooldown) != CircuitState::Open,
        }
    }

    pub async fn snapshot(&self, tag: &str) -> ProviderHealth {
        self.inner.lock().await.get(tag).cloned().unwrap_or_default()
    }

    /// Every provider tag the table has ever recorded a success or
    /// failure for, used by `/status`-style reporting.
    pub async fn tags(&self) -> Vec<String> {
        self.inner.lock().await.keys().cloned().collect()
    }
}
