use orchestrator_core::{Fingerprint, UnifiedMessage};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

const WINDOW: Duration = Duration::from_secs(5);

/// Exactly-once-per-window dedup over `(platform, from, id)` — spec §4.1
/// step 2 and the "Deduplication" testable property. Mutex-protected per
/// spec §5's shared-resource policy; entries outside the 5s window are
/// swept lazily on each check so the table never grows unbounded under
/// sustained traffic.
#[derive(Clone, Default)]
pub struct DedupTable {
    seen: Arc<Mutex<HashMap<Fingerprint, Instant>>>,
}

impl DedupTable {
    pub fn new() -> Self {
        Self::default()
    }

    fn fingerprint(message: &UnifiedMessage) -> Fingerprint {
        Fingerprint::of_parts(&[&message.platform.0, &message.from, &message.id])
    }

    /// Returns `true` if this `(platform, from, id)` was already seen
    /// within the window (the caller should return a duplicate
    /// `NO_ACTION`); otherwise marks it as in-flight and returns `false`.
    pub async fn check_and_mark(&self, message: &UnifiedMessage) -> bool {
        let key = Self::fingerprint(message);
        let mut seen = self.seen.lock().await;
        seen.retain(|_, at| at.elapsed() < WINDOW);
        if seen.contains_key(&key) {
            return true;
        }
        seen.insert(key, Instant::now());
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collaborators::test_support::text_message;

    #[tokio::test]
    async fn second_identical_message_within_window_is_a_duplicate() {
        let table = DedupTable::new();
        let message = text_message("hi");
        assert!(!table.check_and_mark(&message).await);
        assert!(table.check_and_mark(&message).await);
    }

    #[tokio::test]
    async fn different_ids_are_independent() {
        let table = DedupTable::new();
        let mut a = text_message("hi");
        a.id = "a".into();
        let mut b = text_message("hi");
        b.id = "b".into();
        assert!(!table.check_and_mark(&a).await);
        assert!(!table.check_and_mark(&b).await);
    }
}
