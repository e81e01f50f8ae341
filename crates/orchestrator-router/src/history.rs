use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Mutex;

const MAX_ENTRIES_PER_SESSION: usize = 20;
const MAX_USER_MESSAGE_CHARS: usize = 200;
const MAX_SUMMARY_CHARS: usize = 100;

fn truncate_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        s.chars().take(max).collect()
    }
}

#[derive(Debug, Clone)]
pub struct ConversationHistoryEntry {
    pub user_message: String,
    pub chosen_tool: Option<String>,
    pub summary: String,
    pub timestamp_ms: i64,
}

impl ConversationHistoryEntry {
    pub fn new(user_message: &str, chosen_tool: Option<String>, summary: &str, timestamp_ms: i64) -> Self {
        Self {
            user_message: truncate_chars(user_message, MAX_USER_MESSAGE_CHARS),
            chosen_tool,
            summary: truncate_chars(summary, MAX_SUMMARY_CHARS),
            timestamp_ms,
        }
    }
}

/// Ring buffer of the last [`MAX_ENTRIES_PER_SESSION`] exchanges per
/// `(userId, sessionId)`, used only as extra context for classification
/// and intent-routing prompts — spec §3 "Conversation History Entry".
#[derive(Clone, Default)]
pub struct ConversationHistoryStore {
    sessions: Arc<Mutex<HashMap<(String, String), VecDeque<ConversationHistoryEntry>>>>,
}

impl ConversationHistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn append(&self, user_id: &str, session_id: &str, entry: ConversationHistoryEntry) {
        let mut sessions = self.sessions.lock().await;
        let ring = sessions
            .entry((user_id.to_string(), session_id.to_string()))
            .or_default();
        if ring.len() >= MAX_ENTRIES_PER_SESSION {
            ring.pop_front();
        }
        ring.push_back(entry);
    }

    /// Last `n` exchanges, oldest first, for prompt injection (spec §4.2
    /// step 3's "last-10 conversation exchanges").
    pub async fn last(&self, user_id: &str, session_id: &str, n: usize) -> Vec<ConversationHistoryEntry> {
        let sessions = self.sessions.lock().await;
        sessions
            .get(&(user_id.to_string(), session_id.to_string()))
            .map(|ring| ring.iter().rev().take(n).rev().cloned().collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn ring_buffer_evicts_oldest_past_cap() {
        let store = ConversationHistoryStore::new();
        for i in 0..25 {
            store
                .append(
                    "u1",
                    "s1",
                    ConversationHistoryEntry::new(&format!("msg{i}"), None, "", i as i64),
                )
                .await;
        }
        let all = store.last("u1", "s1", 100).await;
        assert_eq!(all.len(), MAX_ENTRIES_PER_SESSION);
        assert_eq!(all.first().unwrap().user_message, "msg5");
        assert_eq!(all.last().unwrap().user_message, "msg24");
    }

    #[tokio::test]
    async fn truncates_oversized_fields() {
        let long = "x".repeat(500);
        let entry = ConversationHistoryEntry::new(&long, None, &long, 0);
        assert_eq!(entry.user_message.chars().count(), MAX_USER_MESSAGE_CHARS);
        assert_eq!(entry.summary.chars().count(), MAX_SUMMARY_CHARS);
    }

    #[tokio::test]
    async fn last_n_respects_request_size() {
        let store = ConversationHistoryStore::new();
        for i in 0..5 {
            store
                .append("u1", "s1", ConversationHistoryEntry::new(&format!("m{i}"), None, "", i))
                .await;
        }
        let last2 = store.last("u1", "s1", 2).await;
        assert_eq!(last2.len(), 2);
        assert_eq!(last2[0].user_message, "m3");
        assert_eq!(last2[1].user_message, "m4");
    }
}
