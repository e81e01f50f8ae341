use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// The channel a [`UnifiedMessage`] arrived on. Kept as an open tag rather
/// than a closed enum since new platform adapters are added without
/// touching this crate.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Platform(pub String);

impl Platform {
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    Text,
    Image,
    Video,
    Audio,
    Voice,
    Document,
    Sticker,
    Location,
    Contact,
    CallLog,
}

impl ContentType {
    pub fn is_media(&self) -> bool {
        !matches!(self, ContentType::Text)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Sender {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

/// The single value record the pipeline owns for the duration of one request.
///
/// `id` must be unique within the deduplication window. `content` may only
/// be mutated in place by media enrichers, and only together with an
/// `analysis` entry appended to `metadata`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnifiedMessage {
    pub id: String,
    pub platform: Platform,
    #[serde(default)]
    pub external_id: Option<String>,
    pub conversation_id: String,
    pub from: String,
    #[serde(default)]
    pub to: Option<String>,

    pub content: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,

    #[serde(default)]
    pub sender: Sender,

    #[serde(default)]
    pub is_group: bool,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub group_name: Option<String>,

    #[serde(default)]
    pub from_me: bool,
    pub timestamp: i64,

    #[serde(default)]
    pub metadata: Map<String, Value>,
}

impl UnifiedMessage {
    /// Normalize a just-received message: assign an `id` if the adapter
    /// didn't set one. Everything else is assumed already populated by the
    /// platform adapter.
    pub fn normalize(mut self) -> Self {
        if self.id.is_empty() {
            self.id = uuid::Uuid::new_v4().to_string();
        }
        self
    }

    /// Append a structured enrichment note to `metadata.analysis`, creating
    /// the array if absent. Enrichers must call this whenever they mutate
    /// `content`, per the invariant in the data model.
    pub fn record_analysis(&mut self, analysis_type: &str, detail: impl Into<Value>) {
        let entry = serde_json::json!({
            "type": analysis_type,
            "detail": detail.into(),
        });
        match self.metadata.get_mut("analysis").and_then(Value::as_array_mut) {
            Some(arr) => arr.push(entry),
            None => {
                self.metadata
                    .insert("analysis".to_string(), Value::Array(vec![entry]));
            }
        }
        self.metadata
            .insert("autoAnalyzed".to_string(), Value::Bool(true));
    }

    pub fn has_minimal_text(&self, min_len: usize) -> bool {
        self.content.trim().chars().count() < min_len
    }
}
