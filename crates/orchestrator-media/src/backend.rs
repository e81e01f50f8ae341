use crate::error::EnrichmentError;
use async_trait::async_trait;

#[derive(Debug, Clone)]
pub struct OcrResult {
    pub text: String,
    pub confidence: f32,
}

/// Out-of-scope collaborator contract (spec §1): the OCR back-end itself
/// lives outside this crate; enrichers depend only on this trait.
#[async_trait]
pub trait OcrBackend: Send + Sync {
    async fn extract_text(&self, media_url: &str) -> Result<OcrResult, EnrichmentError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisionTier {
    Local,
    RemoteFree,
    RemotePaid,
}

/// One vision backend at a specific cost/quality tier. The enricher tries
/// `Local`, then `RemoteFree`, then `RemotePaid` in order (spec §4.6).
#[async_trait]
pub trait VisionBackend: Send + Sync {
    fn tier(&self) -> VisionTier;
    async fn describe_image(&self, media_url: &str) -> Result<String, EnrichmentError>;
}

#[derive(Debug, Clone)]
pub struct TranscriptionResult {
    pub text: String,
    pub provider: String,
    pub model: String,
    pub language: Option<String>,
}

/// A speech-to-text backend, local or cloud. `is_available` lets the
/// enricher skip a local backend whose prerequisites (binary, model
/// weights) aren't present without attempting and failing a call first.
#[async_trait]
pub trait SpeechToTextBackend: Send + Sync {
    fn is_local(&self) -> bool;
    async fn is_available(&self) -> bool;
    async fn transcribe(&self, media_url: &str, language_hint: Option<&str>) -> Result<TranscriptionResult, EnrichmentError>;
}
