use crate::backend::SpeechToTextBackend;
use crate::error::EnrichmentError;
use orchestrator_core::{ContentType, UnifiedMessage};

/// Prefers a local speech-to-text backend if available and its
/// prerequisites check out, else falls through a cloud fallback chain —
/// spec §4.6. `backends` should list the local backend (if any) first,
/// followed by cloud backends in fallback order.
pub async fn enrich_with_voice_transcription(
    message: &mut UnifiedMessage,
    backends: &[&dyn SpeechToTextBackend],
    language_hint: Option<&str>,
) -> Result<bool, EnrichmentError> {
    if !matches!(message.content_type, ContentType::Voice | ContentType::Audio) {
        return Ok(false);
    }
    let Some(media_url) = message.media_url.clone() else {
        return Ok(false);
    };

    let mut last_error = None;
    for backend in backends {
        if backend.is_local() && !backend.is_available().await {
            continue;
        }
        match backend.transcribe(&media_url, language_hint).await {
            Ok(result) => {
                message.content = format!("[Voice Transcription]: {}", result.text);
                message.record_analysis(
                    "voice_transcription",
                    serde_json::json!({
                        "provider": result.provider,
                        "model": result.model,
                        "language": result.language,
                    }),
                );
                return Ok(true);
            }
            Err(err) => last_error = Some(err),
        }
    }

    match last_error {
        Some(err) => Err(err),
        None => Ok(false),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::TranscriptionResult;
    use async_trait::async_trait;
    use orchestrator_core::{Platform, Sender};
    use std::sync::atomic::{AtomicBool, Ordering};

    fn base_message() -> UnifiedMessage {
        UnifiedMessage {
            id: "m1".into(),
            platform: Platform::new("wa"),
            external_id: None,
            conversation_id: "c1".into(),
            from: "u1".into(),
            to: None,
            content: String::new(),
            content_type: ContentType::Voice,
            media_url: Some("https://example.com/clip.ogg".into()),
            mime_type: Some("audio/ogg".into()),
            sender: Sender::default(),
            is_group: false,
            group_id: None,
            group_name: None,
            from_me: false,
            timestamp: 0,
            metadata: Default::default(),
        }
    }

    struct UnavailableLocal;
    #[async_trait]
    impl SpeechToTextBackend for UnavailableLocal {
        fn is_local(&self) -> bool {
            true
        }
        async fn is_available(&self) -> bool {
            false
        }
        async fn transcribe(&self, _media_url: &str, _language_hint: Option<&str>) -> Result<TranscriptionResult, EnrichmentError> {
            panic!("should never be called when unavailable");
        }
    }

    struct CloudBackend {
        called: AtomicBool,
    }
    #[async_trait]
    impl SpeechToTextBackend for CloudBackend {
        fn is_local(&self) -> bool {
            false
        }
        async fn is_available(&self) -> bool {
            true
        }
        async fn transcribe(&self, _media_url: &str, _language_hint: Option<&str>) -> Result<TranscriptionResult, EnrichmentError> {
            self.called.store(true, Ordering::SeqCst);
            Ok(TranscriptionResult {
                text: "hello".into(),
                provider: "cloud".into(),
                model: "whisper".into(),
                language: Some("en".into()),
            })
        }
    }

    #[tokio::test]
    async fn skips_unavailable_local_backend_and_falls_back_to_cloud() {
        let mut message = base_message();
        let local = UnavailableLocal;
        let cloud = CloudBackend { called: AtomicBool::new(false) };
        let backends: Vec<&dyn SpeechToTextBackend> = vec![&local, &cloud];
        let enriched = enrich_with_voice_transcription(&mut message, &backends, None).await.unwrap();
        assert!(enriched);
        assert!(cloud.called.load(Ordering::SeqCst));
        assert_eq!(message.content, "[Voice Transcription]: hello");
    }

    #[tokio::test]
    async fn non_voice_messages_are_skipped() {
        let mut message = base_message();
        message.content_type = ContentType::Text;
        let backends: Vec<&dyn SpeechToTextBackend> = vec![];
        let enriched = enrich_with_voice_transcription(&mut message, &backends, None).await.unwrap();
        assert!(!enriched);
    }
}
