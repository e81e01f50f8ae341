use crate::backend::OcrBackend;
use crate::error::EnrichmentError;
use orchestrator_core::{ContentType, UnifiedMessage};
use orchestrator_provider::{CallOptions, CallRequest, ChatMessage, FailoverRouter, TaskTier};
use std::sync::Arc;

const MIN_ACCEPT_CONFIDENCE: f32 = 0.30;

/// Extracts text from an image, and if accepted, runs a low-tier AI
/// cleanup pass that strips garbled OCR artifacts while preserving the
/// original language — spec §4.6.
///
/// Returns `Ok(true)` if the message was enriched (text replaced,
/// `metadata.analysis` appended), `Ok(false)` if OCR yielded nothing
/// worth keeping (so vision description should run next).
pub async fn enrich_with_ocr(
    message: &mut UnifiedMessage,
    backend: &dyn OcrBackend,
    provider_router: &Arc<FailoverRouter>,
) -> Result<bool, EnrichmentError> {
    if message.content_type != ContentType::Image || !message.has_minimal_text(10) {
        return Ok(false);
    }
    let Some(media_url) = message.media_url.clone() else {
        return Ok(false);
    };

    let result = backend.extract_text(&media_url).await?;
    if result.confidence < MIN_ACCEPT_CONFIDENCE || result.text.trim().is_empty() {
        return Ok(false);
    }

    let cleaned = cleanup_pass(&result.text, provider_router).await.unwrap_or(result.text.clone());

    message.content = format!("[Image Text OCR]: {cleaned}");
    message.record_analysis(
        "ocr",
        serde_json::json!({ "confidence": result.confidence, "rawLength": result.text.len() }),
    );
    Ok(true)
}

async fn cleanup_pass(raw_text: &str, provider_router: &Arc<FailoverRouter>) -> Option<String> {
    let prompt = format!(
        "Clean up this OCR output by removing garbled or nonsensical fragments. \
         Preserve the original language and meaning. Return only the cleaned text.\n\n{raw_text}"
    );
    let call_request = CallRequest {
        messages: vec![ChatMessage::user(prompt)],
        force_tier: Some(TaskTier::Trivial),
        ..Default::default()
    };
    let result = provider_router
        .process(call_request, CallOptions::default().with_temperature(0.2))
        .await
        .ok()?;
    Some(result.content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use orchestrator_core::{Platform, Sender};
    use orchestrator_provider::{FailoverConfig, HealthTable, LLMProvider, ProviderError, ProviderResponse};
    use crate::backend::OcrResult;

    fn base_message(content_type: ContentType) -> UnifiedMessage {
        UnifiedMessage {
            id: "m1".into(),
            platform: Platform::new("wa"),
            external_id: None,
            conversation_id: "c1".into(),
            from: "u1".into(),
            to: None,
            content: String::new(),
            content_type,
            media_url: Some("https://example.com/image.png".into()),
            mime_type: Some("image/png".into()),
            sender: Sender::default(),
            is_group: false,
            group_id: None,
            group_name: None,
            from_me: false,
            timestamp: 0,
            metadata: Default::default(),
        }
    }

    struct FakeOcr {
        text: &'static str,
        confidence: f32,
    }

    #[async_trait]
    impl OcrBackend for FakeOcr {
        async fn extract_text(&self, _media_url: &str) -> Result<OcrResult, EnrichmentError> {
            Ok(OcrResult { text: self.text.to_string(), confidence: self.confidence })
        }
    }

    struct EchoProvider;

    #[async_trait]
    impl LLMProvider for EchoProvider {
        fn tag(&self) -> &str {
            "local"
        }
        async fn call(&self, messages: &[ChatMessage], _opts: &CallOptions) -> Result<ProviderResponse, ProviderError> {
            Ok(ProviderResponse {
                content: messages.last().unwrap().content.clone(),
                model: "echo".into(),
                usage: None,
            })
        }
    }

    fn router_with_echo() -> Arc<FailoverRouter> {
        let mut router = FailoverRouter::new(FailoverConfig::default(), HealthTable::default());
        router.register(Arc::new(EchoProvider));
        Arc::new(router)
    }

    #[tokio::test]
    async fn low_confidence_ocr_is_rejected() {
        let mut message = base_message(ContentType::Image);
        let ocr = FakeOcr { text: "garbled", confidence: 0.1 };
        let enriched = enrich_with_ocr(&mut message, &ocr, &router_with_echo()).await.unwrap();
        assert!(!enriched);
        assert!(message.content.is_empty());
    }

    #[tokio::test]
    async fn accepted_ocr_replaces_content_and_records_analysis() {
        let mut message = base_message(ContentType::Image);
        let ocr = FakeOcr { text: "hello world", confidence: 0.8 };
        let enriched = enrich_with_ocr(&mut message, &ocr, &router_with_echo()).await.unwrap();
        assert!(enriched);
        assert!(message.content.starts_with("[Image Text OCR]:"));
        assert_eq!(message.metadata.get("autoAnalyzed"), Some(&serde_json::json!(true)));
    }

    #[tokio::test]
    async fn non_image_messages_are_skipped() {
        let mut message = base_message(ContentType::Text);
        let ocr = FakeOcr { text: "hello", confidence: 0.9 };
        let enriched = enrich_with_ocr(&mut message, &ocr, &router_with_echo()).await.unwrap();
        assert!(!enriched);
    }
}
