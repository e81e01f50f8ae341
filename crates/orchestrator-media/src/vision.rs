use crate::backend::{VisionBackend, VisionTier};
use crate::error::EnrichmentError;
use orchestrator_core::{ContentType, UnifiedMessage};

/// Requests an image caption via a 3-level fallback (local vision ->
/// remote free vision -> remote paid vision), used when OCR yielded
/// nothing — spec §4.6. `backends` should be supplied in that priority
/// order; this function tries each in turn regardless of the order given,
/// sorting by [`VisionTier`] rank so callers can't silently invert it.
pub async fn enrich_with_vision_description(
    message: &mut UnifiedMessage,
    backends: &[&dyn VisionBackend],
) -> Result<bool, EnrichmentError> {
    if message.content_type != ContentType::Image || !message.has_minimal_text(10) {
        return Ok(false);
    }
    let Some(media_url) = message.media_url.clone() else {
        return Ok(false);
    };

    let mut ordered: Vec<&&dyn VisionBackend> = backends.iter().collect();
    ordered.sort_by_key(|b| tier_rank(b.tier()));

    let mut last_error = None;
    for backend in ordered {
        match backend.describe_image(&media_url).await {
            Ok(description) => {
                message.content = format!("[Image Description]: {description}");
                message.record_analysis("vision", serde_json::json!({ "tier": format!("{:?}", backend.tier()) }));
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

fn tier_rank(tier: VisionTier) -> u8 {
    match tier {
        VisionTier::Local => 0,
        VisionTier::RemoteFree => 1,
        VisionTier::RemotePaid => 2,
    }
}
