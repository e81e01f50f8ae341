//! Media enrichers: OCR + AI cleanup, vision description, document
//! extraction and voice transcription — spec §4.6. Each enricher is a
//! pure function over a `&mut UnifiedMessage`; composition (ordering,
//! per-user toggles) lives in `orchestrator-pipeline`.

pub mod backend;
pub mod document;
pub mod error;
pub mod ocr;
pub mod vision;
pub mod voice;

pub use backend::{OcrBackend, OcrResult, SpeechToTextBackend, TranscriptionResult, VisionBackend, VisionTier};
pub use document::enrich_with_document_extract;
pub use error::EnrichmentError;
pub use ocr::enrich_with_ocr;
pub use vision::enrich_with_vision_description;
pub use voice::enrich_with_voice_transcription;
