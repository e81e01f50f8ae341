use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum EnrichmentError {
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("extraction failed: {0}")]
    ExtractionFailed(String),
    #[error("unsupported content: {0}")]
    Unsupported(String),
}
