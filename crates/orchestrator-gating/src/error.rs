use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum GatingError {
    #[error("gating config load failed: {0}")]
    ConfigLoad(String),
    #[error("rate limit store error: {0}")]
    RateLimitStore(String),
}
