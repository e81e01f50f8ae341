use thiserror::Error;

/// Errors mapped to a recoverable kind, per the uniform model-provider call
/// contract in spec §6. `Recoverable` errors advance the failover chain to
/// the next provider tag; anything else still does (the router treats the
/// whole enum as recoverable — no provider failure is fatal on its own).
#[derive(Debug, Error, Clone)]
pub enum ProviderError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("authentication error: {0}")]
    Auth(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("rate limited, retry after {retry_after_ms:?}ms")]
    RateLimited { retry_after_ms: Option<u64> },
    #[error("provider timed out after {elapsed_ms}ms")]
    Timeout { elapsed_ms: u64 },
    #[error("provider error: {0}")]
    Provider(String),
}
