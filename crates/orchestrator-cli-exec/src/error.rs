use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliExecError {
    #[error("user {0} has reached the concurrent execution limit")]
    ConcurrencyLimitExceeded(String),
    #[error("execution {0} not found")]
    NotFound(String),
    #[error("failed to spawn child process: {0}")]
    SpawnFailed(String),
    #[error("delivery failed: {0}")]
    DeliveryFailed(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
