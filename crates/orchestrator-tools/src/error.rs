use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum ToolError {
    #[error("invalid parameters: {0}")]
    InvalidParameters(String),
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}
