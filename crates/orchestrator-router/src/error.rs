use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    #[error("routing disabled for this user")]
    Disabled,
    #[error("provider call failed: {0}")]
    ProviderFailure(String),
}
