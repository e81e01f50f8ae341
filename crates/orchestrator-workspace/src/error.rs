use thiserror::Error;

#[derive(Debug, Error)]
pub enum WorkspaceError {
    #[error("workspace already exists for agent {0}")]
    AlreadyExists(String),
    #[error("workspace not found for agent {0}")]
    NotFound(String),
    #[error("path escapes workspace root: {0}")]
    PathTraversal(String),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
