//! Error types for store operations.

use edc_model::{FormId, ProjectId};
use thiserror::Error;

/// Errors from record-store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("project {0} does not exist")]
    ProjectNotFound(ProjectId),
    #[error("form {0} does not exist")]
    FormNotFound(FormId),
    #[error("failed to access store snapshot: {0}")]
    Io(#[from] std::io::Error),
    #[error("corrupt store snapshot: {0}")]
    Snapshot(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;
