//! Error types for ingestion.

use thiserror::Error;

/// Errors from schema ingestion and tabular reading.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("schema document is not valid JSON: {0}")]
    InvalidSchema(#[source] serde_json::Error),
    #[error("failed to read tabular source: {0}")]
    Csv(#[from] csv::Error),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Store(#[from] edc_store::StoreError),
}

pub type Result<T> = std::result::Result<T, IngestError>;
