#![deny(unsafe_code)]

pub mod error;
pub mod fingerprint;
pub mod schema;
pub mod tabular;

pub use error::{IngestError, Result};
pub use fingerprint::sha256_hex;
pub use schema::{
    DEFAULT_FORM_TITLE, DEFAULT_PROJECT_NAME, DEFAULT_PROJECT_VERSION, IngestOutcome,
    ingest_schema,
};
pub use tabular::{CsvSource, Rows};
