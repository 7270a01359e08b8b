#![deny(unsafe_code)]

pub mod executor;
pub mod quality;

pub use executor::{ImportOutcome, run_import};
pub use quality::{average_score, quality_score};
