#![deny(unsafe_code)]

pub mod engine;
pub mod score;
pub mod validate;

pub use engine::{MAX_SUGGESTIONS, SUGGESTION_THRESHOLD, suggest, suggest_for_column};
pub use score::similarity;
pub use validate::{MappingReport, validate};
