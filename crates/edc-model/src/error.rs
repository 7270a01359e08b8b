use thiserror::Error;

/// Violations of the data model's structural invariants.
#[derive(Debug, Error)]
pub enum ModelError {
    #[error("field name must not be empty")]
    EmptyFieldName,
    #[error("duplicate field name '{name}' in form '{form}'")]
    DuplicateFieldName { form: String, name: String },
}
