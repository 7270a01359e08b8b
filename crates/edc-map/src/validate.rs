//! Referential validation of a confirmed column-to-field mapping.

use std::collections::BTreeSet;

use edc_model::{Field, Mapping};
use serde::{Deserialize, Serialize};

/// Outcome of validating a mapping against a form's declared fields.
///
/// Only a reference to a non-existent field makes the mapping invalid.
/// Required fields left unmapped produce warnings and are listed in
/// `unmapped_required`, but partial coverage is accepted: the import pipeline
/// favors capturing what is there over blocking on what is not.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MappingReport {
    pub valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
    pub mapped_required: Vec<String>,
    pub unmapped_required: Vec<String>,
}

/// Validate a mapping against the declared fields of its target form.
///
/// Entries with an empty target are treated as deliberately unmapped columns
/// and skipped silently.
pub fn validate(mapping: &Mapping, fields: &[Field]) -> MappingReport {
    let mut report = MappingReport {
        valid: true,
        errors: Vec::new(),
        warnings: Vec::new(),
        mapped_required: Vec::new(),
        unmapped_required: Vec::new(),
    };

    let known_names: BTreeSet<&str> = fields.iter().map(|f| f.name.as_str()).collect();

    for (_column, target) in mapping.iter() {
        if target.is_empty() {
            continue;
        }
        if !known_names.contains(target) {
            report
                .errors
                .push(format!("Field '{target}' does not exist in the selected form"));
            report.valid = false;
        }
    }

    let mapped_targets: BTreeSet<&str> = mapping.targets().collect();
    for field in fields.iter().filter(|f| f.required) {
        if mapped_targets.contains(field.name.as_str()) {
            report.mapped_required.push(field.name.clone());
        } else {
            report.unmapped_required.push(field.name.clone());
            report
                .warnings
                .push(format!("Required field '{}' is not mapped", field.name));
        }
    }

    report
}
