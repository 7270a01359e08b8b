//! Row-by-row import execution.
//!
//! Consumes a validated mapping plus a lazy row source, producing one
//! persisted record per row and a batch summary. Rows are never rejected:
//! missing required data is surfaced as a warning and a low quality score,
//! and a row that fails to persist is reported without aborting the rest of
//! the batch. Complete audit capture beats strict validation here.

use std::collections::BTreeMap;
use std::fmt::Display;

use edc_model::{Field, FormId, Mapping, Value};
use edc_store::{NewRecord, RecordStore};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::quality::{average_score, quality_score};

/// Summary of one import run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportOutcome {
    /// Records persisted.
    pub imported: usize,
    /// Soft diagnostics (missing required data), one entry per affected row.
    pub warnings: Vec<String>,
    /// Per-row failures (rows that could not be read or persisted).
    pub errors: Vec<String>,
    /// Mean quality score of the persisted records; 0 when none were.
    pub average_quality_score: f64,
}

/// Import all rows of a tabular source into a form.
///
/// `header` is the source's first row, already trimmed by the tabular
/// reader; data rows are numbered from 2 so diagnostics line up with what an
/// operator sees in a spreadsheet. The mapping is assumed to have passed
/// validation: mapped field names are not re-checked per row.
pub fn run_import<S, I, E>(
    form_id: FormId,
    header: &[String],
    rows: I,
    mapping: &Mapping,
    fields: &[Field],
    store: &S,
) -> ImportOutcome
where
    S: RecordStore,
    I: IntoIterator<Item = Result<Vec<String>, E>>,
    E: Display,
{
    let required_fields: Vec<String> = fields
        .iter()
        .filter(|f| f.required)
        .map(|f| f.name.clone())
        .collect();

    let mut imported = 0usize;
    let mut warnings = Vec::new();
    let mut errors = Vec::new();
    let mut scores = Vec::new();

    for (offset, row) in rows.into_iter().enumerate() {
        let row_number = offset + 2;
        let cells = match row {
            Ok(cells) => cells,
            Err(error) => {
                errors.push(format!("Row {row_number}: {error}"));
                continue;
            }
        };

        let raw_row = build_raw_row(header, cells);
        let mapped_row = build_mapped_row(&raw_row, mapping);

        let missing: Vec<&str> = required_fields
            .iter()
            .filter(|name| {
                mapped_row
                    .get(name.as_str())
                    .is_none_or(|value| value.is_blank())
            })
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            let message = format!("Row {row_number} missing required: {}", missing.join(", "));
            warn!(row = row_number, "{message}");
            warnings.push(message);
        }

        let score = quality_score(&required_fields, &mapped_row, mapping);
        debug!(row = row_number, quality = score, "scored row");

        let record = NewRecord {
            form_id,
            original_columns: header.to_vec(),
            mapping_used: mapping.clone(),
            raw_row,
            mapped_row,
            quality_score: score,
        };
        match store.insert_record(record) {
            Ok(_) => {
                imported += 1;
                scores.push(score);
            }
            Err(error) => errors.push(format!("Row {row_number}: {error}")),
        }
    }

    let average_quality_score = average_score(&scores);
    info!(
        imported,
        warnings = warnings.len(),
        errors = errors.len(),
        average_quality_score,
        "import finished"
    );

    ImportOutcome {
        imported,
        warnings,
        errors,
        average_quality_score,
    }
}

/// Zip the header with a row's cells. The tabular reader pads short rows, so
/// extra unheadered cells are the only mismatch left, and they are dropped.
fn build_raw_row(header: &[String], cells: Vec<String>) -> BTreeMap<String, Value> {
    header
        .iter()
        .zip(cells)
        .map(|(column, cell)| (column.clone(), Value::Text(cell)))
        .collect()
}

/// Apply the mapping: absent source columns map to null. Entries with an
/// empty target are deliberately-unmapped columns and contribute no key.
fn build_mapped_row(
    raw_row: &BTreeMap<String, Value>,
    mapping: &Mapping,
) -> BTreeMap<String, Value> {
    mapping
        .iter()
        .filter(|(_, field_name)| !field_name.is_empty())
        .map(|(column, field_name)| {
            let value = raw_row.get(column).cloned().unwrap_or(Value::Null);
            (field_name.to_string(), value)
        })
        .collect()
}
