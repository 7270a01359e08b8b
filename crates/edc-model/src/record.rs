//! Imported records: the append-only audit trail of the import pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::ids::{FormId, RecordId};
use crate::mapping::Mapping;
use crate::value::Value;

/// One imported spreadsheet row, exactly as captured.
///
/// Created once per source row and never mutated afterwards. The original
/// header, the mapping snapshot, and the raw cell values are all kept so any
/// mapped value can be traced back to its source cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportedRecord {
    pub id: RecordId,
    pub form_id: FormId,
    /// Header of the source file, in column order.
    pub original_columns: Vec<String>,
    /// The mapping in force when this row was imported.
    pub mapping_used: Mapping,
    /// Cell values keyed by original column name.
    pub raw_row: BTreeMap<String, Value>,
    /// Cell values keyed by field machine name, per the mapping.
    pub mapped_row: BTreeMap<String, Value>,
    /// Composite completeness/trust score in [0, 100]. Always computed,
    /// never caller-supplied.
    pub quality_score: f64,
}
