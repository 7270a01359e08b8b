//! Auto-match suggestions: ranked field candidates for each external column.

use std::cmp::Ordering;
use std::collections::BTreeMap;

use edc_model::{Field, MatchSource, MatchSuggestion};

use crate::score::similarity;

/// Minimum similarity for a field to be suggested at all. Strict: a score of
/// exactly 0.6 is excluded.
pub const SUGGESTION_THRESHOLD: f64 = 0.6;

/// Suggestions returned per column, best first.
pub const MAX_SUGGESTIONS: usize = 3;

/// Propose ranked candidate mappings for a set of spreadsheet columns.
///
/// Each column is scored against every field by both machine name and label;
/// the better of the two wins, with `match_type` recording which one it was
/// (name wins ties). Candidates scoring at or below [`SUGGESTION_THRESHOLD`]
/// are dropped, the rest are sorted by score descending with ties broken by
/// the field's declaration order, and at most [`MAX_SUGGESTIONS`] survive.
///
/// Pure: no side effects, no store access.
pub fn suggest(columns: &[String], fields: &[Field]) -> BTreeMap<String, Vec<MatchSuggestion>> {
    let mut suggestions = BTreeMap::new();
    for column in columns {
        suggestions.insert(column.clone(), suggest_for_column(column, fields));
    }
    suggestions
}

/// Ranked candidates for a single column.
pub fn suggest_for_column(column: &str, fields: &[Field]) -> Vec<MatchSuggestion> {
    let mut candidates: Vec<MatchSuggestion> = fields
        .iter()
        .filter_map(|field| score_field(column, field))
        .collect();

    // Stable sort keeps declaration order among equal scores.
    candidates.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal));
    candidates.truncate(MAX_SUGGESTIONS);
    candidates
}

fn score_field(column: &str, field: &Field) -> Option<MatchSuggestion> {
    let name_score = similarity(column, &field.name);
    let label_score = field
        .label
        .as_deref()
        .map_or(0.0, |label| similarity(column, label));

    let (score, match_type) = if name_score >= label_score {
        (name_score, MatchSource::Name)
    } else {
        (label_score, MatchSource::Label)
    };

    if score > SUGGESTION_THRESHOLD {
        Some(MatchSuggestion {
            field_name: field.name.clone(),
            field_label: field.label.clone(),
            score,
            match_type,
        })
    } else {
        None
    }
}
