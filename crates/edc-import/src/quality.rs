//! Per-row quality scoring.
//!
//! The score is a weighted composite in [0, 100]:
//!
//! - 40 points for required-field completeness,
//! - 40 points for overall value completeness of the mapped row,
//! - 20 points for mapping-target completeness (how much of the confirmed
//!   mapping actually points at a field).
//!
//! A row with every required value present, no blank mapped values, and no
//! deliberately-unmapped columns scores exactly 100.

use std::collections::BTreeMap;

use edc_model::{Mapping, Value};

const REQUIRED_WEIGHT: f64 = 40.0;
const COMPLETENESS_WEIGHT: f64 = 40.0;
const ACCURACY_WEIGHT: f64 = 20.0;

/// Compute the quality score of one mapped row, rounded to 2 decimals.
pub fn quality_score(
    required_fields: &[String],
    mapped_row: &BTreeMap<String, Value>,
    mapping: &Mapping,
) -> f64 {
    let required_term = if required_fields.is_empty() {
        REQUIRED_WEIGHT
    } else {
        let filled = required_fields
            .iter()
            .filter(|name| {
                mapped_row
                    .get(name.as_str())
                    .is_some_and(|value| !value.is_blank())
            })
            .count();
        REQUIRED_WEIGHT * filled as f64 / required_fields.len() as f64
    };

    let completeness_term = if mapped_row.is_empty() {
        0.0
    } else {
        let filled = mapped_row.values().filter(|value| !value.is_blank()).count();
        COMPLETENESS_WEIGHT * filled as f64 / mapped_row.len() as f64
    };

    let accuracy_term = if mapping.is_empty() {
        ACCURACY_WEIGHT
    } else {
        ACCURACY_WEIGHT * mapping.targets().count() as f64 / mapping.len() as f64
    };

    round2(required_term + completeness_term + accuracy_term)
}

/// Mean of the per-row scores, rounded to 2 decimals; 0 for an empty batch.
pub fn average_score(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    round2(scores.iter().sum::<f64>() / scores.len() as f64)
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(entries: &[(&str, &str)]) -> BTreeMap<String, Value> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), Value::from(*v)))
            .collect()
    }

    #[test]
    fn full_row_scores_one_hundred() {
        let mut mapping = Mapping::new();
        mapping.insert("Age (yrs)", "age");
        let score = quality_score(&["age".to_string()], &row(&[("age", "34")]), &mapping);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn blank_required_value_drops_both_value_terms() {
        let mut mapping = Mapping::new();
        mapping.insert("Age (yrs)", "age");
        let score = quality_score(&["age".to_string()], &row(&[("age", "")]), &mapping);
        // Mapping-accuracy term survives: the mapping target itself is fine.
        assert_eq!(score, 20.0);
    }

    #[test]
    fn no_required_fields_awards_full_required_term() {
        let mut mapping = Mapping::new();
        mapping.insert("Sex", "sex");
        let score = quality_score(&[], &row(&[("sex", "F")]), &mapping);
        assert_eq!(score, 100.0);
    }

    #[test]
    fn empty_mapping_awards_full_accuracy_term() {
        let score = quality_score(&[], &BTreeMap::new(), &Mapping::new());
        // 40 (no required) + 0 (empty mapped row) + 20 (empty mapping).
        assert_eq!(score, 60.0);
    }

    #[test]
    fn deliberately_unmapped_columns_reduce_accuracy() {
        let mut mapping = Mapping::new();
        mapping.insert("Age (yrs)", "age");
        mapping.insert("Comment", "");
        let score = quality_score(&[], &row(&[("age", "34")]), &mapping);
        // 40 + 40 + 20 * 1/2
        assert_eq!(score, 90.0);
    }

    #[test]
    fn partial_required_coverage_is_proportional() {
        let mut mapping = Mapping::new();
        mapping.insert("Age (yrs)", "age");
        mapping.insert("SBP", "sbp");
        let required = vec!["age".to_string(), "sbp".to_string()];
        let score = quality_score(&required, &row(&[("age", "34"), ("sbp", "")]), &mapping);
        // 20 (half the required) + 20 (half the values) + 20
        assert_eq!(score, 60.0);
    }

    #[test]
    fn averages() {
        assert_eq!(average_score(&[]), 0.0);
        assert_eq!(average_score(&[100.0, 0.0]), 50.0);
        assert_eq!(average_score(&[100.0, 0.0, 0.0]), 33.33);
    }
}
