//! A closed, tagged value type for schema metadata and imported cell values.
//!
//! Externally-authored schemas carry free-form JSON blobs (`meta`, `logic`,
//! option lists). Instead of threading `serde_json::Value` through the whole
//! pipeline, the model owns a closed enum that preserves arbitrary nesting
//! while keeping the boundary typed.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

/// A dynamically-typed value with a fixed set of shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<Value>),
    Map(BTreeMap<String, Value>),
}

impl Value {
    /// True for `Null` and for text that is empty after trimming.
    ///
    /// This is the emptiness notion used by required-field checks and
    /// quality scoring: a cell holding only whitespace carries no data.
    pub fn is_blank(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Convert a `serde_json::Value` tree into the model's value type.
    pub fn from_json(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => n.as_f64().map_or(Value::Null, Value::Number),
            serde_json::Value::String(s) => Value::Text(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(entries) => Value::Map(
                entries
                    .into_iter()
                    .map(|(key, value)| (key, Value::from_json(value)))
                    .collect(),
            ),
        }
    }
}

impl Default for Value {
    fn default() -> Self {
        Value::Null
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => f.write_str(""),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Number(n) => write!(f, "{n}"),
            Value::Text(s) => f.write_str(s),
            Value::List(items) => {
                let rendered: Vec<String> = items.iter().map(ToString::to_string).collect();
                write!(f, "[{}]", rendered.join(", "))
            }
            Value::Map(entries) => {
                let rendered: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{key}: {value}"))
                    .collect();
                write!(f, "{{{}}}", rendered.join(", "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_detection() {
        assert!(Value::Null.is_blank());
        assert!(Value::Text("   ".to_string()).is_blank());
        assert!(!Value::Text("34".to_string()).is_blank());
        assert!(!Value::Bool(false).is_blank());
        assert!(!Value::Number(0.0).is_blank());
    }

    #[test]
    fn json_conversion_preserves_nesting() {
        let json: serde_json::Value = serde_json::json!({
            "visible_if": { "field": "sex", "equals": "F" },
            "choices": ["a", "b", 3],
        });
        let value = Value::from_json(json);
        let Value::Map(entries) = value else {
            panic!("expected a map");
        };
        assert!(matches!(entries.get("visible_if"), Some(Value::Map(_))));
        let Some(Value::List(choices)) = entries.get("choices") else {
            panic!("expected a list");
        };
        assert_eq!(choices.len(), 3);
        assert_eq!(choices[2], Value::Number(3.0));
    }

    #[test]
    fn untagged_serde_round_trip() {
        let value = Value::List(vec![
            Value::Null,
            Value::Bool(true),
            Value::Text("x".to_string()),
        ]);
        let json = serde_json::to_string(&value).expect("serialize");
        let round: Value = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(round, value);
    }
}
