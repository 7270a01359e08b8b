//! Schema entities: projects, forms, and fields.
//!
//! Two parallel shapes exist for the schema tree: `*Def` types describe a
//! parsed schema document before persistence (no ids yet), while `Project`,
//! `Form`, and `Field` are the persisted entities with store-assigned ids.
//! The ingestor builds a [`ProjectDef`] and hands the whole tree to the store,
//! which persists it atomically.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;
use crate::ids::{FieldId, FormId, ProjectId};
use crate::value::Value;

/// A persisted project, identified by the fingerprint of its schema document.
///
/// Re-ingesting a byte-identical document returns this entity instead of
/// creating a duplicate tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub name: String,
    pub version: String,
    /// SHA-256 hex digest of the raw schema document.
    pub schema_fingerprint: String,
    /// The schema document as parsed, kept for traceability.
    pub raw_schema: Value,
}

/// A named, ordered collection of fields belonging to a project.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub id: FormId,
    pub project_id: ProjectId,
    /// Identifier from the source schema document, if it carried one.
    pub external_id: Option<String>,
    pub title: String,
}

/// A single data-capture element on a form.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    pub id: FieldId,
    pub form_id: FormId,
    /// Machine name, unique within the owning form.
    pub name: String,
    pub label: Option<String>,
    pub field_type: Option<String>,
    pub required: bool,
    pub options: Vec<FieldOption>,
    pub logic: FieldLogic,
    pub meta: BTreeMap<String, Value>,
}

/// One selectable option of a choice-type field.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldOption {
    pub label: Option<String>,
    pub value: Option<Value>,
    #[serde(default)]
    pub selected: bool,
}

/// Conditional-display and edit-check rules attached to a field.
///
/// The stable rule kinds get named slots; anything else the source schema
/// carries lands in the field's `meta` map.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldLogic {
    pub visible_if: Option<Value>,
    pub enable_if: Option<Value>,
    pub edit_check: Option<Value>,
}

impl FieldLogic {
    pub fn is_empty(&self) -> bool {
        self.visible_if.is_none() && self.enable_if.is_none() && self.edit_check.is_none()
    }
}

/// A parsed project schema awaiting persistence.
#[derive(Debug, Clone)]
pub struct ProjectDef {
    pub name: String,
    pub version: String,
    pub schema_fingerprint: String,
    pub raw_schema: Value,
    pub forms: Vec<FormDef>,
}

/// A parsed form definition awaiting persistence.
#[derive(Debug, Clone)]
pub struct FormDef {
    pub external_id: Option<String>,
    pub title: String,
    pub fields: Vec<FieldDef>,
}

impl FormDef {
    pub fn new(external_id: Option<String>, title: impl Into<String>) -> Self {
        Self {
            external_id,
            title: title.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field, enforcing the name-unique-within-form invariant.
    pub fn add_field(&mut self, field: FieldDef) -> Result<(), ModelError> {
        if field.name.trim().is_empty() {
            return Err(ModelError::EmptyFieldName);
        }
        if self.fields.iter().any(|f| f.name == field.name) {
            return Err(ModelError::DuplicateFieldName {
                form: self.title.clone(),
                name: field.name,
            });
        }
        self.fields.push(field);
        Ok(())
    }
}

/// A parsed field definition awaiting persistence.
#[derive(Debug, Clone)]
pub struct FieldDef {
    pub name: String,
    pub label: Option<String>,
    pub field_type: Option<String>,
    pub required: bool,
    pub options: Vec<FieldOption>,
    pub logic: FieldLogic,
    pub meta: BTreeMap<String, Value>,
}

impl FieldDef {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            field_type: None,
            required: false,
            options: Vec::new(),
            logic: FieldLogic::default(),
            meta: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[must_use]
    pub fn with_type(mut self, field_type: impl Into<String>) -> Self {
        self.field_type = Some(field_type.into());
        self
    }

    #[must_use]
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}
