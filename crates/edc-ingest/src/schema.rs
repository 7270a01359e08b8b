//! Project schema ingestion.
//!
//! Parses an externally-authored schema document (JSON) into a
//! project/form/field tree and persists it through the record store.
//! Ingestion is idempotent: the document's SHA-256 fingerprint identifies the
//! project, and a byte-identical re-upload returns the existing entity
//! without writing anything.

use edc_model::{FieldDef, FieldLogic, FieldOption, FormDef, Project, ProjectDef, Value};
use edc_store::{RecordStore, TreeInsert};
use serde_json::Value as Json;
use tracing::{info, warn};

use crate::error::{IngestError, Result};
use crate::fingerprint::sha256_hex;

pub const DEFAULT_PROJECT_NAME: &str = "Unnamed Project";
pub const DEFAULT_PROJECT_VERSION: &str = "v0";
pub const DEFAULT_FORM_TITLE: &str = "Untitled Form";

/// Schema extension keys lifted into a field's `meta` map when present.
const FIELD_META_KEYS: &[&str] = &[
    "randomization",
    "to_validate",
    "primary_endpoint",
    "secondary_endpoint",
    "is_enable_chart",
    "export_variable",
];

/// Result of ingesting a schema document.
#[derive(Debug, Clone)]
pub enum IngestOutcome {
    /// The document was new; its tree is now persisted.
    New { project: Project, forms: usize },
    /// A byte-identical document was ingested before.
    Exists { project: Project },
}

impl IngestOutcome {
    pub fn project(&self) -> &Project {
        match self {
            IngestOutcome::New { project, .. } | IngestOutcome::Exists { project } => project,
        }
    }

    pub fn is_new(&self) -> bool {
        matches!(self, IngestOutcome::New { .. })
    }
}

/// Ingest a raw schema document.
///
/// The fingerprint check happens before parsing, so a known document is
/// accepted even if it would no longer parse under current rules. For a new
/// document the whole tree is persisted atomically; a concurrent ingestion of
/// the same bytes resolves inside the store, with the loser receiving the
/// winner's project via [`IngestOutcome::Exists`].
pub fn ingest_schema<S: RecordStore>(bytes: &[u8], store: &S) -> Result<IngestOutcome> {
    let fingerprint = sha256_hex(bytes);

    if let Some(existing) = store.find_project_by_fingerprint(&fingerprint)? {
        info!(project = %existing.name, %fingerprint, "schema document already ingested");
        return Ok(IngestOutcome::Exists { project: existing });
    }

    let doc: Json = serde_json::from_slice(bytes).map_err(IngestError::InvalidSchema)?;
    let def = parse_schema(&doc, fingerprint);

    match store.insert_schema_tree(def)? {
        TreeInsert::Created { project, forms } => {
            info!(project = %project.name, forms, "ingested new schema document");
            Ok(IngestOutcome::New { project, forms })
        }
        TreeInsert::Exists(project) => Ok(IngestOutcome::Exists { project }),
    }
}

fn parse_schema(doc: &Json, fingerprint: String) -> ProjectDef {
    let name = doc
        .pointer("/project/name")
        .and_then(Json::as_str)
        .unwrap_or(DEFAULT_PROJECT_NAME)
        .to_string();

    // The version lives either in the first entry of a `projectVersions`
    // array or directly on a `projectVersions` object.
    let version = doc
        .pointer("/projectVersions/0/v")
        .or_else(|| doc.pointer("/projectVersions/v"))
        .and_then(scalar_to_string)
        .unwrap_or_else(|| DEFAULT_PROJECT_VERSION.to_string());

    let forms = doc
        .get("forms")
        .and_then(Json::as_array)
        .map(|forms| forms.iter().map(parse_form).collect())
        .unwrap_or_default();

    ProjectDef {
        name,
        version,
        schema_fingerprint: fingerprint,
        raw_schema: Value::from_json(doc.clone()),
        forms,
    }
}

fn parse_form(frm: &Json) -> FormDef {
    let external_id = frm.get("id").and_then(scalar_to_string);
    let title = frm
        .get("title")
        .and_then(Json::as_str)
        .unwrap_or(DEFAULT_FORM_TITLE)
        .to_string();
    let mut form = FormDef::new(external_id, title);

    for field_json in frm
        .get("fields")
        .and_then(Json::as_array)
        .into_iter()
        .flatten()
    {
        let Some(field) = parse_field(field_json) else {
            warn!(form = %form.title, "skipping field without a name");
            continue;
        };
        let name = field.name.clone();
        if let Err(error) = form.add_field(field) {
            warn!(form = %form.title, field = %name, %error, "skipping field");
        }
    }

    form
}

fn parse_field(f: &Json) -> Option<FieldDef> {
    let name = f.get("name").and_then(Json::as_str)?.trim();
    if name.is_empty() {
        return None;
    }

    let mut field = FieldDef::new(name);
    field.label = f.get("label").and_then(Json::as_str).map(String::from);
    field.field_type = f.get("type").and_then(Json::as_str).map(String::from);
    field.required = f.get("required").is_some_and(truthy);
    field.options = f
        .get("items")
        .and_then(Json::as_array)
        .map(|items| items.iter().map(parse_option).collect())
        .unwrap_or_default();
    field.logic = FieldLogic {
        visible_if: non_null_value(f.get("visible_if")),
        enable_if: non_null_value(f.get("enable_if")),
        edit_check: non_null_value(f.get("edit_check")),
    };
    for key in FIELD_META_KEYS {
        if let Some(value) = non_null_value(f.get(*key)) {
            field.meta.insert((*key).to_string(), value);
        }
    }

    Some(field)
}

fn parse_option(item: &Json) -> FieldOption {
    match item {
        Json::Object(_) => FieldOption {
            label: item.get("label").and_then(Json::as_str).map(String::from),
            value: non_null_value(item.get("value")),
            selected: item.get("selected").is_some_and(truthy),
        },
        scalar => FieldOption {
            label: None,
            value: Some(Value::from_json(scalar.clone())),
            selected: false,
        },
    }
}

fn non_null_value(json: Option<&Json>) -> Option<Value> {
    match json {
        None | Some(Json::Null) => None,
        Some(other) => Some(Value::from_json(other.clone())),
    }
}

fn scalar_to_string(json: &Json) -> Option<String> {
    match json {
        Json::String(s) => Some(s.clone()),
        Json::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Loose truthiness for schema flags, which arrive as booleans, numbers, or
/// strings depending on the authoring tool.
fn truthy(json: &Json) -> bool {
    match json {
        Json::Bool(b) => *b,
        Json::Number(n) => n.as_f64().is_some_and(|x| x != 0.0),
        Json::String(s) => !s.is_empty() && s != "0" && !s.eq_ignore_ascii_case("false"),
        Json::Array(items) => !items.is_empty(),
        Json::Object(entries) => !entries.is_empty(),
        Json::Null => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truthiness_of_flag_shapes() {
        assert!(truthy(&Json::Bool(true)));
        assert!(truthy(&serde_json::json!(1)));
        assert!(truthy(&serde_json::json!("yes")));
        assert!(!truthy(&serde_json::json!(0)));
        assert!(!truthy(&serde_json::json!("")));
        assert!(!truthy(&serde_json::json!("0")));
        assert!(!truthy(&serde_json::json!("false")));
        assert!(!truthy(&Json::Null));
    }

    #[test]
    fn defaults_for_sparse_documents() {
        let def = parse_schema(&serde_json::json!({}), "fp".to_string());
        assert_eq!(def.name, DEFAULT_PROJECT_NAME);
        assert_eq!(def.version, DEFAULT_PROJECT_VERSION);
        assert!(def.forms.is_empty());
    }

    #[test]
    fn version_from_array_or_object() {
        let from_array = parse_schema(
            &serde_json::json!({"projectVersions": [{"v": 3}]}),
            "fp".to_string(),
        );
        assert_eq!(from_array.version, "3");

        let from_object = parse_schema(
            &serde_json::json!({"projectVersions": {"v": "2.1"}}),
            "fp".to_string(),
        );
        assert_eq!(from_object.version, "2.1");
    }

    #[test]
    fn field_meta_and_logic_are_extracted() {
        let doc = serde_json::json!({
            "forms": [{
                "id": 7,
                "title": "Visit 1",
                "fields": [{
                    "name": "age",
                    "label": "Age (years)",
                    "type": "number",
                    "required": 1,
                    "visible_if": {"field": "consent", "equals": true},
                    "export_variable": "AGE",
                    "items": [{"label": "Yes", "value": 1, "selected": true}, "other"],
                }],
            }],
        });
        let def = parse_schema(&doc, "fp".to_string());
        assert_eq!(def.forms.len(), 1);
        let form = &def.forms[0];
        assert_eq!(form.external_id.as_deref(), Some("7"));
        let field = &form.fields[0];
        assert!(field.required);
        assert!(field.logic.visible_if.is_some());
        assert!(field.logic.enable_if.is_none());
        assert_eq!(
            field.meta.get("export_variable"),
            Some(&Value::Text("AGE".to_string()))
        );
        assert_eq!(field.options.len(), 2);
        assert!(field.options[0].selected);
        assert_eq!(field.options[1].value, Some(Value::Text("other".to_string())));
    }

    #[test]
    fn nameless_and_duplicate_fields_are_skipped() {
        let doc = serde_json::json!({
            "forms": [{
                "title": "Visit 1",
                "fields": [
                    {"label": "no name"},
                    {"name": "age"},
                    {"name": "age", "label": "duplicate"},
                ],
            }],
        });
        let def = parse_schema(&doc, "fp".to_string());
        assert_eq!(def.forms[0].fields.len(), 1);
        assert_eq!(def.forms[0].fields[0].name, "age");
    }
}
