//! The storage contract consumed by the ingestion and import pipeline.

use std::collections::BTreeMap;

use edc_model::{
    Field, Form, FormId, ImportedRecord, Mapping, Project, ProjectDef, ProjectId, RecordId, Value,
};

use crate::error::Result;

/// Outcome of an atomic schema-tree insertion.
#[derive(Debug, Clone)]
pub enum TreeInsert {
    /// The tree was persisted; no project with this fingerprint existed.
    Created { project: Project, forms: usize },
    /// A project with the same fingerprint already exists. Nothing was
    /// written; the loser of a concurrent race for the same document lands
    /// here too.
    Exists(Project),
}

/// An imported record awaiting persistence (no id yet).
#[derive(Debug, Clone)]
pub struct NewRecord {
    pub form_id: FormId,
    pub original_columns: Vec<String>,
    pub mapping_used: Mapping,
    pub raw_row: BTreeMap<String, Value>,
    pub mapped_row: BTreeMap<String, Value>,
    pub quality_score: f64,
}

/// Storage operations the pipeline depends on.
///
/// All methods take `&self`; implementations handle their own interior
/// synchronization. Schema-tree insertion is all-or-nothing: a partially
/// written tree must never become visible.
pub trait RecordStore {
    /// Persist a project with its forms and fields as one atomic unit,
    /// unless a project with the same schema fingerprint already exists.
    fn insert_schema_tree(&self, def: ProjectDef) -> Result<TreeInsert>;

    fn find_project_by_fingerprint(&self, fingerprint: &str) -> Result<Option<Project>>;

    fn project(&self, id: ProjectId) -> Result<Option<Project>>;

    fn projects(&self) -> Result<Vec<Project>>;

    fn form(&self, id: FormId) -> Result<Option<Form>>;

    fn forms_for_project(&self, id: ProjectId) -> Result<Vec<Form>>;

    /// Fields of a form in schema declaration order.
    fn fields_for_form(&self, id: FormId) -> Result<Vec<Field>>;

    /// Append one imported record. Fails if the target form does not exist.
    fn insert_record(&self, record: NewRecord) -> Result<RecordId>;

    fn records_for_form(&self, id: FormId) -> Result<Vec<ImportedRecord>>;

    fn record_count(&self, id: FormId) -> Result<usize>;

    /// Delete a project and cascade to its forms, fields, and records.
    fn delete_project(&self, id: ProjectId) -> Result<()>;
}
