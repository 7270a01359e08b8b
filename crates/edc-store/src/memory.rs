//! In-memory store with optional JSON snapshot persistence.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

use edc_model::{
    Field, FieldId, Form, FormId, ImportedRecord, Project, ProjectDef, ProjectId, RecordId,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, StoreError};
use crate::store::{NewRecord, RecordStore, TreeInsert};

/// Persistent state of the store. Entity maps are keyed by raw id; ids are
/// assigned in insertion order, so iterating a map yields declaration order.
#[derive(Debug, Default, Serialize, Deserialize)]
struct State {
    next_project_id: u64,
    next_form_id: u64,
    next_field_id: u64,
    next_record_id: u64,
    projects: BTreeMap<u64, Project>,
    forms: BTreeMap<u64, Form>,
    fields: BTreeMap<u64, Field>,
    records: BTreeMap<u64, ImportedRecord>,
}

impl State {
    fn next_project_id(&mut self) -> ProjectId {
        self.next_project_id += 1;
        ProjectId::new(self.next_project_id)
    }

    fn next_form_id(&mut self) -> FormId {
        self.next_form_id += 1;
        FormId::new(self.next_form_id)
    }

    fn next_field_id(&mut self) -> FieldId {
        self.next_field_id += 1;
        FieldId::new(self.next_field_id)
    }

    fn next_record_id(&mut self) -> RecordId {
        self.next_record_id += 1;
        RecordId::new(self.next_record_id)
    }
}

/// Mutex-guarded in-memory store.
///
/// Every operation takes the lock once and releases it before returning, so
/// schema-tree insertion is atomic: either the whole project with its forms
/// and fields becomes visible, or nothing does. The fingerprint check and the
/// insertion happen under the same lock, which is what resolves concurrent
/// ingestion of the same document (the loser observes the winner's project).
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a store from a JSON snapshot. A missing file yields an empty
    /// store, so first runs need no setup step.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "no store snapshot, starting empty");
            return Ok(Self::new());
        }
        let contents = fs::read_to_string(path)?;
        let state: State = serde_json::from_str(&contents)?;
        info!(
            path = %path.display(),
            projects = state.projects.len(),
            records = state.records.len(),
            "loaded store snapshot"
        );
        Ok(Self {
            state: Mutex::new(state),
        })
    }

    /// Write the whole store to a JSON snapshot file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let state = self.state();
        let json = serde_json::to_string_pretty(&*state)?;
        fs::write(path, json)?;
        debug!(path = %path.display(), "saved store snapshot");
        Ok(())
    }

    fn state(&self) -> MutexGuard<'_, State> {
        // Nothing panics while holding the lock with state half-updated, so
        // a poisoned lock still guards consistent data.
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl RecordStore for MemoryStore {
    fn insert_schema_tree(&self, def: ProjectDef) -> Result<TreeInsert> {
        let mut state = self.state();

        if let Some(existing) = state
            .projects
            .values()
            .find(|p| p.schema_fingerprint == def.schema_fingerprint)
        {
            return Ok(TreeInsert::Exists(existing.clone()));
        }

        let project_id = state.next_project_id();
        let project = Project {
            id: project_id,
            name: def.name,
            version: def.version,
            schema_fingerprint: def.schema_fingerprint,
            raw_schema: def.raw_schema,
        };
        state.projects.insert(project_id.get(), project.clone());

        let form_count = def.forms.len();
        for form_def in def.forms {
            let form_id = state.next_form_id();
            state.forms.insert(
                form_id.get(),
                Form {
                    id: form_id,
                    project_id,
                    external_id: form_def.external_id,
                    title: form_def.title,
                },
            );
            for field_def in form_def.fields {
                let field_id = state.next_field_id();
                state.fields.insert(
                    field_id.get(),
                    Field {
                        id: field_id,
                        form_id,
                        name: field_def.name,
                        label: field_def.label,
                        field_type: field_def.field_type,
                        required: field_def.required,
                        options: field_def.options,
                        logic: field_def.logic,
                        meta: field_def.meta,
                    },
                );
            }
        }

        info!(project = %project.name, forms = form_count, "persisted schema tree");
        Ok(TreeInsert::Created {
            project,
            forms: form_count,
        })
    }

    fn find_project_by_fingerprint(&self, fingerprint: &str) -> Result<Option<Project>> {
        Ok(self
            .state()
            .projects
            .values()
            .find(|p| p.schema_fingerprint == fingerprint)
            .cloned())
    }

    fn project(&self, id: ProjectId) -> Result<Option<Project>> {
        Ok(self.state().projects.get(&id.get()).cloned())
    }

    fn projects(&self) -> Result<Vec<Project>> {
        Ok(self.state().projects.values().cloned().collect())
    }

    fn form(&self, id: FormId) -> Result<Option<Form>> {
        Ok(self.state().forms.get(&id.get()).cloned())
    }

    fn forms_for_project(&self, id: ProjectId) -> Result<Vec<Form>> {
        Ok(self
            .state()
            .forms
            .values()
            .filter(|f| f.project_id == id)
            .cloned()
            .collect())
    }

    fn fields_for_form(&self, id: FormId) -> Result<Vec<Field>> {
        Ok(self
            .state()
            .fields
            .values()
            .filter(|f| f.form_id == id)
            .cloned()
            .collect())
    }

    fn insert_record(&self, record: NewRecord) -> Result<RecordId> {
        let mut state = self.state();
        if !state.forms.contains_key(&record.form_id.get()) {
            return Err(StoreError::FormNotFound(record.form_id));
        }
        let id = state.next_record_id();
        state.records.insert(
            id.get(),
            ImportedRecord {
                id,
                form_id: record.form_id,
                original_columns: record.original_columns,
                mapping_used: record.mapping_used,
                raw_row: record.raw_row,
                mapped_row: record.mapped_row,
                quality_score: record.quality_score,
            },
        );
        Ok(id)
    }

    fn records_for_form(&self, id: FormId) -> Result<Vec<ImportedRecord>> {
        Ok(self
            .state()
            .records
            .values()
            .filter(|r| r.form_id == id)
            .cloned()
            .collect())
    }

    fn record_count(&self, id: FormId) -> Result<usize> {
        Ok(self
            .state()
            .records
            .values()
            .filter(|r| r.form_id == id)
            .count())
    }

    fn delete_project(&self, id: ProjectId) -> Result<()> {
        let mut state = self.state();
        if state.projects.remove(&id.get()).is_none() {
            return Err(StoreError::ProjectNotFound(id));
        }
        let form_ids: Vec<u64> = state
            .forms
            .values()
            .filter(|f| f.project_id == id)
            .map(|f| f.id.get())
            .collect();
        state.forms.retain(|_, f| f.project_id != id);
        state
            .fields
            .retain(|_, f| !form_ids.contains(&f.form_id.get()));
        state
            .records
            .retain(|_, r| !form_ids.contains(&r.form_id.get()));
        info!(project = %id, forms = form_ids.len(), "deleted project tree");
        Ok(())
    }
}
