use std::sync::atomic::{AtomicUsize, Ordering};

use edc_import::run_import;
use edc_model::{
    Field, FieldDef, Form, FormDef, FormId, ImportedRecord, Mapping, Project, ProjectDef,
    ProjectId, RecordId, Value,
};
use edc_store::{MemoryStore, NewRecord, RecordStore, Result as StoreResult, StoreError, TreeInsert};

fn seeded_store(field_defs: Vec<FieldDef>) -> (MemoryStore, FormId, Vec<Field>) {
    let store = MemoryStore::new();
    let mut form = FormDef::new(None, "Demographics");
    for def in field_defs {
        form.add_field(def).unwrap();
    }
    let def = ProjectDef {
        name: "Study".to_string(),
        version: "v1".to_string(),
        schema_fingerprint: "fp".to_string(),
        raw_schema: Value::Null,
        forms: vec![form],
    };
    let TreeInsert::Created { project, .. } = store.insert_schema_tree(def).unwrap() else {
        panic!("expected creation");
    };
    let form_id = store.forms_for_project(project.id).unwrap()[0].id;
    let fields = store.fields_for_form(form_id).unwrap();
    (store, form_id, fields)
}

fn ok_rows(rows: &[&[&str]]) -> Vec<Result<Vec<String>, std::io::Error>> {
    rows.iter()
        .map(|row| Ok(row.iter().map(ToString::to_string).collect()))
        .collect()
}

#[test]
fn imports_rows_with_warnings_and_scores() {
    let (store, form_id, fields) = seeded_store(vec![FieldDef::new("age").required(true)]);
    let mut mapping = Mapping::new();
    mapping.insert("Age (yrs)", "age");
    let header = vec!["Age (yrs)".to_string()];

    let outcome = run_import(
        form_id,
        &header,
        ok_rows(&[&["34"], &[""]]),
        &mapping,
        &fields,
        &store,
    );

    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.warnings.len(), 1);
    assert!(outcome.warnings[0].contains("Row 3 missing required: age"));
    assert!(outcome.errors.is_empty());

    let records = store.records_for_form(form_id).unwrap();
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].quality_score, 100.0);
    assert_eq!(records[1].quality_score, 20.0);
    assert_eq!(outcome.average_quality_score, 60.0);

    // Audit trail: header, mapping snapshot, and raw values all captured.
    assert_eq!(records[0].original_columns, header);
    assert_eq!(records[0].mapping_used, mapping);
    assert_eq!(
        records[0].raw_row.get("Age (yrs)"),
        Some(&Value::Text("34".to_string()))
    );
    assert_eq!(
        records[0].mapped_row.get("age"),
        Some(&Value::Text("34".to_string()))
    );
}

#[test]
fn absent_mapped_column_becomes_null() {
    let (store, form_id, fields) = seeded_store(vec![FieldDef::new("age"), FieldDef::new("sex")]);
    let mut mapping = Mapping::new();
    mapping.insert("Age (yrs)", "age");
    mapping.insert("Gender", "sex"); // not present in the header

    let outcome = run_import(
        form_id,
        &["Age (yrs)".to_string()],
        ok_rows(&[&["34"]]),
        &mapping,
        &fields,
        &store,
    );

    assert_eq!(outcome.imported, 1);
    let records = store.records_for_form(form_id).unwrap();
    assert_eq!(records[0].mapped_row.get("sex"), Some(&Value::Null));
}

#[test]
fn empty_source_yields_zero_average() {
    let (store, form_id, fields) = seeded_store(vec![FieldDef::new("age")]);
    let outcome = run_import(
        form_id,
        &["Age".to_string()],
        ok_rows(&[]),
        &Mapping::new(),
        &fields,
        &store,
    );
    assert_eq!(outcome.imported, 0);
    assert_eq!(outcome.average_quality_score, 0.0);
}

/// Store that fails a chosen insert, for exercising row isolation.
struct FlakyStore {
    inner: MemoryStore,
    fail_on_insert: usize,
    inserts: AtomicUsize,
}

impl RecordStore for FlakyStore {
    fn insert_schema_tree(&self, def: ProjectDef) -> StoreResult<TreeInsert> {
        self.inner.insert_schema_tree(def)
    }
    fn find_project_by_fingerprint(&self, fingerprint: &str) -> StoreResult<Option<Project>> {
        self.inner.find_project_by_fingerprint(fingerprint)
    }
    fn project(&self, id: ProjectId) -> StoreResult<Option<Project>> {
        self.inner.project(id)
    }
    fn projects(&self) -> StoreResult<Vec<Project>> {
        self.inner.projects()
    }
    fn form(&self, id: FormId) -> StoreResult<Option<Form>> {
        self.inner.form(id)
    }
    fn forms_for_project(&self, id: ProjectId) -> StoreResult<Vec<Form>> {
        self.inner.forms_for_project(id)
    }
    fn fields_for_form(&self, id: FormId) -> StoreResult<Vec<Field>> {
        self.inner.fields_for_form(id)
    }
    fn insert_record(&self, record: NewRecord) -> StoreResult<RecordId> {
        let n = self.inserts.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on_insert {
            return Err(StoreError::Io(std::io::Error::other("disk full")));
        }
        self.inner.insert_record(record)
    }
    fn records_for_form(&self, id: FormId) -> StoreResult<Vec<ImportedRecord>> {
        self.inner.records_for_form(id)
    }
    fn record_count(&self, id: FormId) -> StoreResult<usize> {
        self.inner.record_count(id)
    }
    fn delete_project(&self, id: ProjectId) -> StoreResult<()> {
        self.inner.delete_project(id)
    }
}

#[test]
fn one_failed_row_does_not_abort_the_batch() {
    let (inner, form_id, fields) = seeded_store(vec![FieldDef::new("age")]);
    let store = FlakyStore {
        inner,
        fail_on_insert: 2,
        inserts: AtomicUsize::new(0),
    };
    let mut mapping = Mapping::new();
    mapping.insert("Age", "age");

    let outcome = run_import(
        form_id,
        &["Age".to_string()],
        ok_rows(&[&["1"], &["2"], &["3"]]),
        &mapping,
        &fields,
        &store,
    );

    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.errors.len(), 1);
    assert!(outcome.errors[0].starts_with("Row 3:"));
    assert_eq!(store.inner.records_for_form(form_id).unwrap().len(), 2);
    // Average covers the persisted rows only.
    assert_eq!(outcome.average_quality_score, 100.0);
}

#[test]
fn rows_flow_from_the_csv_reader() {
    let (store, form_id, fields) = seeded_store(vec![FieldDef::new("age").required(true)]);
    let source =
        edc_ingest::CsvSource::from_reader("Age (yrs),Sex\n34,F\n,M\n".as_bytes()).unwrap();
    let header = source.headers().to_vec();
    let mut mapping = Mapping::new();
    mapping.insert("Age (yrs)", "age");

    let outcome = run_import(form_id, &header, source.into_rows(), &mapping, &fields, &store);

    assert_eq!(outcome.imported, 2);
    assert_eq!(outcome.warnings.len(), 1);
    let records = store.records_for_form(form_id).unwrap();
    assert_eq!(
        records[1].raw_row.get("Sex"),
        Some(&Value::Text("M".to_string()))
    );
}
