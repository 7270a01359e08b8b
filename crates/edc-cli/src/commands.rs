//! Command implementations: wire the store, the mapping engine, and the
//! import executor together behind the CLI surface.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, bail};
use edc_import::run_import as execute_import;
use edc_ingest::{CsvSource, IngestOutcome, ingest_schema};
use edc_model::{Field, Form, FormId, Mapping};
use edc_store::{MemoryStore, RecordStore};
use tracing::info;

use crate::cli::{ColumnsArgs, ImportArgs, IngestArgs, SuggestArgs, ValidateArgs};
use crate::summary;

pub fn run_ingest(store_path: &Path, args: &IngestArgs) -> Result<()> {
    let store = load_store(store_path)?;
    let bytes = fs::read(&args.schema)
        .with_context(|| format!("failed to read schema file {}", args.schema.display()))?;

    let outcome = ingest_schema(&bytes, &store)?;
    match &outcome {
        IngestOutcome::New { project, forms } => {
            store.save(store_path)?;
            println!(
                "Ingested project '{}' (id {}, version {}, {} forms)",
                project.name, project.id, project.version, forms
            );
        }
        IngestOutcome::Exists { project } => {
            println!(
                "The project was already imported: '{}' (id {}, version {})",
                project.name, project.id, project.version
            );
        }
    }
    Ok(())
}

pub fn run_projects(store_path: &Path) -> Result<()> {
    let store = load_store(store_path)?;
    let projects = store.projects()?;
    let mut listing = Vec::with_capacity(projects.len());
    for project in projects {
        let forms = store.forms_for_project(project.id)?;
        listing.push((project, forms));
    }
    summary::print_projects(&listing);
    Ok(())
}

pub fn run_columns(args: &ColumnsArgs) -> Result<()> {
    let source = CsvSource::open(&args.data)
        .with_context(|| format!("failed to read {}", args.data.display()))?;
    for column in source.column_names() {
        println!("{column}");
    }
    Ok(())
}

pub fn run_suggest(store_path: &Path, args: &SuggestArgs) -> Result<()> {
    let store = load_store(store_path)?;
    let (form, fields) = lookup_form(&store, FormId::new(args.form_id))?;

    let source = CsvSource::open(&args.data)
        .with_context(|| format!("failed to read {}", args.data.display()))?;
    let columns = source.column_names();
    info!(form = %form.title, columns = columns.len(), "computing match suggestions");

    let suggestions = edc_map::suggest(&columns, &fields);
    summary::print_suggestions(&form, &suggestions);
    Ok(())
}

/// Returns true when the mapping is valid.
pub fn run_validate(store_path: &Path, args: &ValidateArgs) -> Result<bool> {
    let store = load_store(store_path)?;
    let (form, fields) = lookup_form(&store, FormId::new(args.form_id))?;
    let mapping = load_mapping(&args.mapping)?;

    let report = edc_map::validate(&mapping, &fields);
    summary::print_validation(&form, &report);
    Ok(report.valid)
}

pub fn run_import(store_path: &Path, args: &ImportArgs) -> Result<()> {
    let store = load_store(store_path)?;
    let (form, fields) = lookup_form(&store, FormId::new(args.form_id))?;
    let mapping = load_mapping(&args.mapping)?;

    // Referential validation is a precondition of import: an unknown target
    // field aborts before any row is touched.
    let report = edc_map::validate(&mapping, &fields);
    if !report.valid {
        bail!("invalid mapping: {}", report.errors.join("; "));
    }

    let source = CsvSource::open(&args.data)
        .with_context(|| format!("failed to read {}", args.data.display()))?;
    let header = source.headers().to_vec();
    info!(form = %form.title, "starting import");

    let outcome = execute_import(form.id, &header, source.into_rows(), &mapping, &fields, &store);
    store.save(store_path)?;

    summary::print_import(&form, &outcome);
    Ok(())
}

fn load_store(path: &Path) -> Result<MemoryStore> {
    MemoryStore::load(path)
        .with_context(|| format!("failed to load store snapshot {}", path.display()))
}

fn lookup_form(store: &MemoryStore, form_id: FormId) -> Result<(Form, Vec<Field>)> {
    let Some(form) = store.form(form_id)? else {
        bail!("form {form_id} does not exist");
    };
    let fields = store.fields_for_form(form_id)?;
    Ok((form, fields))
}

/// Load a mapping file: a JSON object of column name to field name. Null
/// targets are kept as deliberately-unmapped columns.
fn load_mapping(path: &Path) -> Result<Mapping> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("failed to read mapping file {}", path.display()))?;
    let entries: BTreeMap<String, Option<String>> = serde_json::from_str(&contents)
        .with_context(|| format!("mapping file {} is not a JSON object", path.display()))?;
    Ok(entries
        .into_iter()
        .map(|(column, target)| (column, target.unwrap_or_default()))
        .collect())
}
