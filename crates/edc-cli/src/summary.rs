//! Human-readable result tables.

use std::collections::BTreeMap;

use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL_CONDENSED;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use edc_import::ImportOutcome;
use edc_map::MappingReport;
use edc_model::{Form, MatchSource, MatchSuggestion, Project};

pub fn print_projects(listing: &[(Project, Vec<Form>)]) {
    if listing.is_empty() {
        println!("No projects ingested yet.");
        return;
    }
    let mut table = new_table(vec![
        header_cell("Project"),
        header_cell("Version"),
        header_cell("Form"),
        header_cell("Title"),
    ]);
    for (project, forms) in listing {
        if forms.is_empty() {
            table.add_row(vec![
                Cell::new(format!("{} ({})", project.name, project.id)),
                Cell::new(&project.version),
                dim_cell("-"),
                dim_cell("no forms"),
            ]);
        }
        for form in forms {
            table.add_row(vec![
                Cell::new(format!("{} ({})", project.name, project.id)),
                Cell::new(&project.version),
                Cell::new(form.id),
                Cell::new(&form.title),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_suggestions(form: &Form, suggestions: &BTreeMap<String, Vec<MatchSuggestion>>) {
    println!("Suggestions for form '{}' ({})", form.title, form.id);
    let mut table = new_table(vec![
        header_cell("Column"),
        header_cell("Field"),
        header_cell("Label"),
        header_cell("Confidence"),
        header_cell("Matched on"),
    ]);
    if let Some(column) = table.column_mut(3) {
        column.set_cell_alignment(CellAlignment::Right);
    }
    for (column, candidates) in suggestions {
        if candidates.is_empty() {
            table.add_row(vec![
                Cell::new(column),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("-"),
                dim_cell("no match"),
            ]);
        }
        for candidate in candidates {
            table.add_row(vec![
                Cell::new(column),
                Cell::new(&candidate.field_name),
                Cell::new(candidate.field_label.as_deref().unwrap_or("-")),
                Cell::new(format!("{}%", candidate.confidence())),
                Cell::new(match candidate.match_type {
                    MatchSource::Name => "name",
                    MatchSource::Label => "label",
                }),
            ]);
        }
    }
    println!("{table}");
}

pub fn print_validation(form: &Form, report: &MappingReport) {
    if report.valid {
        println!("Mapping for form '{}' is valid.", form.title);
    } else {
        println!("Mapping for form '{}' is INVALID.", form.title);
    }
    for error in &report.errors {
        println!("  error: {error}");
    }
    for warning in &report.warnings {
        println!("  warning: {warning}");
    }
    if !report.mapped_required.is_empty() {
        println!("  required mapped: {}", report.mapped_required.join(", "));
    }
    if !report.unmapped_required.is_empty() {
        println!(
            "  required unmapped: {}",
            report.unmapped_required.join(", ")
        );
    }
}

pub fn print_import(form: &Form, outcome: &ImportOutcome) {
    println!(
        "Imported {} records into form '{}' (average quality {:.2})",
        outcome.imported, form.title, outcome.average_quality_score
    );
    for warning in &outcome.warnings {
        println!("  warning: {warning}");
    }
    for error in &outcome.errors {
        println!("  error: {error}");
    }
}

fn new_table(headers: Vec<Cell>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL_CONDENSED)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(headers);
    table
}

fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

fn dim_cell(text: &str) -> Cell {
    Cell::new(text).add_attribute(Attribute::Dim)
}
