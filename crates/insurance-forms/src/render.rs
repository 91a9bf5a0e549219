use std::fmt::Write as _;

use form_engine::FormSession;
use form_spec::{AnswerValue, FieldKind, FieldSpec, ValidationReport};
use submission_table::{SortDirection, TableView};

/// Plain-text rendering of the visible part of the selected form.
pub fn form(session: &FormSession) -> String {
    let mut out = String::new();
    let Some(schema) = session.schema() else {
        return out;
    };
    let _ = writeln!(out, "# {} ({})", schema.title, schema.form_id);
    for field in &schema.fields {
        if field.is_group() {
            let _ = writeln!(out, "## {}", field.label);
            for child in field.children() {
                leaf(&mut out, session, child);
            }
        } else {
            leaf(&mut out, session, field);
        }
    }
    out
}

fn leaf(out: &mut String, session: &FormSession, field: &FieldSpec) {
    if !session.is_visible(&field.id) {
        return;
    }
    let marker = if field.required { "*" } else { "" };
    let value = match session.answers().get(&field.id) {
        Some(AnswerValue::Text(text)) => text.clone(),
        Some(AnswerValue::Choices(choices)) => {
            choices.iter().cloned().collect::<Vec<_>>().join(", ")
        }
        None => "-".to_string(),
    };
    let _ = writeln!(
        out,
        "  {}{marker} [{}] ({}): {value}",
        field.label,
        field.id,
        kind_name(field.kind)
    );
    let options = session.effective_options(field);
    if !options.is_empty() {
        let _ = writeln!(out, "      options: {}", options.join(" | "));
    }
}

fn kind_name(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => "text",
        FieldKind::Number => "number",
        FieldKind::Date => "date",
        FieldKind::Select => "select",
        FieldKind::Radio => "radio",
        FieldKind::Checkbox => "checkbox",
        FieldKind::Group => "group",
    }
}

pub fn report(report: &ValidationReport) -> String {
    let mut out = String::new();
    if report.valid {
        out.push_str("ready to submit\n");
    } else {
        for message in report.messages() {
            let _ = writeln!(out, "! {message}");
        }
    }
    for field_id in &report.unknown_fields {
        let _ = writeln!(out, "? '{field_id}' is not part of this form");
    }
    out
}

/// Aligned text table of the selected columns, with the sort marker in the header.
pub fn table(view: &TableView) -> String {
    let columns = view.columns();
    let headers: Vec<String> = columns
        .selected()
        .iter()
        .map(|column| match columns.sort_indicator(column) {
            Some(SortDirection::Asc) => format!("{column} ▲"),
            Some(SortDirection::Desc) => format!("{column} ▼"),
            None => column.clone(),
        })
        .collect();
    let rows: Vec<Vec<String>> = view
        .project()
        .iter()
        .map(|row| {
            row.cells
                .iter()
                .map(|(_, cell)| cell.map(|cell| cell.display()).unwrap_or_default())
                .collect()
        })
        .collect();

    let mut widths: Vec<usize> = headers.iter().map(|header| header.chars().count()).collect();
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let mut out = String::new();
    line(&mut out, &headers, &widths);
    for row in &rows {
        line(&mut out, row, &widths);
    }
    out
}

fn line(out: &mut String, cells: &[String], widths: &[usize]) {
    let padded: Vec<String> = cells
        .iter()
        .zip(widths)
        .map(|(cell, width)| format!("{cell:<width$}"))
        .collect();
    let _ = writeln!(out, "{}", padded.join("  ").trim_end());
}
