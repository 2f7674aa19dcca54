//! Output formatting for CLI

use serde_json::Value;

use crate::cli::error::CliError;
use crate::mapping::{FieldMap, PathMap, RemapReport};

/// One line per path-map entry: `source.path -> destination.path (a -> b)`
pub fn format_path_map(path_map: &PathMap) -> String {
    let width = path_map
        .iter()
        .map(|e| e.source_path.to_string().len())
        .max()
        .unwrap_or(0);

    let mut output = String::new();
    for entry in path_map {
        output.push_str(&format!(
            "{:<width$} -> {}  ({} -> {})\n",
            entry.source_path.to_string(),
            entry.destination_path,
            entry.source_field,
            entry.destination_field,
            width = width
        ));
    }
    output
}

/// Pretty JSON array of records, keys in schema order
pub fn render_records(records: &[Value]) -> Result<String, CliError> {
    Ok(serde_json::to_string_pretty(records)?)
}

/// Batch summary for stderr
pub fn format_report(report: &RemapReport) -> String {
    let mut output = format!(
        "Remapped {} of {} record(s)",
        report.records_remapped, report.records_read
    );
    if report.records_failed > 0 {
        output.push_str(&format!(", skipped {}", report.records_failed));
    }
    output
}

/// Side-by-side view of one input record, the field map, and its output
pub fn format_sample(
    input: &Value,
    field_map: &FieldMap,
    output: &Value,
) -> Result<String, CliError> {
    let mut text = String::new();
    text.push_str("INPUT\n");
    text.push_str(&serde_json::to_string_pretty(input)?);
    text.push_str("\n\nFIELD MAP\n");
    text.push_str(&serde_json::to_string_pretty(field_map)?);
    text.push_str("\n\nOUTPUT\n");
    text.push_str(&serde_json::to_string_pretty(output)?);
    text.push('\n');
    Ok(text)
}
