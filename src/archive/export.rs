//! CSV serialization for report data

use crate::archive::error::{ArchiveError, ArchiveResult};
use serde::Serialize;
use serde_json::{Map, Value};

/// Serializes record sets to CSV text
pub struct CsvExporter;

impl CsvExporter {
    /// Convert rows to CSV.
    ///
    /// The header is the union of all row keys in first-seen order. Values are
    /// quote-wrapped; missing and null values render as `""`.
    pub fn export<T: Serialize>(rows: &[T]) -> ArchiveResult<String> {
        if rows.is_empty() {
            return Ok(String::new());
        }

        let objects = rows
            .iter()
            .map(|row| match serde_json::to_value(row) {
                Ok(Value::Object(map)) => Ok(map),
                Ok(other) => Err(ArchiveError::ExportFailed(format!(
                    "expected an object row, got {}",
                    type_name(&other)
                ))),
                Err(e) => Err(ArchiveError::ExportFailed(e.to_string())),
            })
            .collect::<ArchiveResult<Vec<Map<String, Value>>>>()?;

        let mut header: Vec<&str> = Vec::new();
        for object in &objects {
            for key in object.keys() {
                if !header.contains(&key.as_str()) {
                    header.push(key);
                }
            }
        }

        let mut lines = Vec::with_capacity(objects.len() + 1);
        lines.push(
            header
                .iter()
                .map(|key| Self::header_cell(key))
                .collect::<Vec<_>>()
                .join(","),
        );

        for object in &objects {
            let cells: Vec<String> = header
                .iter()
                .map(|key| format!("\"{}\"", Self::escape_csv(&Self::cell_text(object.get(*key)))))
                .collect();
            lines.push(cells.join(","));
        }

        tracing::debug!(rows = objects.len(), columns = header.len(), "Exported CSV");
        Ok(lines.join("\n"))
    }

    fn header_cell(key: &str) -> String {
        if key.contains(|c: char| matches!(c, ',' | '"' | '\n' | '\r')) {
            format!("\"{}\"", Self::escape_csv(key))
        } else {
            key.to_string()
        }
    }

    fn cell_text(value: Option<&Value>) -> String {
        match value {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s.clone(),
            Some(Value::Bool(b)) => b.to_string(),
            Some(Value::Number(n)) => n.to_string(),
            Some(other) => other.to_string(),
        }
    }

    fn escape_csv(s: &str) -> String {
        s.replace('"', "\"\"")
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert any serializable record set to CSV text
pub fn convert_to_csv<T: Serialize>(rows: &[T]) -> ArchiveResult<String> {
    CsvExporter::export(rows)
}
