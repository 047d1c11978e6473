use log::info;
use rust_xlsxwriter::Workbook;
use serde::Serialize;
use serde_json::{Map, Value};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Longest string an xlsx cell can hold
pub const MAX_CELL_CHARS: usize = 32_767;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON serialization failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Spreadsheet export failed: {0}")]
    Spreadsheet(#[from] rust_xlsxwriter::XlsxError),

    #[error("Record {0} does not serialize to an object")]
    NotAnObject(usize),
}

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ExportError + '_ {
    move |source| ExportError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<(), ExportError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent).map_err(io_error(parent))
        }
        _ => Ok(()),
    }
}

/// Write `data` as indented UTF-8 JSON, replacing any existing file.
///
/// Non-ASCII text is written as-is rather than `\u` escaped.
pub fn save_to_json<T: Serialize + ?Sized>(path: &Path, data: &T) -> Result<(), ExportError> {
    ensure_parent(path)?;
    let file = File::create(path).map_err(io_error(path))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, data)?;
    writer.write_all(b"\n").map_err(io_error(path))?;
    writer.flush().map_err(io_error(path))?;

    info!("Saved to {}", path.display());
    Ok(())
}

/// Column names in the order they are first seen across `rows`
pub fn column_order(rows: &[Map<String, Value>]) -> Vec<String> {
    let mut columns: Vec<String> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.iter().any(|c| c == key) {
                columns.push(key.clone());
            }
        }
    }
    columns
}

fn to_rows<T: Serialize>(records: &[T]) -> Result<Vec<Map<String, Value>>, ExportError> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| match serde_json::to_value(record)? {
            Value::Object(map) => Ok(map),
            _ => Err(ExportError::NotAnObject(i)),
        })
        .collect()
}

fn cell_text(text: &str) -> String {
    if text.chars().count() > MAX_CELL_CHARS {
        text.chars().take(MAX_CELL_CHARS).collect()
    } else {
        text.to_string()
    }
}

/// Write `records` as a single-sheet xlsx workbook, one row per record.
///
/// The header row lists field names in first-seen order; a record without
/// a given field leaves that cell blank.
pub fn save_to_excel<T: Serialize>(path: &Path, records: &[T]) -> Result<(), ExportError> {
    let rows = to_rows(records)?;
    let columns = column_order(&rows);

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();

    for (col, name) in columns.iter().enumerate() {
        sheet.write_string(0, col as u16, name.as_str())?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, name) in columns.iter().enumerate() {
            let col = col as u16;
            match row.get(name) {
                None | Some(Value::Null) => {}
                Some(Value::String(s)) => {
                    sheet.write_string(row_num, col, cell_text(s))?;
                }
                Some(Value::Number(n)) => {
                    sheet.write_number(row_num, col, n.as_f64().unwrap_or_default())?;
                }
                Some(Value::Bool(b)) => {
                    sheet.write_boolean(row_num, col, *b)?;
                }
                Some(other) => {
                    sheet.write_string(row_num, col, cell_text(&other.to_string()))?;
                }
            }
        }
    }

    ensure_parent(path)?;
    workbook.save(path)?;

    info!("Saved {} rows to {}", rows.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_column_order_first_seen() {
        let rows = to_rows(&[
            json!({"b": 1, "a": 2}),
            json!({"a": 3, "c": 4}),
        ])
        .unwrap();
        assert_eq!(column_order(&rows), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_non_object_record_rejected() {
        let err = to_rows(&[json!({"a": 1}), json!([1, 2])]).unwrap_err();
        assert!(matches!(err, ExportError::NotAnObject(1)));
    }

    #[test]
    fn test_cell_text_truncates_long_strings() {
        let long = "é".repeat(MAX_CELL_CHARS + 10);
        assert_eq!(cell_text(&long).chars().count(), MAX_CELL_CHARS);
        assert_eq!(cell_text("short"), "short");
    }

    #[test]
    fn test_json_keeps_non_ascii_literal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("out.json");
        save_to_json(&path, &json!([{"title": "Thám tử lừng danh Conan"}])).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("Thám tử lừng danh Conan"));
        assert!(!text.contains("\\u"));
        assert!(text.contains("\n  {\n    \"title\""));
    }
}
