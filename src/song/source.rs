//! Spreadsheet sources.
//!
//! The sheet itself is produced outside this crate; a source only has to hand
//! back rows as ordered header-to-cell maps.

use std::path::PathBuf;

use serde_json::Value;

use super::Row;
use crate::error::{Error, Result};

/// Something that can produce the rows of a named sheet.
pub trait SheetSource {
    /// Rows of `sheet_name`, in sheet order. The first column holds the human id.
    fn read_rows(&self, sheet_name: &str) -> Result<Vec<Row>>;
}

/// A workbook exported as JSON.
///
/// Either `{ "<sheet>": [ {row}, ... ], ... }` or a bare array of rows.
#[derive(Debug, Clone)]
pub struct JsonWorkbook {
    path: PathBuf,
}

impl JsonWorkbook {
    /// Create a source reading from `path`.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn parse_rows(&self, rows: &Value, sheet_name: &str) -> Result<Vec<Row>> {
        let rows = rows.as_array().ok_or_else(|| {
            Error::parse(format!("Sheet '{sheet_name}' is not an array of rows"), self.path.clone())
        })?;
        rows.iter()
            .enumerate()
            .map(|(i, row)| {
                row.as_object().cloned().ok_or_else(|| {
                    Error::parse(format!("Row {} of sheet '{sheet_name}' is not an object", i + 1), self.path.clone())
                })
            })
            .collect()
    }
}

impl SheetSource for JsonWorkbook {
    fn read_rows(&self, sheet_name: &str) -> Result<Vec<Row>> {
        if !self.path.is_file() {
            return Err(Error::config(
                format!("Sheet export not found at {}", self.path.display()),
                "Export the workbook to JSON or pass --sheet",
            ));
        }
        let text = fs_err::read_to_string(&self.path).map_err(|e| Error::io(e, self.path.clone()))?;
        let workbook: Value = serde_json::from_str(&text)
            .map_err(|e| Error::parse(format!("Invalid workbook JSON: {e}"), self.path.clone()))?;

        let rows = match &workbook {
            Value::Object(sheets) => {
                let sheet = sheets.get(sheet_name).ok_or_else(|| {
                    Error::NotFound(format!("sheet '{sheet_name}' in {}", self.path.display()))
                })?;
                self.parse_rows(sheet, sheet_name)?
            }
            Value::Array(_) => self.parse_rows(&workbook, sheet_name)?,
            _ => {
                return Err(Error::parse("Workbook must be an object or an array", self.path.clone()));
            }
        };

        if rows.is_empty() {
            return Err(Error::parse(format!("Sheet '{sheet_name}' contains no data"), self.path.clone()));
        }
        tracing::debug!("Read {} rows from sheet '{sheet_name}'", rows.len());
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]

    use super::*;

    fn write(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("book.json");
        std::fs::write(&path, contents).unwrap();
        (dir, path)
    }

    #[test]
    fn named_sheet_keeps_column_order() {
        let (_dir, path) = write(r#"{"Siron": [{"Id": 1, "Cím": "Alma", "Szerző": "X"}]}"#);
        let rows = JsonWorkbook::new(path).read_rows("Siron").unwrap();
        let headers: Vec<&str> = rows[0].keys().map(String::as_str).collect();
        assert_eq!(headers, ["Id", "Cím", "Szerző"]);
    }

    #[test]
    fn bare_array_is_a_single_sheet() {
        let (_dir, path) = write(r#"[{"Id": 1}, {"Id": 2}]"#);
        assert_eq!(JsonWorkbook::new(path).read_rows("anything").unwrap().len(), 2);
    }

    #[test]
    fn missing_sheet_is_reported() {
        let (_dir, path) = write(r#"{"Other": []}"#);
        let err = JsonWorkbook::new(path).read_rows("Siron").unwrap_err();
        assert!(matches!(err, Error::NotFound(_)));
    }

    #[test]
    fn empty_sheet_is_rejected() {
        let (_dir, path) = write(r#"{"Siron": []}"#);
        assert!(JsonWorkbook::new(path).read_rows("Siron").is_err());
    }
}
