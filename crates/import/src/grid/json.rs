//! Workbooks handed over as JSON: an object of sheet name to an array of row
//! objects, the shape spreadsheet front ends emit with `sheet_to_json`.

use serde_json::Value;
use std::path::Path;

use super::{CellValue, GridError, Sheet, Workbook};

impl Workbook {
    pub fn from_json_str(json: &str) -> Result<Self, GridError> {
        workbook_from_json(serde_json::from_str(json)?)
    }
}

/// Sheets keep the object's key order.
pub fn workbook_from_json(value: Value) -> Result<Workbook, GridError> {
    let Value::Object(sheets) = value else {
        return Err(GridError::Shape(format!(
            "expected an object of sheets, found {}",
            kind_of(&value)
        )));
    };

    sheets
        .into_iter()
        .map(|(name, rows)| sheet_from_json(name, rows))
        .collect()
}

pub fn open_json(path: impl AsRef<Path>) -> Result<Workbook, GridError> {
    let text = std::fs::read_to_string(path)?;
    Workbook::from_json_str(&text)
}

fn sheet_from_json(name: String, rows: Value) -> Result<Sheet, GridError> {
    let Value::Array(rows) = rows else {
        return Err(GridError::Shape(format!(
            "sheet '{name}' should be an array of rows, found {}",
            kind_of(&rows)
        )));
    };

    let records = rows
        .into_iter()
        .enumerate()
        .map(|(idx, row)| match row {
            Value::Object(fields) => Ok(fields.into_iter().map(|(k, v)| (k, cell_from_json(v)))),
            other => Err(GridError::Shape(format!(
                "row {} of sheet '{name}' should be an object, found {}",
                idx + 1,
                kind_of(&other)
            ))),
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Sheet::from_records(name, records))
}

fn cell_from_json(value: Value) -> CellValue {
    match value {
        Value::Null => CellValue::Empty,
        Value::Bool(b) => CellValue::Bool(b),
        Value::Number(n) => n.as_f64().map_or(CellValue::Empty, CellValue::Number),
        Value::String(s) => CellValue::Text(s),
        other => CellValue::Text(other.to_string()),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
