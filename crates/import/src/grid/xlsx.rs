//! Spreadsheet files (xlsx, xlsm, xlsb, xls, ods) through calamine.

use calamine::{Data, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use super::{CellValue, GridError, Sheet, Workbook};

/// Open a spreadsheet file; the format is picked from the extension.
pub fn open_workbook(path: impl AsRef<Path>) -> Result<Workbook, GridError> {
    let path = path.as_ref();
    let mut sheets = calamine::open_workbook_auto(path)?;
    let workbook = read_sheets(&mut sheets)?;
    tracing::debug!(path = %path.display(), sheets = workbook.sheets().len(), "spreadsheet read");
    Ok(workbook)
}

/// Decode an uploaded spreadsheet held in memory.
pub fn read_workbook_bytes(bytes: Vec<u8>) -> Result<Workbook, GridError> {
    let mut sheets = calamine::open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_sheets(&mut sheets)
}

fn read_sheets<RS: Read + Seek>(sheets: &mut Sheets<RS>) -> Result<Workbook, GridError> {
    let mut workbook = Workbook::default();
    for name in sheets.sheet_names() {
        let range = sheets.worksheet_range(&name)?;
        let grid = range
            .rows()
            .map(|row| row.iter().map(cell_from_data).collect())
            .collect();
        workbook.push(Sheet::from_grid(name, grid));
    }
    Ok(workbook)
}

/// Dates stay as serial numbers; the normalizer decodes them.
pub fn cell_from_data(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Float(f) => CellValue::Number(*f),
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => CellValue::Empty,
    }
}
