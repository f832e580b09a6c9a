//! Delimited text as a one-sheet workbook.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{CellValue, GridError, Sheet, Workbook};

#[derive(Debug, Clone)]
pub struct CsvGridOptions {
    pub sheet_name: String,
    pub delimiter: u8,
    pub has_header: bool,
}

impl Default for CsvGridOptions {
    fn default() -> Self {
        Self {
            sheet_name: "Sheet1".to_string(),
            delimiter: b',',
            has_header: true,
        }
    }
}

impl CsvGridOptions {
    /// Tab for `.tsv`, comma otherwise; the sheet takes the file stem.
    pub fn for_path(path: &Path) -> Self {
        let delimiter = match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
            _ => b',',
        };
        let sheet_name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("Sheet1")
            .to_string();
        Self {
            sheet_name,
            delimiter,
            has_header: true,
        }
    }
}

/// Read delimited text into a sheet. Every field arrives as text; empty fields
/// are empty cells. Ragged rows are accepted.
pub fn read_csv<R: Read>(data: R, options: &CsvGridOptions) -> Result<Sheet, GridError> {
    let mut reader = ::csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(options.delimiter)
        .from_reader(data);

    let mut grid = Vec::new();
    for result in reader.records() {
        let record = result?;
        grid.push(record.iter().map(cell_from_field).collect::<Vec<_>>());
    }

    if options.has_header {
        return Ok(Sheet::from_grid(options.sheet_name.clone(), grid));
    }

    let width = grid.iter().map(Vec::len).max().unwrap_or(0);
    let headers = (1..=width).map(|n| format!("Column {n}")).collect();
    Ok(Sheet::new(options.sheet_name.clone(), headers, grid))
}

/// Open a delimited file as a single-sheet workbook.
pub fn open_csv(path: impl AsRef<Path>) -> Result<Workbook, GridError> {
    let path = path.as_ref();
    let file = File::open(path)?;
    let sheet = read_csv(file, &CsvGridOptions::for_path(path))?;
    tracing::debug!(path = %path.display(), rows = sheet.row_count(), "csv sheet read");
    Ok(Workbook::new(vec![sheet]))
}

fn cell_from_field(field: &str) -> CellValue {
    if field.is_empty() {
        CellValue::Empty
    } else {
        CellValue::Text(field.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn reads_headers_and_text_cells() {
        let data = b"Date,Description,Amount\n2024-01-15,AMAZON,49.99\n2024-01-16,\"Coffee, large\",\n";
        let sheet = read_csv(data.as_ref(), &CsvGridOptions::default()).unwrap();

        assert_eq!(sheet.name(), "Sheet1");
        assert_eq!(sheet.headers(), ["Date", "Description", "Amount"]);
        let rows: Vec<_> = sheet.rows().collect();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].get("Amount"), Some(&CellValue::from("49.99")));
        assert_eq!(rows[1].get("Description"), Some(&CellValue::from("Coffee, large")));
        assert_eq!(rows[1].get("Amount"), Some(&CellValue::Empty));
    }

    #[test]
    fn ragged_rows_are_padded() {
        let data = b"A,B,C\n1\n1,2,3,4\n";
        let sheet = read_csv(data.as_ref(), &CsvGridOptions::default()).unwrap();
        assert_eq!(sheet.headers(), ["A", "B", "C", "Column 4"]);
        assert_eq!(sheet.rows().next().unwrap().cell(2), &CellValue::Empty);
    }

    #[test]
    fn headerless_input_gets_numbered_columns() {
        let options = CsvGridOptions {
            has_header: false,
            delimiter: b';',
            ..CsvGridOptions::default()
        };
        let sheet = read_csv(b"2024-01-01;Rent;100\n".as_ref(), &options).unwrap();
        assert_eq!(sheet.headers(), ["Column 1", "Column 2", "Column 3"]);
        assert_eq!(sheet.row_count(), 1);
    }

    #[test]
    fn empty_input_is_a_blank_sheet() {
        let sheet = read_csv(b"".as_ref(), &CsvGridOptions::default()).unwrap();
        assert!(sheet.is_blank());
        let sheet = read_csv(b",,,\n".as_ref(), &CsvGridOptions::default()).unwrap();
        assert!(sheet.is_blank());
    }

    #[test]
    fn open_csv_names_the_sheet_after_the_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("march.tsv");
        let mut file = File::create(&path).unwrap();
        writeln!(file, "Date\tDescription\tAmount").unwrap();
        writeln!(file, "2024-03-01\tRent\t-1200").unwrap();

        let workbook = open_csv(&path).unwrap();
        let sheet = &workbook.sheets()[0];
        assert_eq!(sheet.name(), "march");
        assert_eq!(sheet.headers(), ["Date", "Description", "Amount"]);
    }
}
