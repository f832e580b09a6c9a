//! The decoded workbook as the normalizer sees it: ordered sheets, each with a
//! header row and data rows of raw cell values.

pub mod csv;
pub mod json;
#[cfg(feature = "xlsx")]
pub mod xlsx;

use std::collections::HashSet;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum GridError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[cfg(feature = "xlsx")]
    #[error("Spreadsheet error: {0}")]
    Spreadsheet(#[from] calamine::Error),
    #[error("Unexpected workbook shape: {0}")]
    Shape(String),
}

/// A raw cell value, before any semantic decoding.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    /// Empty cells and whitespace-only text both count as blank.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::Text(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::Text(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i64> for CellValue {
    fn from(n: i64) -> Self {
        CellValue::Number(n as f64)
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Bool(b)
    }
}

/// One sheet: its header labels and the data rows beneath them. Every row has
/// exactly one cell per header.
#[derive(Debug, Clone, PartialEq)]
pub struct Sheet {
    name: String,
    headers: Vec<String>,
    rows: Vec<Vec<CellValue>>,
}

impl Sheet {
    pub fn new(name: impl Into<String>, headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = headers.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Empty);
                row
            })
            .collect();
        Self {
            name: name.into(),
            headers,
            rows,
        }
    }

    /// Build from a plain grid whose first row holds the headers.
    ///
    /// Blank header cells become `Column N`; repeated labels get a `_1`, `_2`
    /// suffix so every label stays unique. Data rows wider than the header row
    /// get extra `Column N` headers rather than losing cells.
    pub fn from_grid(name: impl Into<String>, grid: Vec<Vec<CellValue>>) -> Self {
        let mut grid = grid.into_iter();
        let Some(header_row) = grid.next() else {
            return Self::new(name, Vec::new(), Vec::new());
        };
        let rows: Vec<Vec<CellValue>> = grid.collect();

        // A grid of nothing but blank cells has no header row to speak of.
        let all_blank = |row: &Vec<CellValue>| row.iter().all(CellValue::is_blank);
        if all_blank(&header_row) && rows.iter().all(all_blank) {
            return Self::new(name, Vec::new(), Vec::new());
        }

        let width = rows.iter().map(Vec::len).chain([header_row.len()]).max().unwrap_or(0);
        let mut labels = header_row
            .iter()
            .map(|cell| crate::decode::decode_text(cell).unwrap_or_default())
            .collect::<Vec<_>>();
        labels.resize(width, String::new());

        Self::new(name, unique_labels(labels), rows)
    }

    /// Build from mapping-shaped rows (header label → value).
    ///
    /// The header set is the union of labels in first-seen order, so a label
    /// missing from the first row is still found when a later row carries it.
    pub fn from_records<K, I, R>(name: impl Into<String>, records: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = R>,
        R: IntoIterator<Item = (K, CellValue)>,
    {
        let mut headers: Vec<String> = Vec::new();
        let mut keyed_rows: Vec<Vec<(usize, CellValue)>> = Vec::new();

        for record in records {
            let mut row = Vec::new();
            for (key, value) in record {
                let key = key.into();
                let idx = match headers.iter().position(|h| *h == key) {
                    Some(idx) => idx,
                    None => {
                        headers.push(key);
                        headers.len() - 1
                    }
                };
                row.push((idx, value));
            }
            keyed_rows.push(row);
        }

        let width = headers.len();
        let rows = keyed_rows
            .into_iter()
            .map(|pairs| {
                let mut cells = vec![CellValue::Empty; width];
                for (idx, value) in pairs {
                    cells[idx] = value;
                }
                cells
            })
            .collect();

        Self::new(name, headers, rows)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn rows(&self) -> impl Iterator<Item = RawRow<'_>> + '_ {
        self.rows.iter().map(move |cells| RawRow {
            headers: &self.headers,
            cells,
        })
    }

    /// No header row and no data: nothing the decoder produced is usable.
    pub fn is_blank(&self) -> bool {
        self.rows.is_empty() && self.headers.iter().all(|h| h.trim().is_empty())
    }
}

fn unique_labels(labels: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    labels
        .into_iter()
        .enumerate()
        .map(|(idx, label)| {
            let base = if label.trim().is_empty() {
                format!("Column {}", idx + 1)
            } else {
                label
            };
            let mut candidate = base.clone();
            let mut n = 1;
            while !seen.insert(candidate.clone()) {
                candidate = format!("{base}_{n}");
                n += 1;
            }
            candidate
        })
        .collect()
}

/// A borrowed view of one data row, keyed by the sheet's header labels.
#[derive(Debug, Clone, Copy)]
pub struct RawRow<'a> {
    headers: &'a [String],
    cells: &'a [CellValue],
}

impl<'a> RawRow<'a> {
    pub fn get(&self, label: &str) -> Option<&'a CellValue> {
        self.headers
            .iter()
            .position(|h| h == label)
            .and_then(|idx| self.cells.get(idx))
    }

    /// Cell under the header at `column`; out-of-range columns read as empty.
    pub fn cell(&self, column: usize) -> &'a CellValue {
        static EMPTY: CellValue = CellValue::Empty;
        self.cells.get(column).unwrap_or(&EMPTY)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(CellValue::is_blank)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a CellValue)> + 'a {
        self.headers.iter().map(String::as_str).zip(self.cells.iter())
    }
}

/// A decoded workbook: sheets in their original order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Workbook {
    sheets: Vec<Sheet>,
}

impl Workbook {
    pub fn new(sheets: Vec<Sheet>) -> Self {
        Self { sheets }
    }

    pub fn push(&mut self, sheet: Sheet) {
        self.sheets.push(sheet);
    }

    pub fn sheets(&self) -> &[Sheet] {
        &self.sheets
    }

    pub fn is_empty(&self) -> bool {
        self.sheets.is_empty()
    }
}

impl FromIterator<Sheet> for Workbook {
    fn from_iter<T: IntoIterator<Item = Sheet>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

/// Open a workbook from disk, picking the reader by extension: `.csv` and
/// `.tsv` as delimited text, `.json` as sheet-keyed rows, anything else as a
/// spreadsheet.
pub fn open_path(path: impl AsRef<Path>) -> Result<Workbook, GridError> {
    let path = path.as_ref();
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();

    match ext.as_str() {
        "csv" | "tsv" => csv::open_csv(path),
        "json" => json::open_json(path),
        #[cfg(feature = "xlsx")]
        _ => xlsx::open_workbook(path),
        #[cfg(not(feature = "xlsx"))]
        other => Err(GridError::Shape(format!(
            "unsupported file type '.{other}' (built without spreadsheet support)"
        ))),
    }
}
