//! Row normalizers: turn the rows of a classified sheet into typed records,
//! skipping bad rows one at a time.

pub mod installments;
pub mod savings;
pub mod transactions;

use rust_decimal::Decimal;
use serde::Serialize;
use sheetwise_core::{Money, SheetDate};
use std::fmt;

use crate::decode;
use crate::grid::{CellValue, RawRow, Sheet};
use crate::headers::{Field, HeaderBindings};

pub use installments::normalize_installments;
pub use savings::normalize_savings_goals;
pub use transactions::normalize_transactions;

/// Why a row produced no record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum SkipReason {
    /// The field has no column, or the row's cell under it is blank.
    MissingField { field: Field },
    InvalidAmount { field: Field, raw: String },
    InvalidDate { field: Field, raw: String },
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MissingField { field } => write!(f, "missing required field: {field}"),
            SkipReason::InvalidAmount { field, raw } => write!(f, "invalid amount in {field}: '{raw}'"),
            SkipReason::InvalidDate { field, raw } => write!(f, "invalid date in {field}: '{raw}'"),
        }
    }
}

/// A lenient decision that kept the row but is worth surfacing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum WarningKind {
    /// Date text kept as-is.
    UnparsedDate { raw: String },
    /// Optional amount could not be read; the default was used.
    InvalidOptionalAmount { raw: String },
    /// Type text matched neither income nor expense; the amount's sign decided.
    UnrecognizedKind { label: String },
}

impl fmt::Display for WarningKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WarningKind::UnparsedDate { raw } => write!(f, "date '{raw}' kept as text"),
            WarningKind::InvalidOptionalAmount { raw } => write!(f, "amount '{raw}' ignored, using 0"),
            WarningKind::UnrecognizedKind { label } => {
                write!(f, "type '{label}' not recognized, kind taken from sign")
            }
        }
    }
}

/// Rows are numbered from 1, counting data rows only (the header row is not
/// row 1).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub sheet: String,
    pub row: usize,
    #[serde(flatten)]
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RowWarning {
    pub sheet: String,
    pub row: usize,
    pub field: Field,
    #[serde(flatten)]
    pub warning: WarningKind,
}

/// Everything one sheet produced.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetOutcome<T> {
    pub records: Vec<T>,
    pub skipped: Vec<SkippedRow>,
    pub warnings: Vec<RowWarning>,
    pub blank_rows: usize,
}

impl<T> Default for SheetOutcome<T> {
    fn default() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
            warnings: Vec::new(),
            blank_rows: 0,
        }
    }
}

/// Fold every row of `sheet` through `read`. A failing row is recorded and
/// never stops the rows after it; fully blank rows are counted and ignored.
pub(crate) fn fold_rows<T, F>(sheet: &Sheet, bindings: &HeaderBindings, mut read: F) -> SheetOutcome<T>
where
    F: FnMut(&mut RowReader<'_>) -> Result<T, SkipReason>,
{
    sheet
        .rows()
        .enumerate()
        .fold(SheetOutcome::default(), |mut acc, (idx, row)| {
            let row_number = idx + 1;
            if row.is_blank() {
                acc.blank_rows += 1;
                return acc;
            }

            let mut reader = RowReader::new(row, bindings);
            let result = read(&mut reader);
            acc.warnings.extend(reader.notes.into_iter().map(|(field, warning)| RowWarning {
                sheet: sheet.name().to_string(),
                row: row_number,
                field,
                warning,
            }));

            match result {
                Ok(record) => acc.records.push(record),
                Err(reason) => {
                    tracing::debug!(sheet = sheet.name(), row = row_number, %reason, "row skipped");
                    acc.skipped.push(SkippedRow {
                        sheet: sheet.name().to_string(),
                        row: row_number,
                        reason,
                    });
                }
            }
            acc
        })
}

/// Field-level access to one row through the sheet's header bindings.
pub(crate) struct RowReader<'a> {
    row: RawRow<'a>,
    bindings: &'a HeaderBindings,
    notes: Vec<(Field, WarningKind)>,
}

impl<'a> RowReader<'a> {
    fn new(row: RawRow<'a>, bindings: &'a HeaderBindings) -> Self {
        Self {
            row,
            bindings,
            notes: Vec::new(),
        }
    }

    /// The bound, non-blank cell for `field`.
    pub fn cell(&self, field: Field) -> Option<&'a CellValue> {
        let col = self.bindings.column(field)?;
        let cell = self.row.cell(col);
        (!cell.is_blank()).then_some(cell)
    }

    pub fn warn(&mut self, field: Field, warning: WarningKind) {
        self.notes.push((field, warning));
    }

    pub fn required_text(&self, field: Field) -> Result<String, SkipReason> {
        self.optional_text(field)
            .ok_or(SkipReason::MissingField { field })
    }

    pub fn optional_text(&self, field: Field) -> Option<String> {
        self.cell(field).and_then(decode::decode_text)
    }

    /// Like `optional_text`, but text cells come back untrimmed.
    pub fn verbatim_text(&self, field: Field) -> Option<String> {
        self.cell(field).map(raw_text)
    }

    /// Signed amount; the caller decides what the sign means.
    pub fn required_amount(&self, field: Field) -> Result<Decimal, SkipReason> {
        let cell = self.cell(field).ok_or(SkipReason::MissingField { field })?;
        decode::decode_amount(cell).ok_or_else(|| SkipReason::InvalidAmount {
            field,
            raw: raw_text(cell),
        })
    }

    /// Magnitude of an optional amount, zero when absent or unreadable.
    pub fn optional_money(&mut self, field: Field) -> Money {
        let Some(cell) = self.cell(field) else {
            return Money::zero();
        };
        match decode::decode_amount(cell) {
            Some(value) => Money::from_decimal(value),
            None => {
                self.warn(field, WarningKind::InvalidOptionalAmount { raw: raw_text(cell) });
                Money::zero()
            }
        }
    }

    /// A required date. Unparsed text is kept with a warning when `lenient`,
    /// otherwise the row is skipped.
    pub fn required_date(&mut self, field: Field, lenient: bool) -> Result<SheetDate, SkipReason> {
        let cell = self.cell(field).ok_or(SkipReason::MissingField { field })?;
        let date = decode::decode_date(cell).ok_or(SkipReason::MissingField { field })?;
        if let SheetDate::Unparsed(raw) = &date {
            if !lenient {
                return Err(SkipReason::InvalidDate {
                    field,
                    raw: raw.clone(),
                });
            }
            self.warn(field, WarningKind::UnparsedDate { raw: raw.clone() });
        }
        Ok(date)
    }
}

fn raw_text(cell: &CellValue) -> String {
    match cell {
        CellValue::Text(s) => s.clone(),
        other => decode::decode_text(other).unwrap_or_default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::{BindingPolicy, TokenTable};
    use sheetwise_core::SheetRole;

    fn sheet() -> Sheet {
        Sheet::from_grid(
            "S",
            vec![
                vec!["Date".into(), "Description".into(), "Amount".into()],
                vec!["2024-01-01".into(), "ok".into(), "1".into()],
                vec![CellValue::Empty, CellValue::Empty, CellValue::Empty],
                vec!["2024-01-03".into(), "bad".into(), "x".into()],
                vec!["2024-01-04".into(), "ok".into(), "4".into()],
            ],
        )
    }

    #[test]
    fn fold_keeps_going_after_a_bad_row() {
        let sheet = sheet();
        let bindings = TokenTable::defaults(SheetRole::Transactions)
            .bind(sheet.headers(), BindingPolicy::Exclusive);
        let outcome = fold_rows(&sheet, &bindings, |r| r.required_amount(Field::Amount));

        assert_eq!(outcome.records.len(), 2);
        assert_eq!(outcome.blank_rows, 1);
        assert_eq!(outcome.skipped.len(), 1);
        assert_eq!(outcome.skipped[0].row, 3);
        assert_eq!(
            outcome.skipped[0].reason,
            SkipReason::InvalidAmount {
                field: Field::Amount,
                raw: "x".into()
            }
        );
    }

    #[test]
    fn skip_reason_display() {
        assert_eq!(
            SkipReason::MissingField { field: Field::Date }.to_string(),
            "missing required field: date"
        );
        assert_eq!(
            SkipReason::InvalidAmount {
                field: Field::Amount,
                raw: "N/A".into()
            }
            .to_string(),
            "invalid amount in amount: 'N/A'"
        );
    }

    #[test]
    fn skipped_row_serializes_flat() {
        let skipped = SkippedRow {
            sheet: "Q1".into(),
            row: 4,
            reason: SkipReason::InvalidAmount {
                field: Field::Amount,
                raw: "N/A".into(),
            },
        };
        let json = serde_json::to_value(&skipped).unwrap();
        assert_eq!(json["row"], 4);
        assert_eq!(json["reason"], "invalid_amount");
        assert_eq!(json["field"], "amount");
        assert_eq!(json["raw"], "N/A");
    }
}
