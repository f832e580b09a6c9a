//! Workbook-level orchestration: classify every sheet, run the matching row
//! normalizer, and merge the output in sheet-then-row order.

use serde::Serialize;
use sheetwise_core::{Installment, SavingsGoal, SheetRole, Transaction};
use thiserror::Error;

use crate::classify::classify_sheet;
use crate::config::NormalizerConfig;
use crate::grid::{Sheet, Workbook};
use crate::normalize::{
    normalize_installments, normalize_savings_goals, normalize_transactions, RowWarning,
    SheetOutcome, SkippedRow,
};

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("Workbook contains no sheets")]
    NoSheets,
    #[error("No usable data: all {sheets} sheet(s) are empty")]
    NoUsableData { sheets: usize },
}

/// Per-sheet counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SheetSummary {
    pub name: String,
    pub role: SheetRole,
    /// Data rows, excluding the header row.
    pub rows: usize,
    pub records: usize,
    pub skipped: usize,
    pub blank_rows: usize,
}

/// Everything one upload produced.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct NormalizationResult {
    pub transactions: Vec<Transaction>,
    pub installments: Vec<Installment>,
    pub savings_goals: Vec<SavingsGoal>,
    pub sheets: Vec<SheetSummary>,
    pub skipped: Vec<SkippedRow>,
    pub warnings: Vec<RowWarning>,
}

impl NormalizationResult {
    pub fn record_count(&self) -> usize {
        self.transactions.len() + self.installments.len() + self.savings_goals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    pub fn skipped_in(&self, sheet: &str) -> usize {
        self.skipped.iter().filter(|s| s.sheet == sheet).count()
    }

    fn absorb<T>(
        &mut self,
        sheet: &Sheet,
        role: SheetRole,
        outcome: SheetOutcome<T>,
        into: impl FnOnce(&mut Self) -> &mut Vec<T>,
    ) {
        self.sheets.push(SheetSummary {
            name: sheet.name().to_string(),
            role,
            rows: sheet.row_count(),
            records: outcome.records.len(),
            skipped: outcome.skipped.len(),
            blank_rows: outcome.blank_rows,
        });
        self.skipped.extend(outcome.skipped);
        self.warnings.extend(outcome.warnings);
        into(self).extend(outcome.records);
    }
}

/// Normalizes whole workbooks with one configuration.
#[derive(Debug, Clone, Default)]
pub struct WorkbookNormalizer {
    config: NormalizerConfig,
}

impl WorkbookNormalizer {
    pub fn new(config: NormalizerConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &NormalizerConfig {
        &self.config
    }

    /// Normalize every sheet of `workbook`.
    ///
    /// Bad rows never fail the call; they are listed in the result. An empty
    /// result is returned as-is when sheets have headers but no valid rows.
    /// Only a workbook with no sheets, or with nothing but blank sheets, is an
    /// error.
    pub fn normalize(&self, workbook: &Workbook) -> Result<NormalizationResult, NormalizeError> {
        if workbook.is_empty() {
            return Err(NormalizeError::NoSheets);
        }
        if workbook.sheets().iter().all(Sheet::is_blank) {
            return Err(NormalizeError::NoUsableData {
                sheets: workbook.sheets().len(),
            });
        }

        let mut result = NormalizationResult::default();
        for sheet in workbook.sheets() {
            let role = classify_sheet(sheet, &self.config);
            tracing::debug!(sheet = sheet.name(), %role, rows = sheet.row_count(), "sheet classified");

            match role {
                SheetRole::Transactions => {
                    let outcome = normalize_transactions(sheet, &self.config);
                    result.absorb(sheet, role, outcome, |r| &mut r.transactions);
                }
                SheetRole::Installments => {
                    let outcome = normalize_installments(sheet, &self.config);
                    result.absorb(sheet, role, outcome, |r| &mut r.installments);
                }
                SheetRole::SavingsGoals => {
                    let outcome = normalize_savings_goals(sheet, &self.config);
                    result.absorb(sheet, role, outcome, |r| &mut r.savings_goals);
                }
            }
        }

        tracing::info!(
            sheets = result.sheets.len(),
            transactions = result.transactions.len(),
            installments = result.installments.len(),
            savings_goals = result.savings_goals.len(),
            skipped = result.skipped.len(),
            warnings = result.warnings.len(),
            "workbook normalized"
        );
        if result.is_empty() {
            tracing::warn!(skipped = result.skipped.len(), "no records produced");
        }

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;
    use sheetwise_core::TransactionKind;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn grid(name: &str, rows: Vec<Vec<CellValue>>) -> Sheet {
        Sheet::from_grid(name, rows)
    }

    fn mixed_workbook() -> Workbook {
        Workbook::new(vec![
            grid(
                "Jan",
                vec![
                    vec![text("Date"), text("Description"), text("Amount")],
                    vec![text("2024-01-02"), text("Salary"), text("5000")],
                    vec![text("2024-01-03"), text("Rent"), text("-1500")],
                ],
            ),
            grid(
                "EMI Schedule",
                vec![
                    vec![text("Loan"), text("EMI Amount"), text("Due Date")],
                    vec![text("Car"), text("450"), text("2024-02-05")],
                ],
            ),
            grid(
                "Savings Goals",
                vec![
                    vec![text("Goal"), text("Target"), text("Deadline")],
                    vec![text("Trip"), text("3000"), text("2024-12-01")],
                    vec![text("Bad"), text("lots"), text("2024-12-01")],
                ],
            ),
            grid(
                "Feb",
                vec![
                    vec![text("Date"), text("Description"), text("Amount")],
                    vec![text("2024-02-02"), text("Salary"), text("5000")],
                ],
            ),
        ])
    }

    #[test]
    fn merges_in_sheet_then_row_order() {
        let result = WorkbookNormalizer::default().normalize(&mixed_workbook()).unwrap();

        let descriptions: Vec<_> = result.transactions.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descriptions, ["Salary", "Rent", "Salary"]);
        assert_eq!(result.transactions[1].kind, TransactionKind::Expense);
        assert_eq!(result.installments.len(), 1);
        assert_eq!(result.savings_goals.len(), 1);
        assert_eq!(result.record_count(), 5);

        let roles: Vec<_> = result.sheets.iter().map(|s| s.role).collect();
        assert_eq!(
            roles,
            [
                SheetRole::Transactions,
                SheetRole::Installments,
                SheetRole::SavingsGoals,
                SheetRole::Transactions
            ]
        );
        assert_eq!(result.skipped_in("Savings Goals"), 1);
        assert_eq!(result.skipped_in("Jan"), 0);
        assert_eq!(result.sheets[2].skipped, 1);
        assert_eq!(result.sheets[2].rows, 2);
    }

    #[test]
    fn same_input_same_output() {
        let normalizer = WorkbookNormalizer::default();
        let a = normalizer.normalize(&mixed_workbook()).unwrap();
        let b = normalizer.normalize(&mixed_workbook()).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn no_sheets_is_an_error() {
        assert_eq!(
            WorkbookNormalizer::default().normalize(&Workbook::default()),
            Err(NormalizeError::NoSheets)
        );
    }

    #[test]
    fn only_blank_sheets_is_an_error() {
        let wb = Workbook::new(vec![grid("Sheet1", vec![]), grid("Sheet2", vec![])]);
        assert_eq!(
            WorkbookNormalizer::default().normalize(&wb),
            Err(NormalizeError::NoUsableData { sheets: 2 })
        );
    }

    #[test]
    fn header_only_sheet_is_empty_but_ok() {
        let wb = Workbook::new(vec![grid(
            "Sheet1",
            vec![vec![text("Date"), text("Description"), text("Amount")]],
        )]);
        let result = WorkbookNormalizer::default().normalize(&wb).unwrap();
        assert!(result.transactions.is_empty());
        assert!(result.skipped.is_empty());
        assert_eq!(result.sheets.len(), 1);
    }

    #[test]
    fn all_rows_invalid_is_empty_but_ok() {
        let wb = Workbook::new(vec![grid(
            "Sheet1",
            vec![
                vec![text("Date"), text("Description"), text("Amount")],
                vec![text("2024-01-01"), text("x"), text("N/A")],
            ],
        )]);
        let result = WorkbookNormalizer::default().normalize(&wb).unwrap();
        assert!(result.is_empty());
        assert_eq!(result.skipped.len(), 1);
    }

    #[test]
    fn result_serializes_for_the_api_layer() {
        let result = WorkbookNormalizer::default().normalize(&mixed_workbook()).unwrap();
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["transactions"][0]["date"], "2024-01-02");
        assert_eq!(json["transactions"][1]["amount"], 1500.0);
        assert_eq!(json["installments"][0]["next_due_date"], "2024-02-05");
        assert_eq!(json["sheets"][1]["role"], "installments");
        assert_eq!(json["skipped"][0]["reason"], "invalid_amount");
    }
}
