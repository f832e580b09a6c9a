use sheetwise_core::{Installment, Money, SheetRole};

use super::{fold_rows, RowReader, SheetOutcome, SkipReason};
use crate::config::NormalizerConfig;
use crate::grid::Sheet;
use crate::headers::Field;

/// Read an EMI / loan sheet. Name, installment amount and due date are
/// required; total and paid default to zero.
pub fn normalize_installments(sheet: &Sheet, config: &NormalizerConfig) -> SheetOutcome<Installment> {
    let bindings = config
        .tokens(SheetRole::Installments)
        .bind(sheet.headers(), config.binding);
    tracing::debug!(
        sheet = sheet.name(),
        bindings = ?bindings.describe(sheet.headers()),
        "installment headers bound"
    );

    fold_rows(sheet, &bindings, |row| read_installment(row, config))
}

fn read_installment(row: &mut RowReader<'_>, config: &NormalizerConfig) -> Result<Installment, SkipReason> {
    let name = row.required_text(Field::Name)?;
    let recurring_amount = Money::from_decimal(row.required_amount(Field::Amount)?);
    let next_due_date = row.required_date(Field::DueDate, config.lenient_schedule_dates)?;

    Ok(Installment {
        name,
        recurring_amount,
        next_due_date,
        total_amount: row.optional_money(Field::Total),
        amount_paid: row.optional_money(Field::Paid),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;
    use crate::normalize::WarningKind;
    use sheetwise_core::SheetDate;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn sheet(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Sheet {
        let mut grid = vec![headers.iter().map(|h| text(h)).collect::<Vec<_>>()];
        grid.extend(rows);
        Sheet::from_grid("EMI", grid)
    }

    #[test]
    fn full_row() {
        let s = sheet(
            &["Loan Name", "EMI Amount", "Next Due Date", "Total Amount", "Amount Paid"],
            vec![vec![
                text("Car"),
                text("₹12,500"),
                CellValue::Number(45000.0),
                text("6,00,000"),
                CellValue::Number(150000.0),
            ]],
        );
        let out = normalize_installments(&s, &NormalizerConfig::default());
        assert!(out.skipped.is_empty(), "{:?}", out.skipped);
        let emi = &out.records[0];
        assert_eq!(emi.name, "Car");
        assert_eq!(emi.recurring_amount.to_cents(), 1_250_000);
        assert_eq!(emi.next_due_date.to_string(), "2023-03-15");
        assert_eq!(emi.total_amount.to_cents(), 60_000_000);
        assert_eq!(emi.amount_paid.to_cents(), 15_000_000);
        assert_eq!(emi.progress(), Some(0.25));
    }

    #[test]
    fn optional_columns_default_to_zero() {
        let s = sheet(
            &["Loan", "EMI", "Due"],
            vec![vec![text("Phone"), text("999"), text("2024-07-05")]],
        );
        let out = normalize_installments(&s, &NormalizerConfig::default());
        let emi = &out.records[0];
        assert!(emi.total_amount.is_zero());
        assert!(emi.amount_paid.is_zero());
        assert_eq!(emi.progress(), None);
    }

    #[test]
    fn generic_date_column_is_the_due_date() {
        let s = sheet(
            &["Name", "Amount", "Date"],
            vec![vec![text("Bike"), text("1500"), text("05/08/2024")]],
        );
        let out = normalize_installments(&s, &NormalizerConfig::default());
        assert_eq!(out.records[0].next_due_date.to_string(), "2024-05-08");
    }

    #[test]
    fn serial_due_date_from_delimited_text() {
        let s = sheet(
            &["Name", "Amount", "Due Date"],
            vec![vec![text("Car"), text("450"), text("45000")]],
        );
        let out = normalize_installments(&s, &NormalizerConfig::default());
        assert!(out.skipped.is_empty(), "{:?}", out.skipped);
        assert_eq!(out.records[0].next_due_date.to_string(), "2023-03-15");
    }

    #[test]
    fn bad_rows_are_skipped_individually() {
        let s = sheet(
            &["Name", "Amount", "Due Date", "Paid"],
            vec![
                vec![CellValue::Empty, text("100"), text("2024-01-01"), CellValue::Empty],
                vec![text("B"), text("lots"), text("2024-01-01"), CellValue::Empty],
                vec![text("C"), text("100"), text("whenever"), CellValue::Empty],
                vec![text("D"), text("100"), text("2024-01-01"), text("unknown")],
            ],
        );
        let out = normalize_installments(&s, &NormalizerConfig::default());

        let reasons: Vec<_> = out.skipped.iter().map(|s| (s.row, s.reason.clone())).collect();
        assert_eq!(
            reasons,
            [
                (1, SkipReason::MissingField { field: Field::Name }),
                (2, SkipReason::InvalidAmount { field: Field::Amount, raw: "lots".into() }),
                (3, SkipReason::InvalidDate { field: Field::DueDate, raw: "whenever".into() }),
            ]
        );
        assert_eq!(out.records.len(), 1);
        assert!(out.records[0].amount_paid.is_zero());
        assert_eq!(
            out.warnings[0].warning,
            WarningKind::InvalidOptionalAmount { raw: "unknown".into() }
        );
    }

    #[test]
    fn lenient_dates_keep_the_text() {
        let config = NormalizerConfig {
            lenient_schedule_dates: true,
            ..NormalizerConfig::default()
        };
        let s = sheet(
            &["Name", "Amount", "Due Date"],
            vec![vec![text("C"), text("100"), text("5th of every month")]],
        );
        let out = normalize_installments(&s, &config);
        assert_eq!(
            out.records[0].next_due_date,
            SheetDate::Unparsed("5th of every month".into())
        );
        assert_eq!(out.warnings.len(), 1);
    }
}
