use rust_decimal::Decimal;
use sheetwise_core::{Money, SheetDate, SheetRole, Transaction, TransactionKind};

use super::{fold_rows, RowReader, SheetOutcome, SkipReason, WarningKind};
use crate::config::NormalizerConfig;
use crate::decode;
use crate::grid::Sheet;
use crate::headers::Field;

/// Read a transactions sheet.
///
/// Date, description and amount are required. The amount is stored as a
/// magnitude; when no type column speaks for the row, its sign decides the
/// kind (negative is an expense).
pub fn normalize_transactions(sheet: &Sheet, config: &NormalizerConfig) -> SheetOutcome<Transaction> {
    let bindings = config
        .tokens(SheetRole::Transactions)
        .bind(sheet.headers(), config.binding);
    tracing::debug!(
        sheet = sheet.name(),
        bindings = ?bindings.describe(sheet.headers()),
        "transaction headers bound"
    );

    fold_rows(sheet, &bindings, |row| read_transaction(row, config))
}

fn read_transaction(row: &mut RowReader<'_>, config: &NormalizerConfig) -> Result<Transaction, SkipReason> {
    let date = transaction_date(row)?;
    let description = row.required_text(Field::Description)?;
    let signed = row.required_amount(Field::Amount)?;

    let category = row
        .optional_text(Field::Category)
        .unwrap_or_else(|| config.default_category.clone());
    let (kind, kind_label) = transaction_kind(row, signed);

    Ok(Transaction {
        date,
        description,
        category,
        amount: Money::from_decimal(signed),
        kind,
        kind_label,
        source: row.optional_text(Field::Source),
    })
}

/// Transaction dates are lenient: unparseable text passes through.
fn transaction_date(row: &mut RowReader<'_>) -> Result<SheetDate, SkipReason> {
    let cell = row
        .cell(Field::Date)
        .ok_or(SkipReason::MissingField { field: Field::Date })?;
    let date = decode::decode_date(cell).ok_or(SkipReason::MissingField { field: Field::Date })?;
    if let SheetDate::Unparsed(raw) = &date {
        row.warn(Field::Date, WarningKind::UnparsedDate { raw: raw.clone() });
    }
    Ok(date)
}

fn transaction_kind(row: &mut RowReader<'_>, signed: Decimal) -> (TransactionKind, String) {
    let by_sign = TransactionKind::from_sign(signed < Decimal::ZERO);
    match row.verbatim_text(Field::Kind) {
        Some(label) => {
            let kind = TransactionKind::from_label(&label).unwrap_or_else(|| {
                row.warn(Field::Kind, WarningKind::UnrecognizedKind { label: label.clone() });
                by_sign
            });
            (kind, label)
        }
        None => (by_sign, by_sign.to_string()),
    }
}
