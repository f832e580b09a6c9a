//! Sheet classification: decide which role a sheet plays before its rows are
//! read.

use sheetwise_core::SheetRole;

use crate::config::NormalizerConfig;
use crate::grid::Sheet;

/// Name keywords, checked in order. Anything else is a transactions sheet.
pub const ROLE_KEYWORDS: &[(SheetRole, &[&str])] = &[
    (SheetRole::Installments, &["emi", "loan"]),
    (SheetRole::SavingsGoals, &["saving", "goal"]),
];

/// Role implied by the sheet name alone, if it carries a keyword.
pub fn role_from_name(name: &str) -> Option<SheetRole> {
    let name = name.to_lowercase();
    ROLE_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| name.contains(k)))
        .map(|(role, _)| *role)
}

/// Assign exactly one role to a sheet.
///
/// The name decides when it carries a keyword. Otherwise the sheet is a
/// transactions sheet, unless header inference is enabled and the headers fit
/// another role while not fitting transactions.
pub fn classify_sheet(sheet: &Sheet, config: &NormalizerConfig) -> SheetRole {
    if let Some(role) = role_from_name(sheet.name()) {
        return role;
    }
    if config.infer_role_from_headers && !headers_fit(sheet, SheetRole::Transactions, config) {
        if let Some(role) = [SheetRole::Installments, SheetRole::SavingsGoals]
            .into_iter()
            .find(|role| headers_fit(sheet, *role, config))
        {
            return role;
        }
    }
    SheetRole::Transactions
}

fn headers_fit(sheet: &Sheet, role: SheetRole, config: &NormalizerConfig) -> bool {
    let table = config.tokens(role);
    let bindings = table.bind(sheet.headers(), config.binding);
    table.required_fields().all(|f| bindings.is_bound(f))
}
