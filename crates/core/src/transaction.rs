use serde::{Deserialize, Serialize};
use std::fmt;

use super::date::SheetDate;
use super::money::Money;

pub const DEFAULT_CATEGORY: &str = "Uncategorized";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionKind {
    Income,
    Expense,
}

// Whole words. Expense words are checked first, so "Credit Card Payment" and
// "Income Tax" are both expenses.
const EXPENSE_WORDS: &[&str] = &[
    "expense", "expenses", "debit", "dr", "withdrawal", "outflow", "out", "spent", "payment",
    "tax", "fee", "fees", "charge", "bill", "purchase",
];
const INCOME_WORDS: &[&str] = &[
    "income", "credit", "cr", "deposit", "inflow", "in", "received", "refund", "salary",
];

impl TransactionKind {
    /// Kind implied by a signed amount: negative is money out.
    pub fn from_sign(negative: bool) -> Self {
        if negative {
            TransactionKind::Expense
        } else {
            TransactionKind::Income
        }
    }

    /// Map a free-text type label ("Income", "DR", "Card payment") onto a kind.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_lowercase();
        match label.as_str() {
            "+" => return Some(TransactionKind::Income),
            "-" => return Some(TransactionKind::Expense),
            _ => {}
        }
        let words: Vec<&str> = label
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| !w.is_empty())
            .collect();
        let has_any = |set: &[&str]| words.iter().any(|w| set.iter().any(|s| s == w));
        if has_any(EXPENSE_WORDS) {
            Some(TransactionKind::Expense)
        } else if has_any(INCOME_WORDS) {
            Some(TransactionKind::Income)
        } else {
            None
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransactionKind::Income => write!(f, "Income"),
            TransactionKind::Expense => write!(f, "Expense"),
        }
    }
}

/// One income or expense line read from a transactions sheet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub date: SheetDate,
    pub description: String,
    pub category: String,
    pub amount: Money,
    pub kind: TransactionKind,
    /// The sheet's own type text when it had one, else the name of `kind`.
    pub kind_label: String,
    pub source: Option<String>,
}

impl Transaction {
    /// Signed view of the amount: expenses are negative.
    pub fn signed_cents(&self) -> i64 {
        match self.kind {
            TransactionKind::Income => self.amount.to_cents(),
            TransactionKind::Expense => -self.amount.to_cents(),
        }
    }
}
