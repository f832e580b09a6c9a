//! Forward-looking records: installment loans and savings goals.

use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use super::date::SheetDate;
use super::money::Money;

/// A recurring installment (EMI) against a loan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Installment {
    pub name: String,
    pub recurring_amount: Money,
    pub next_due_date: SheetDate,
    /// Zero when the sheet had no total column.
    pub total_amount: Money,
    pub amount_paid: Money,
}

impl Installment {
    /// Fraction of the loan repaid. Undefined without a total.
    pub fn progress(&self) -> Option<f64> {
        self.amount_paid.ratio_of(self.total_amount)
    }

    pub fn outstanding(&self) -> Money {
        self.total_amount.saturating_sub(self.amount_paid)
    }

    /// Installments still to pay, rounding a partial final installment up.
    pub fn remaining_installments(&self) -> Option<u32> {
        if self.total_amount.is_zero() || self.recurring_amount.is_zero() {
            return None;
        }
        self.outstanding()
            .as_decimal()
            .checked_div(self.recurring_amount.as_decimal())?
            .ceil()
            .to_u32()
    }
}

/// A savings target with a deadline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavingsGoal {
    pub name: String,
    pub target_amount: Money,
    /// May exceed `target_amount`.
    pub current_amount: Money,
    pub deadline: SheetDate,
}

impl SavingsGoal {
    /// Not clamped: an overshoot reports a value above 1.0.
    pub fn progress(&self) -> Option<f64> {
        self.current_amount.ratio_of(self.target_amount)
    }

    pub fn shortfall(&self) -> Money {
        self.target_amount.saturating_sub(self.current_amount)
    }

    pub fn is_reached(&self) -> bool {
        !self.target_amount.is_zero() && self.current_amount >= self.target_amount
    }
}
