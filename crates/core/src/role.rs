use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// What a sheet holds. Assigned once per sheet before any row is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SheetRole {
    Transactions,
    Installments,
    SavingsGoals,
}

impl SheetRole {
    pub const ALL: [SheetRole; 3] = [
        SheetRole::Transactions,
        SheetRole::Installments,
        SheetRole::SavingsGoals,
    ];
}

impl fmt::Display for SheetRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SheetRole::Transactions => write!(f, "transactions"),
            SheetRole::Installments => write!(f, "installments"),
            SheetRole::SavingsGoals => write!(f, "savings_goals"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown sheet role: '{0}'")]
pub struct UnknownRole(pub String);

impl std::str::FromStr for SheetRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "transactions" => Ok(SheetRole::Transactions),
            "installments" | "emi" | "loans" => Ok(SheetRole::Installments),
            "savings_goals" | "savings" | "goals" => Ok(SheetRole::SavingsGoals),
            other => Err(UnknownRole(other.to_string())),
        }
    }
}
