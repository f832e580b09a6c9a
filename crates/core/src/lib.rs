pub mod date;
pub mod money;
pub mod role;
pub mod schedule;
pub mod transaction;

pub use date::SheetDate;
pub use money::Money;
pub use role::{SheetRole, UnknownRole};
pub use schedule::{Installment, SavingsGoal};
pub use transaction::{Transaction, TransactionKind, DEFAULT_CATEGORY};
