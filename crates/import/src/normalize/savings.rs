use sheetwise_core::{Money, SavingsGoal, SheetRole};

use super::{fold_rows, RowReader, SheetOutcome, SkipReason};
use crate::config::NormalizerConfig;
use crate::grid::Sheet;
use crate::headers::Field;

/// Read a savings-goals sheet. Name, target and deadline are required; the
/// current amount defaults to zero and may exceed the target.
pub fn normalize_savings_goals(sheet: &Sheet, config: &NormalizerConfig) -> SheetOutcome<SavingsGoal> {
    let bindings = config
        .tokens(SheetRole::SavingsGoals)
        .bind(sheet.headers(), config.binding);
    tracing::debug!(
        sheet = sheet.name(),
        bindings = ?bindings.describe(sheet.headers()),
        "savings goal headers bound"
    );

    fold_rows(sheet, &bindings, |row| read_goal(row, config))
}

fn read_goal(row: &mut RowReader<'_>, config: &NormalizerConfig) -> Result<SavingsGoal, SkipReason> {
    let name = row.required_text(Field::Name)?;
    let target_amount = Money::from_decimal(row.required_amount(Field::Target)?);
    let deadline = row.required_date(Field::Deadline, config.lenient_schedule_dates)?;

    Ok(SavingsGoal {
        name,
        target_amount,
        current_amount: row.optional_money(Field::Current),
        deadline,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::CellValue;
    use crate::headers::BindingPolicy;

    fn text(s: &str) -> CellValue {
        CellValue::from(s)
    }

    fn sheet(headers: &[&str], rows: Vec<Vec<CellValue>>) -> Sheet {
        let mut grid = vec![headers.iter().map(|h| text(h)).collect::<Vec<_>>()];
        grid.extend(rows);
        Sheet::from_grid("Savings", grid)
    }

    #[test]
    fn full_row_with_overshoot() {
        let s = sheet(
            &["Goal Name", "Target Amount", "Saved So Far", "Deadline"],
            vec![vec![text("Trip"), text("$2,000"), text("$2,500"), text("2025-06-30")]],
        );
        let out = normalize_savings_goals(&s, &NormalizerConfig::default());
        let goal = &out.records[0];
        assert_eq!(goal.name, "Trip");
        assert_eq!(goal.target_amount.to_cents(), 200_000);
        assert_eq!(goal.current_amount.to_cents(), 250_000);
        assert_eq!(goal.progress(), Some(1.25));
        assert_eq!(goal.deadline.to_string(), "2025-06-30");
    }

    #[test]
    fn current_defaults_to_zero() {
        let s = sheet(
            &["Name", "Target", "Date"],
            vec![vec![text("Fund"), CellValue::Number(5000.0), CellValue::Number(45000.0)]],
        );
        let out = normalize_savings_goals(&s, &NormalizerConfig::default());
        assert!(out.records[0].current_amount.is_zero());
        assert_eq!(out.records[0].deadline.to_string(), "2023-03-15");
    }

    #[test]
    fn goal_name_and_goal_amount_bind_to_separate_columns() {
        let s = sheet(
            &["Goal Name", "Goal Amount", "Deadline"],
            vec![vec![text("Laptop"), text("1200"), text("2024-12-01")]],
        );
        let out = normalize_savings_goals(&s, &NormalizerConfig::default());
        assert_eq!(out.records[0].name, "Laptop");
        assert_eq!(out.records[0].target_amount.to_cents(), 120_000);
    }

    #[test]
    fn lone_goal_column_cannot_serve_as_name_and_target() {
        let rows = vec![vec![text("Emergency fund"), text("2025-01-01")]];

        let exclusive = normalize_savings_goals(&sheet(&["Goal", "Deadline"], rows.clone()), &NormalizerConfig::default());
        assert!(exclusive.records.is_empty());
        assert_eq!(
            exclusive.skipped[0].reason,
            SkipReason::MissingField { field: Field::Target }
        );

        let shared_config = NormalizerConfig {
            binding: BindingPolicy::Shared,
            ..NormalizerConfig::default()
        };
        let shared = normalize_savings_goals(&sheet(&["Goal", "Deadline"], rows), &shared_config);
        assert!(shared.records.is_empty());
        assert_eq!(
            shared.skipped[0].reason,
            SkipReason::InvalidAmount {
                field: Field::Target,
                raw: "Emergency fund".into()
            }
        );
    }

    #[test]
    fn unparseable_deadline_skips_the_row() {
        let s = sheet(
            &["Name", "Target", "Deadline"],
            vec![
                vec![text("A"), text("100"), text("someday")],
                vec![text("B"), text("100"), text("2026-01-01")],
            ],
        );
        let out = normalize_savings_goals(&s, &NormalizerConfig::default());
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].name, "B");
        assert_eq!(
            out.skipped[0].reason,
            SkipReason::InvalidDate { field: Field::Deadline, raw: "someday".into() }
        );
    }
}
