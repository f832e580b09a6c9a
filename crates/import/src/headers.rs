//! Header resolution: bind each semantic field to one concrete column by
//! case-insensitive substring matching against ordered token lists.

use serde::{Deserialize, Serialize};
use sheetwise_core::SheetRole;
use std::fmt;

/// An abstract data need that must be bound to a column before rows are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Date,
    Description,
    Category,
    Amount,
    #[serde(rename = "type")]
    Kind,
    Source,
    Name,
    DueDate,
    Total,
    Paid,
    Target,
    Current,
    Deadline,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Field::Date => "date",
            Field::Description => "description",
            Field::Category => "category",
            Field::Amount => "amount",
            Field::Kind => "type",
            Field::Source => "source",
            Field::Name => "name",
            Field::DueDate => "due_date",
            Field::Total => "total",
            Field::Paid => "paid",
            Field::Target => "target",
            Field::Current => "current",
            Field::Deadline => "deadline",
        };
        write!(f, "{s}")
    }
}

impl std::str::FromStr for Field {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "date" => Ok(Field::Date),
            "description" => Ok(Field::Description),
            "category" => Ok(Field::Category),
            "amount" => Ok(Field::Amount),
            "type" | "kind" => Ok(Field::Kind),
            "source" => Ok(Field::Source),
            "name" => Ok(Field::Name),
            "due_date" | "due" => Ok(Field::DueDate),
            "total" => Ok(Field::Total),
            "paid" => Ok(Field::Paid),
            "target" => Ok(Field::Target),
            "current" => Ok(Field::Current),
            "deadline" => Ok(Field::Deadline),
            other => Err(format!("Unknown field: '{other}'")),
        }
    }
}

/// Default matching rule for one field of one sheet role.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub field: Field,
    /// Tried in order; the first token found in any header wins.
    pub tokens: &'static [&'static str],
    pub required: bool,
}

const fn spec(field: Field, tokens: &'static [&'static str], required: bool) -> FieldSpec {
    FieldSpec {
        field,
        tokens,
        required,
    }
}

// Fields are resolved in table order, which matters under exclusive binding.

pub const TRANSACTION_FIELDS: &[FieldSpec] = &[
    spec(Field::Date, &["date"], true),
    spec(
        Field::Description,
        &["description", "details", "particulars", "narration"],
        true,
    ),
    spec(Field::Amount, &["amount", "debit", "credit"], true),
    spec(Field::Category, &["category"], false),
    spec(Field::Kind, &["type"], false),
    spec(Field::Source, &["source"], false),
];

pub const INSTALLMENT_FIELDS: &[FieldSpec] = &[
    spec(Field::Name, &["name", "loan", "emi"], true),
    spec(Field::Amount, &["amount", "emi"], true),
    spec(Field::DueDate, &["due", "date", "end"], true),
    spec(Field::Total, &["total"], false),
    spec(Field::Paid, &["paid"], false),
];

pub const SAVINGS_GOAL_FIELDS: &[FieldSpec] = &[
    spec(Field::Name, &["name", "goal"], true),
    spec(Field::Target, &["target", "goal"], true),
    spec(Field::Deadline, &["deadline", "date", "target date"], true),
    spec(Field::Current, &["current", "saved"], false),
];

pub fn default_fields(role: SheetRole) -> &'static [FieldSpec] {
    match role {
        SheetRole::Transactions => TRANSACTION_FIELDS,
        SheetRole::Installments => INSTALLMENT_FIELDS,
        SheetRole::SavingsGoals => SAVINGS_GOAL_FIELDS,
    }
}

/// Whether one column may satisfy more than one field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BindingPolicy {
    /// A column bound to an earlier field is skipped for later fields.
    ///
    /// This is a one-to-one assignment, not per-field resolution: a lone
    /// `Goal` column becomes the goal name and leaves the target unbound.
    /// Use `Shared` for independent per-field resolution.
    #[default]
    Exclusive,
    /// Every field resolves independently; columns may be reused.
    Shared,
}

/// Find the column that best represents a field.
///
/// Tokens are tried in priority order. For each token the headers are scanned
/// left to right and the first one containing it (case-insensitively) wins.
pub fn resolve_header<H, T>(headers: &[H], tokens: &[T]) -> Option<usize>
where
    H: AsRef<str>,
    T: AsRef<str>,
{
    resolve_header_excluding(headers, tokens, &[])
}

/// As [`resolve_header`], ignoring the columns in `taken`.
pub fn resolve_header_excluding<H, T>(headers: &[H], tokens: &[T], taken: &[usize]) -> Option<usize>
where
    H: AsRef<str>,
    T: AsRef<str>,
{
    let lowered: Vec<String> = headers.iter().map(|h| h.as_ref().to_lowercase()).collect();
    tokens.iter().find_map(|token| {
        let token = token.as_ref().to_lowercase();
        if token.is_empty() {
            return None;
        }
        lowered
            .iter()
            .enumerate()
            .find(|(idx, header)| !taken.contains(idx) && header.contains(&token))
            .map(|(idx, _)| idx)
    })
}

/// Ordered token lists for every field of one sheet role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenTable {
    entries: Vec<TokenEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct TokenEntry {
    field: Field,
    tokens: Vec<String>,
    required: bool,
}

impl TokenTable {
    pub fn defaults(role: SheetRole) -> Self {
        Self {
            entries: default_fields(role)
                .iter()
                .map(|s| TokenEntry {
                    field: s.field,
                    tokens: s.tokens.iter().map(|t| t.to_string()).collect(),
                    required: s.required,
                })
                .collect(),
        }
    }

    /// Replace the tokens for a field. Returns `false` if the role has no such
    /// field.
    pub fn set_tokens(&mut self, field: Field, tokens: Vec<String>) -> bool {
        match self.entries.iter_mut().find(|e| e.field == field) {
            Some(entry) => {
                entry.tokens = tokens;
                true
            }
            None => false,
        }
    }

    pub fn tokens(&self, field: Field) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|e| e.field == field)
            .map(|e| e.tokens.as_slice())
    }

    pub fn fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.iter().map(|e| e.field)
    }

    pub fn required_fields(&self) -> impl Iterator<Item = Field> + '_ {
        self.entries.iter().filter(|e| e.required).map(|e| e.field)
    }

    /// Bind every field of this table against a sheet's headers.
    pub fn bind<H: AsRef<str>>(&self, headers: &[H], policy: BindingPolicy) -> HeaderBindings {
        let mut bound: Vec<(Field, usize)> = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let taken: Vec<usize> = match policy {
                BindingPolicy::Exclusive => bound.iter().map(|(_, col)| *col).collect(),
                BindingPolicy::Shared => Vec::new(),
            };
            if let Some(col) = resolve_header_excluding(headers, &entry.tokens, &taken) {
                bound.push((entry.field, col));
            }
        }
        HeaderBindings { bound }
    }
}

/// The column chosen for each field of a sheet. Computed once per sheet.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderBindings {
    bound: Vec<(Field, usize)>,
}

impl HeaderBindings {
    pub fn column(&self, field: Field) -> Option<usize> {
        self.bound
            .iter()
            .find(|(f, _)| *f == field)
            .map(|(_, col)| *col)
    }

    pub fn is_bound(&self, field: Field) -> bool {
        self.column(field).is_some()
    }

    /// `(field, header label)` pairs, for logging.
    pub fn describe<'h>(&self, headers: &'h [String]) -> Vec<(Field, &'h str)> {
        self.bound
            .iter()
            .filter_map(|(f, col)| headers.get(*col).map(|h| (*f, h.as_str())))
            .collect()
    }
}
