use serde::Deserialize;
use sheetwise_core::{SheetRole, DEFAULT_CATEGORY};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::headers::{BindingPolicy, Field, TokenTable};

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    UnknownRole(#[from] sheetwise_core::UnknownRole),
    #[error("Unknown field: '{0}'")]
    UnknownFieldName(String),
    #[error("Field '{field}' does not apply to {role} sheets")]
    UnknownField { role: SheetRole, field: Field },
    #[error("Token list for {role}.{field} is empty")]
    EmptyTokens { role: SheetRole, field: Field },
}

/// Knobs for header matching and row leniency.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizerConfig {
    pub binding: BindingPolicy,
    pub default_category: String,
    /// Keep installment/goal rows whose date cannot be parsed, passing the
    /// text through, instead of skipping them.
    pub lenient_schedule_dates: bool,
    /// Look at headers when a sheet name carries no role keyword.
    pub infer_role_from_headers: bool,
    pub(crate) transactions: TokenTable,
    pub(crate) installments: TokenTable,
    pub(crate) savings_goals: TokenTable,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            binding: BindingPolicy::default(),
            default_category: DEFAULT_CATEGORY.to_string(),
            lenient_schedule_dates: false,
            infer_role_from_headers: false,
            transactions: TokenTable::defaults(SheetRole::Transactions),
            installments: TokenTable::defaults(SheetRole::Installments),
            savings_goals: TokenTable::defaults(SheetRole::SavingsGoals),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    binding: Option<BindingPolicy>,
    default_category: Option<String>,
    lenient_schedule_dates: Option<bool>,
    infer_role_from_headers: Option<bool>,
    #[serde(default)]
    tokens: BTreeMap<String, BTreeMap<String, Vec<String>>>,
}

impl NormalizerConfig {
    pub fn tokens(&self, role: SheetRole) -> &TokenTable {
        match role {
            SheetRole::Transactions => &self.transactions,
            SheetRole::Installments => &self.installments,
            SheetRole::SavingsGoals => &self.savings_goals,
        }
    }

    pub fn tokens_mut(&mut self, role: SheetRole) -> &mut TokenTable {
        match role {
            SheetRole::Transactions => &mut self.transactions,
            SheetRole::Installments => &mut self.installments,
            SheetRole::SavingsGoals => &mut self.savings_goals,
        }
    }

    /// Load overrides on top of the defaults. Keys left out keep their
    /// default value.
    ///
    /// ```toml
    /// binding = "shared"
    /// default_category = "Misc"
    ///
    /// [tokens.transactions]
    /// description = ["memo", "description"]
    /// ```
    pub fn from_toml(toml_content: &str) -> Result<Self, ConfigError> {
        let file: ConfigFile = toml::from_str(toml_content)?;
        let mut config = Self::default();

        if let Some(binding) = file.binding {
            config.binding = binding;
        }
        if let Some(category) = file.default_category {
            config.default_category = category;
        }
        if let Some(lenient) = file.lenient_schedule_dates {
            config.lenient_schedule_dates = lenient;
        }
        if let Some(infer) = file.infer_role_from_headers {
            config.infer_role_from_headers = infer;
        }

        for (role, fields) in file.tokens {
            let role: SheetRole = role.parse()?;
            for (field, tokens) in fields {
                let field: Field = field.parse().map_err(|_| ConfigError::UnknownFieldName(field))?;
                let tokens: Vec<String> = tokens
                    .into_iter()
                    .map(|t| t.trim().to_string())
                    .filter(|t| !t.is_empty())
                    .collect();
                if tokens.is_empty() {
                    return Err(ConfigError::EmptyTokens { role, field });
                }
                if !config.tokens_mut(role).set_tokens(field, tokens) {
                    return Err(ConfigError::UnknownField { role, field });
                }
            }
        }

        Ok(config)
    }

    pub fn from_path(path: &std::path::Path) -> Result<Self, ConfigError> {
        Self::from_toml(&std::fs::read_to_string(path)?)
    }
}
