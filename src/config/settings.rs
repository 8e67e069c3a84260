//! Budget settings loaded from `config.toml`.
//!
//! Every field has a default, so the file is optional. When present it may tune the
//! transaction ceiling, the allocation rounding policy, dashboard sizes, and a list of
//! starter categories seeded for newly registered users.

use crate::core::money::RoundingPolicy;
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, info};

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Limits and policies for the budgeting core
    pub budget: BudgetSettings,
    /// Categories created for every new profile
    pub starter_categories: Vec<StarterCategory>,
}

/// The `[budget]` table
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BudgetSettings {
    /// Largest single transaction accepted, in dollars
    pub transaction_ceiling: f64,
    /// How paycheck amounts are split into allocation cents
    pub rounding: RoundingPolicy,
    /// Number of paychecks listed on the dashboard
    pub recent_paycheck_limit: u64,
    /// Longest allowed category name, in characters
    pub max_category_name_len: usize,
}

impl Default for BudgetSettings {
    fn default() -> Self {
        Self {
            transaction_ceiling: 1_000_000.0,
            rounding: RoundingPolicy::HalfUp,
            recent_paycheck_limit: 5,
            max_category_name_len: 50,
        }
    }
}

/// One `[[starter_categories]]` entry
#[derive(Debug, Clone, Deserialize)]
pub struct StarterCategory {
    /// Name of the category
    pub name: String,
    /// Share of each paycheck
    pub percentage: f64,
    /// `RRGGBB` or `#RRGGBB`
    pub color: String,
}

impl Settings {
    /// Rejects settings the core cannot work with.
    pub fn validate(&self) -> Result<()> {
        let budget = &self.budget;
        if !budget.transaction_ceiling.is_finite() || budget.transaction_ceiling <= 0.0 {
            return Err(Error::Config {
                message: format!(
                    "transaction_ceiling must be a positive number, got {}",
                    budget.transaction_ceiling
                ),
            });
        }
        if budget.recent_paycheck_limit == 0 {
            return Err(Error::Config {
                message: "recent_paycheck_limit must be at least 1".to_string(),
            });
        }
        if budget.max_category_name_len == 0 {
            return Err(Error::Config {
                message: "max_category_name_len must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Parses settings from TOML text and validates them.
pub fn parse_settings(contents: &str) -> Result<Settings> {
    let settings: Settings = toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;
    settings.validate()?;
    Ok(settings)
}

/// Loads settings from a TOML file, falling back to defaults when it does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read, the TOML syntax is invalid,
/// or a value is out of range.
pub fn load_settings<P: AsRef<Path>>(path: P) -> Result<Settings> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No settings file at {}, using defaults", path.display());
        return Ok(Settings::default());
    }

    debug!("Loading settings from {}", path.display());
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;
    parse_settings(&contents)
}

/// Loads settings from `BUDGET_CONFIG`, or `./config.toml` when the variable is unset.
pub fn load_default_settings() -> Result<Settings> {
    let path = std::env::var("BUDGET_CONFIG").unwrap_or_else(|_| "config.toml".to_string());
    load_settings(path)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_full_settings() {
        let toml_str = r##"
            [budget]
            transaction_ceiling = 5000.0
            rounding = "largest-remainder"
            recent_paycheck_limit = 3
            max_category_name_len = 20

            [[starter_categories]]
            name = "Rent"
            percentage = 50.0
            color = "#FF0000"

            [[starter_categories]]
            name = "Food"
            percentage = 30.0
            color = "00ff00"
        "##;

        let settings = parse_settings(toml_str).unwrap();
        assert_eq!(settings.budget.transaction_ceiling, 5000.0);
        assert_eq!(settings.budget.rounding, RoundingPolicy::LargestRemainder);
        assert_eq!(settings.budget.recent_paycheck_limit, 3);
        assert_eq!(settings.budget.max_category_name_len, 20);
        assert_eq!(settings.starter_categories.len(), 2);
        assert_eq!(settings.starter_categories[1].name, "Food");
    }

    #[test]
    fn test_empty_settings_use_defaults() {
        let settings = parse_settings("").unwrap();
        assert_eq!(settings.budget.transaction_ceiling, 1_000_000.0);
        assert_eq!(settings.budget.rounding, RoundingPolicy::HalfUp);
        assert_eq!(settings.budget.recent_paycheck_limit, 5);
        assert!(settings.starter_categories.is_empty());
    }

    #[test]
    fn test_invalid_settings_rejected() {
        let result = parse_settings("[budget]\ntransaction_ceiling = -1.0\n");
        assert!(matches!(result, Err(Error::Config { .. })));

        let result = parse_settings("[budget]\nrounding = \"banker\"\n");
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let settings = load_settings("definitely/not/here/config.toml").unwrap();
        assert_eq!(settings.budget.max_category_name_len, 50);
    }
}
