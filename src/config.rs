//! Runtime settings for the ledger core
//!
//! Every field has a default, so an empty JSON object (or a missing settings
//! file) yields a working configuration.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::types::{LedgerError, LedgerResult, DEFAULT_LEDGER_TYPE};

/// Category list served when none has been saved
pub const DEFAULT_CATEGORIES: [&str; 6] = [
    "Membership",
    "Event Fee",
    "Equipment",
    "Reimbursement",
    "Sponsorship",
    "Misc",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    /// How many earlier months a read may search for a closing balance
    #[serde(default = "default_lookback_months")]
    pub lookback_months: u32,

    /// Ledger type applied to imports that don't name one
    #[serde(default = "default_ledger_type")]
    pub default_ledger_type: String,

    /// Storage prefix under which `<TYPE>/<YYYY-MM>.json` documents live
    #[serde(default = "default_ledger_prefix")]
    pub ledger_prefix: String,

    /// Storage key of the saved category list
    #[serde(default = "default_categories_key")]
    pub categories_key: String,

    #[serde(default = "default_categories")]
    pub default_categories: Vec<String>,
}

fn default_lookback_months() -> u32 {
    6
}

fn default_ledger_type() -> String {
    DEFAULT_LEDGER_TYPE.to_string()
}

fn default_ledger_prefix() -> String {
    "ledger".to_string()
}

fn default_categories_key() -> String {
    "categories.json".to_string()
}

fn default_categories() -> Vec<String> {
    DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            lookback_months: default_lookback_months(),
            default_ledger_type: default_ledger_type(),
            ledger_prefix: default_ledger_prefix(),
            categories_key: default_categories_key(),
            default_categories: default_categories(),
        }
    }
}

impl Settings {
    /// Parse settings from a JSON document
    pub fn from_json(content: &str) -> LedgerResult<Self> {
        let settings: Settings = serde_json::from_str(content)
            .map_err(|e| LedgerError::Validation(format!("Invalid settings: {}", e)))?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a file, falling back to defaults if it doesn't exist
    pub fn load<P: AsRef<Path>>(path: P) -> LedgerResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            log::debug!("No settings at {}, using defaults", path.display());
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path).map_err(|e| {
            LedgerError::Storage(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    pub fn validate(&self) -> LedgerResult<()> {
        if self.default_ledger_type.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Default ledger type cannot be empty".to_string(),
            ));
        }
        let prefix = self.ledger_prefix.trim_matches('/');
        if prefix.is_empty() {
            return Err(LedgerError::Validation(
                "Ledger prefix cannot be empty".to_string(),
            ));
        }
        if self.categories_key.trim().is_empty() {
            return Err(LedgerError::Validation(
                "Categories key cannot be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Storage key of one monthly ledger document
    pub fn ledger_key(&self, ledger_type: &str, month: &str) -> String {
        format!("{}/{}.json", self.ledger_dir(ledger_type), month)
    }

    /// Storage prefix holding every month of one ledger type
    pub fn ledger_dir(&self, ledger_type: &str) -> String {
        format!("{}/{}", self.ledger_prefix.trim_matches('/'), ledger_type)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_from_empty_json() {
        let settings = Settings::from_json("{}").unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(settings.lookback_months, 6);
        assert_eq!(settings.default_categories.len(), 6);
    }

    #[test]
    fn test_partial_override() {
        let settings =
            Settings::from_json(r#"{"lookbackMonths": 3, "ledgerPrefix": "books/"}"#).unwrap();
        assert_eq!(settings.lookback_months, 3);
        assert_eq!(settings.ledger_key("CASH", "2024-02"), "books/CASH/2024-02.json");
        assert_eq!(settings.default_ledger_type, "BANK");
    }

    #[test]
    fn test_rejects_blank_prefix() {
        let result = Settings::from_json(r#"{"ledgerPrefix": "/"}"#);
        assert!(matches!(result, Err(LedgerError::Validation(_))));
    }

    #[test]
    fn test_load_missing_file_uses_defaults() {
        let settings = Settings::load("/nonexistent/club-ledger/settings.json").unwrap();
        assert_eq!(settings.ledger_key("BANK", "2024-06"), "ledger/BANK/2024-06.json");
    }
}
