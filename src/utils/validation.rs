//! Validation utilities
//!
//! Everything here runs before any storage I/O.

use bigdecimal::BigDecimal;

use crate::types::*;

/// Validate that a ledger type is present and usable as a storage segment
pub fn validate_ledger_type(ledger_type: &str) -> LedgerResult<()> {
    if ledger_type.trim().is_empty() {
        return Err(LedgerError::Validation("Type is required".to_string()));
    }

    if !ledger_type
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(LedgerError::Validation(
            "Type can only contain alphanumeric characters, dashes, and underscores".to_string(),
        ));
    }

    Ok(())
}

/// Trim and upper-case a requested ledger type, defaulting when blank
pub fn normalize_ledger_type(requested: Option<&str>, default: &str) -> String {
    let trimmed = requested.map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        default.to_uppercase()
    } else {
        trimmed.to_uppercase()
    }
}

/// Validate a `YYYY-MM` month key
pub fn validate_month(month: &str) -> LedgerResult<()> {
    if month.trim().is_empty() {
        return Err(LedgerError::Validation("Month is required".to_string()));
    }
    if parse_month(month).is_none() {
        return Err(LedgerError::Validation(
            "Month must be YYYY-MM".to_string(),
        ));
    }
    Ok(())
}

/// The current balance is the anchor for every import
pub fn require_current_balance(balance: Option<&BigDecimal>) -> LedgerResult<&BigDecimal> {
    balance.ok_or_else(|| LedgerError::Validation("Current balance is required".to_string()))
}

/// Validate that an import carries CSV content
pub fn validate_csv_content(content: &str) -> LedgerResult<()> {
    if content.trim().is_empty() {
        return Err(LedgerError::Validation(
            "CSV content is required".to_string(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ledger_type_rules() {
        assert!(validate_ledger_type("BANK").is_ok());
        assert!(validate_ledger_type("petty_cash").is_ok());
        assert!(validate_ledger_type("  ").is_err());
        assert!(validate_ledger_type("../BANK").is_err());
    }

    #[test]
    fn test_normalize_ledger_type() {
        assert_eq!(normalize_ledger_type(Some(" cash "), "BANK"), "CASH");
        assert_eq!(normalize_ledger_type(Some(""), "BANK"), "BANK");
        assert_eq!(normalize_ledger_type(None, "bank"), "BANK");
    }

    #[test]
    fn test_month_rules() {
        assert!(validate_month("2024-06").is_ok());
        assert!(validate_month("").is_err());
        assert!(validate_month("2024/06").is_err());
        assert!(validate_month("2024-00").is_err());
    }

    #[test]
    fn test_required_inputs() {
        assert!(require_current_balance(None).is_err());
        assert!(validate_csv_content("\n  \n").is_err());
        assert!(validate_csv_content("01/01/2024,1,x").is_ok());
    }
}
