//! Core types and data structures for the club ledger

use bigdecimal::BigDecimal;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::utils::money::{self, add_rounded, round_currency};

/// Ledger type used when an import does not name one
pub const DEFAULT_LEDGER_TYPE: &str = "BANK";

/// A single reconciled bank movement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Unique identifier, assigned at import time
    pub id: String,
    /// Date the movement occurred (serialized as `YYYY-MM-DD`)
    pub date: NaiveDate,
    /// Category label, may be blank in hand-edited ledgers
    #[serde(default)]
    pub category: String,
    /// Free-text description from the statement
    #[serde(default)]
    pub description: String,
    /// Signed amount: credits are non-negative, debits negative
    #[serde(with = "money::as_number")]
    pub amount: BigDecimal,
    /// Account balance immediately after this transaction
    #[serde(with = "money::as_number")]
    pub running_balance: BigDecimal,
}

/// One persisted month of one ledger type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyLedger {
    #[serde(default)]
    pub pk: String,
    /// Calendar month, `YYYY-MM`
    pub month: String,
    /// Ledger type (BANK, CASH, CARD, ...)
    #[serde(rename = "type", default)]
    pub ledger_type: String,
    #[serde(with = "money::as_number")]
    pub opening_balance: BigDecimal,
    #[serde(with = "money::as_number")]
    pub closing_balance: BigDecimal,
    /// Chronological, ties kept in import-file order
    #[serde(default)]
    pub transactions: Vec<Transaction>,
}

impl MonthlyLedger {
    /// Build the partition key, e.g. `LEDGER#BANK#2024-06`
    pub fn partition_key(ledger_type: &str, month: &str) -> String {
        format!("LEDGER#{}#{}", ledger_type, month)
    }

    /// A month with no transactions, carrying `balance` through
    pub fn empty(ledger_type: &str, month: &str, balance: BigDecimal) -> Self {
        Self {
            pk: Self::partition_key(ledger_type, month),
            month: month.to_string(),
            ledger_type: ledger_type.to_string(),
            opening_balance: balance.clone(),
            closing_balance: balance,
            transactions: Vec::new(),
        }
    }

    /// Sum of all transaction amounts, rounded per step
    pub fn net_movement(&self) -> BigDecimal {
        money::sum_rounded(self.transactions.iter().map(|t| &t.amount))
    }

    /// Check that the closing balance follows from the opening balance and
    /// that the last running balance agrees with it
    pub fn is_balanced(&self) -> bool {
        let expected = add_rounded(&self.opening_balance, &self.net_movement());
        if round_currency(&self.closing_balance) != expected {
            return false;
        }
        self.transactions
            .last()
            .is_none_or(|last| round_currency(&last.running_balance) == expected)
    }
}

/// Calendar month key (`YYYY-MM`) for a date
pub fn month_key(date: NaiveDate) -> String {
    format!("{:04}-{:02}", date.year(), date.month())
}

/// Parse a `YYYY-MM` month key into the first day of that month
pub fn parse_month(month: &str) -> Option<NaiveDate> {
    if month.len() != 7 {
        return None;
    }
    NaiveDate::parse_from_str(&format!("{}-01", month), "%Y-%m-%d").ok()
}

/// Summary returned by a bank statement import
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub status: String,
    #[serde(rename = "type")]
    pub ledger_type: String,
    /// Months written, ascending
    pub months: Vec<String>,
    /// Number of months written
    pub count: usize,
    /// Number of transactions imported
    pub transactions: usize,
    #[serde(with = "money::as_number")]
    pub opening_balance: BigDecimal,
    #[serde(with = "money::as_number")]
    pub closing_balance: BigDecimal,
}

/// Errors that can occur in the ledger system
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("invalid csv: {0}")]
    Parse(String),
    #[error("no transactions found")]
    EmptyImport,
    #[error("Validation error: {0}")]
    Validation(String),
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Storage error: {0}")]
    Storage(String),
    #[error("Invalid ledger format: {0}")]
    Serialization(String),
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),
    #[error("Identifier generation failed: {0}")]
    IdGeneration(String),
}

impl LedgerError {
    /// Only a missing document has a defined fallback
    pub fn is_not_found(&self) -> bool {
        matches!(self, LedgerError::NotFound(_))
    }
}

impl From<serde_json::Error> for LedgerError {
    fn from(err: serde_json::Error) -> Self {
        LedgerError::Serialization(err.to_string())
    }
}

/// Result type for ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;
