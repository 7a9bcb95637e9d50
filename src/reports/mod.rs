//! Financial reporting over stored monthly ledgers
//!
//! A report is a pure function of the loaded ledgers, the period key and the
//! current time: an income and expenditure statement for the period, a
//! balance sheet as at the end of the period, and fixed notes.

pub mod balance_sheet;
pub mod notes;
pub mod period;
pub mod statement;

pub use balance_sheet::*;
pub use notes::*;
pub use period::*;
pub use statement::*;

use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::types::*;
use crate::utils::money;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportLineItem {
    pub label: String,
    #[serde(with = "money::as_number")]
    pub amount: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportNote {
    pub title: String,
    pub details: Vec<String>,
}

impl ReportNote {
    pub fn new(title: &str, details: Vec<String>) -> Self {
        Self {
            title: title.to_string(),
            details,
        }
    }
}

/// Income and expenditure for the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatementSection {
    pub income: Vec<ReportLineItem>,
    pub expenditure: Vec<ReportLineItem>,
    #[serde(with = "money::as_number")]
    pub total_income: BigDecimal,
    #[serde(with = "money::as_number")]
    pub total_expenditure: BigDecimal,
    #[serde(with = "money::as_number")]
    pub net_result: BigDecimal,
}

/// Balance sheet at the end of the period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BalanceSheetSection {
    pub assets: Vec<ReportLineItem>,
    pub liabilities: Vec<ReportLineItem>,
    #[serde(with = "money::as_number")]
    pub total_assets: BigDecimal,
    #[serde(with = "money::as_number")]
    pub total_liabilities: BigDecimal,
    #[serde(with = "money::as_number")]
    pub equity: BigDecimal,
    pub equity_label: String,
}

/// Complete financial report
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub period: String,
    pub label: String,
    pub range: String,
    pub as_at: String,
    pub statement: StatementSection,
    pub balance_sheet: BalanceSheetSection,
    pub notes: Vec<ReportNote>,
}

/// Build the report for `period_key` from every stored ledger.
///
/// The period is resolved first, so an unknown key fails before any work is
/// done on the ledgers.
pub fn build_report(
    period_key: &str,
    now: NaiveDateTime,
    ledgers_by_type: &BTreeMap<String, Vec<MonthlyLedger>>,
) -> LedgerResult<FinancialReport> {
    let period = resolve_period(period_key, now)?;
    Ok(build_report_for_period(&period, ledgers_by_type))
}

pub fn build_report_for_period(
    period: &ReportPeriod,
    ledgers_by_type: &BTreeMap<String, Vec<MonthlyLedger>>,
) -> FinancialReport {
    let statement = build_statement(period, ledgers_by_type);
    let balance_sheet = build_balance_sheet(period.end, ledgers_by_type);
    let notes = build_notes(&balance_sheet.assets);

    FinancialReport {
        period: period.key.clone(),
        label: period.label.clone(),
        range: period.range_label(),
        as_at: period.as_at_label(),
        statement,
        balance_sheet,
        notes,
    }
}
