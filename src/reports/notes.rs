//! Notes accompanying the financial report

use super::{ReportLineItem, ReportNote};
use crate::utils::money::format_currency;

pub fn build_notes(assets: &[ReportLineItem]) -> Vec<ReportNote> {
    let mut details = Vec::new();
    if assets.is_empty() {
        details.push("No ledger balances available for the period.".to_string());
    } else {
        details.extend(
            assets
                .iter()
                .map(|asset| format!("{}: {}", asset.label, format_currency(&asset.amount))),
        );
        details.push("Balances derived from ledger transactions.".to_string());
    }

    vec![
        ReportNote::new("Bank accounts", details),
        ReportNote::new(
            "Grants",
            vec!["Not available from ledgers; requires separate grant register.".to_string()],
        ),
        ReportNote::new(
            "Loans",
            vec!["Not available from ledgers; requires loan schedule data.".to_string()],
        ),
        ReportNote::new(
            "Trust money",
            vec!["Not available from ledgers; requires trust money ledger.".to_string()],
        ),
    ]
}
