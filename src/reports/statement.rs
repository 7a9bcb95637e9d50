//! Income and expenditure statement

use bigdecimal::{BigDecimal, Zero};
use std::collections::BTreeMap;

use super::{ReportLineItem, ReportPeriod, StatementSection};
use crate::types::*;
use crate::utils::money::{add_rounded, round_currency, sub_rounded, sum_rounded};

/// Label for transactions without a category
pub const UNCATEGORISED: &str = "Uncategorised";

/// Bucket every transaction inside the period by category.
///
/// Credits go to income, debits (as positive magnitudes) to expenditure.
/// Line items are sorted by label.
pub fn build_statement(
    period: &ReportPeriod,
    ledgers_by_type: &BTreeMap<String, Vec<MonthlyLedger>>,
) -> StatementSection {
    let mut income: BTreeMap<String, BigDecimal> = BTreeMap::new();
    let mut expenditure: BTreeMap<String, BigDecimal> = BTreeMap::new();

    let transactions = ledgers_by_type
        .values()
        .flatten()
        .flat_map(|ledger| ledger.transactions.iter())
        .filter(|txn| period.contains(txn.date));

    for txn in transactions {
        let category = match txn.category.trim() {
            "" => UNCATEGORISED.to_string(),
            label => label.to_string(),
        };
        if txn.amount >= BigDecimal::zero() {
            let total = income.entry(category).or_default();
            *total = add_rounded(total, &txn.amount);
        } else {
            let total = expenditure.entry(category).or_default();
            *total = add_rounded(total, &txn.amount.abs());
        }
    }

    let income = into_line_items(income);
    let expenditure = into_line_items(expenditure);
    let total_income = sum_rounded(income.iter().map(|item| &item.amount));
    let total_expenditure = sum_rounded(expenditure.iter().map(|item| &item.amount));
    let net_result = sub_rounded(&total_income, &total_expenditure);

    StatementSection {
        income,
        expenditure,
        total_income,
        total_expenditure,
        net_result,
    }
}

fn into_line_items(totals: BTreeMap<String, BigDecimal>) -> Vec<ReportLineItem> {
    // BTreeMap iteration is already label order
    totals
        .into_iter()
        .map(|(label, amount)| ReportLineItem {
            label,
            amount: round_currency(&amount),
        })
        .collect()
}
