//! As-at balances and the balance sheet
//!
//! Balances are always replayed from the first stored month of a ledger
//! type; nothing is carried incrementally between reports.

use bigdecimal::BigDecimal;
use chrono::{NaiveDateTime, NaiveTime};
use std::collections::BTreeMap;

use super::{BalanceSheetSection, ReportLineItem};
use crate::types::*;
use crate::utils::money::{add_rounded, round_currency, sub_rounded, sum_rounded, zero};

pub const EQUITY_LABEL: &str = "Accumulated funds";

/// Display label for a ledger type on the balance sheet
pub fn asset_label(ledger_type: &str) -> String {
    match ledger_type {
        "BANK" => "Bank account".to_string(),
        "CASH" => "Cash on hand".to_string(),
        "CARD" => "Card balance".to_string(),
        other => format!("{} ledger", other),
    }
}

/// Balance of one ledger type at `end`.
///
/// Months that begin after `end` are ignored. The earliest remaining month's
/// opening balance seeds the replay of every transaction dated on or before
/// `end`, ordered by month and then by date within the month. Returns `None`
/// when no month qualifies.
pub fn ledger_balance_as_at(ledgers: &[MonthlyLedger], end: NaiveDateTime) -> Option<BigDecimal> {
    let mut valid: Vec<&MonthlyLedger> = ledgers
        .iter()
        .filter(|ledger| {
            parse_month(&ledger.month)
                .is_some_and(|start| start.and_time(NaiveTime::MIN) <= end)
        })
        .collect();
    valid.sort_by(|a, b| a.month.cmp(&b.month));

    let seed = round_currency(&valid.first()?.opening_balance);

    let mut transactions: Vec<(&str, &Transaction)> = valid
        .iter()
        .flat_map(|ledger| {
            ledger
                .transactions
                .iter()
                .map(move |txn| (ledger.month.as_str(), txn))
        })
        .filter(|(_, txn)| txn.date.and_time(NaiveTime::MIN) <= end)
        .collect();
    // stable: same-day transactions keep their stored order
    transactions.sort_by(|a, b| a.0.cmp(b.0).then_with(|| a.1.date.cmp(&b.1.date)));

    Some(
        transactions
            .into_iter()
            .fold(seed, |balance, (_, txn)| add_rounded(&balance, &txn.amount)),
    )
}

/// One asset line per ledger type with a balance, sorted by label
pub fn build_assets(
    end: NaiveDateTime,
    ledgers_by_type: &BTreeMap<String, Vec<MonthlyLedger>>,
) -> Vec<ReportLineItem> {
    let mut assets: Vec<ReportLineItem> = ledgers_by_type
        .iter()
        .filter_map(|(ledger_type, ledgers)| {
            ledger_balance_as_at(ledgers, end).map(|amount| ReportLineItem {
                label: asset_label(ledger_type),
                amount,
            })
        })
        .collect();
    assets.sort_by(|a, b| a.label.cmp(&b.label));
    assets
}

/// Balance sheet as at `end`. Liabilities are not tracked by the ledgers.
pub fn build_balance_sheet(
    end: NaiveDateTime,
    ledgers_by_type: &BTreeMap<String, Vec<MonthlyLedger>>,
) -> BalanceSheetSection {
    let assets = build_assets(end, ledgers_by_type);
    let liabilities: Vec<ReportLineItem> = Vec::new();
    let total_assets = sum_rounded(assets.iter().map(|item| &item.amount));
    let total_liabilities = zero();
    let equity = sub_rounded(&total_assets, &total_liabilities);

    BalanceSheetSection {
        assets,
        liabilities,
        total_assets,
        total_liabilities,
        equity,
        equity_label: EQUITY_LABEL.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, NaiveDate};
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn end_of(y: i32, m: u32, d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(23, 59, 59)
            .unwrap()
    }

    fn ledger(month: &str, opening: &str, amounts: &[(u32, &str)]) -> MonthlyLedger {
        let start = parse_month(month).unwrap();
        let mut ledger = MonthlyLedger::empty("BANK", month, dec(opening));
        let mut running = dec(opening);
        for (i, (day, amount)) in amounts.iter().enumerate() {
            running = add_rounded(&running, &dec(amount));
            ledger.transactions.push(Transaction {
                id: format!("{}-{}", month, i),
                date: start.with_day(*day).unwrap(),
                category: "Misc".to_string(),
                description: String::new(),
                amount: dec(amount),
                running_balance: running.clone(),
            });
        }
        ledger.closing_balance = running;
        ledger
    }

    #[test]
    fn test_asset_labels() {
        assert_eq!(asset_label("BANK"), "Bank account");
        assert_eq!(asset_label("CASH"), "Cash on hand");
        assert_eq!(asset_label("CARD"), "Card balance");
        assert_eq!(asset_label("PAYPAL"), "PAYPAL ledger");
    }

    #[test]
    fn test_replays_from_first_month() {
        let ledgers = vec![
            ledger("2024-06", "60.00", &[(3, "-10.00"), (20, "5.55")]),
            ledger("2024-05", "100.00", &[(1, "-40.00")]),
        ];

        assert_eq!(
            ledger_balance_as_at(&ledgers, end_of(2024, 6, 30)),
            Some(dec("55.55"))
        );
        assert_eq!(
            ledger_balance_as_at(&ledgers, end_of(2024, 6, 10)),
            Some(dec("50.00"))
        );
        assert_eq!(
            ledger_balance_as_at(&ledgers, end_of(2024, 5, 31)),
            Some(dec("60.00"))
        );
    }

    #[test]
    fn test_no_month_before_end() {
        let ledgers = vec![ledger("2024-07", "10.00", &[(1, "1.00")])];
        assert_eq!(ledger_balance_as_at(&ledgers, end_of(2024, 6, 30)), None);
        assert_eq!(ledger_balance_as_at(&[], end_of(2024, 6, 30)), None);
    }

    #[test]
    fn test_balance_sheet_totals() {
        let mut data = BTreeMap::new();
        data.insert(
            "CASH".to_string(),
            vec![ledger("2024-01", "20.00", &[(2, "5.00")])],
        );
        data.insert(
            "BANK".to_string(),
            vec![ledger("2024-01", "100.00", &[(2, "0.01")])],
        );
        data.insert("CARD".to_string(), vec![ledger("2025-01", "1.00", &[])]);

        let sheet = build_balance_sheet(end_of(2024, 6, 30), &data);

        let labels: Vec<_> = sheet.assets.iter().map(|a| a.label.as_str()).collect();
        assert_eq!(labels, vec!["Bank account", "Cash on hand"]);
        assert_eq!(sheet.total_assets, dec("125.01"));
        assert!(sheet.liabilities.is_empty());
        assert_eq!(sheet.total_liabilities, dec("0"));
        assert_eq!(sheet.equity, dec("125.01"));
        assert_eq!(sheet.equity_label, EQUITY_LABEL);
    }
}
