//! Splitting reconciled rows into monthly ledger documents

use std::collections::BTreeMap;

use crate::reconciliation::ReconciledRow;
use crate::types::*;
use crate::utils::money::{round_currency, sub_rounded};

/// Group reconciled rows by calendar month.
///
/// Each month's opening balance is taken from its first row
/// (`running - amount`) and its closing balance from its last row. Ledgers
/// are returned in ascending month order.
pub fn partition_by_month(ledger_type: &str, rows: &[ReconciledRow]) -> Vec<MonthlyLedger> {
    let mut by_month: BTreeMap<String, Vec<&ReconciledRow>> = BTreeMap::new();
    for row in rows {
        by_month.entry(month_key(row.date)).or_default().push(row);
    }

    by_month
        .into_iter()
        .filter_map(|(month, mut rows)| {
            rows.sort_by(|a, b| {
                a.date
                    .cmp(&b.date)
                    .then_with(|| a.file_index.cmp(&b.file_index))
            });
            let first = rows.first()?;
            let last = rows.last()?;

            Some(MonthlyLedger {
                pk: MonthlyLedger::partition_key(ledger_type, &month),
                opening_balance: sub_rounded(&first.running_balance, &first.amount),
                closing_balance: round_currency(&last.running_balance),
                transactions: rows.iter().map(|row| row.to_transaction()).collect(),
                ledger_type: ledger_type.to_string(),
                month,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bigdecimal::BigDecimal;
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn row(file_index: usize, date: (i32, u32, u32), amount: &str, running: &str) -> ReconciledRow {
        ReconciledRow {
            file_index,
            id: format!("id-{}", file_index),
            date: NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            amount: dec(amount),
            description: "row".to_string(),
            category: "Misc".to_string(),
            running_balance: dec(running),
        }
    }

    #[test]
    fn test_single_month() {
        let rows = vec![
            row(1, (2024, 6, 1), "-40.00", "60.00"),
            row(0, (2024, 6, 2), "100.00", "160.00"),
        ];

        let ledgers = partition_by_month("BANK", &rows);

        assert_eq!(ledgers.len(), 1);
        let june = &ledgers[0];
        assert_eq!(june.month, "2024-06");
        assert_eq!(june.pk, "LEDGER#BANK#2024-06");
        assert_eq!(june.opening_balance, dec("100.00"));
        assert_eq!(june.closing_balance, dec("160.00"));
        assert_eq!(june.transactions.len(), 2);
        assert!(june.is_balanced());
    }

    #[test]
    fn test_months_ascending_and_continuous() {
        let rows = vec![
            row(3, (2024, 5, 30), "10.00", "110.00"),
            row(2, (2024, 6, 3), "-5.00", "105.00"),
            row(0, (2024, 7, 1), "2.50", "107.50"),
            row(1, (2024, 7, 1), "0.50", "108.00"),
        ];

        let ledgers = partition_by_month("CASH", &rows);
        let months: Vec<_> = ledgers.iter().map(|l| l.month.as_str()).collect();
        assert_eq!(months, vec!["2024-05", "2024-06", "2024-07"]);

        for pair in ledgers.windows(2) {
            assert_eq!(pair[1].opening_balance, pair[0].closing_balance);
        }
        assert!(ledgers.iter().all(|l| l.is_balanced()));
    }

    #[test]
    fn test_resorts_within_month() {
        // same date, out of file order
        let rows = vec![
            row(1, (2024, 7, 1), "0.50", "108.00"),
            row(0, (2024, 7, 1), "2.50", "107.50"),
        ];

        let ledgers = partition_by_month("CASH", &rows);
        let ids: Vec<_> = ledgers[0].transactions.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["id-0", "id-1"]);
        assert_eq!(ledgers[0].opening_balance, dec("105.00"));
        assert_eq!(ledgers[0].closing_balance, dec("108.00"));
    }

    #[test]
    fn test_no_rows() {
        assert!(partition_by_month("BANK", &[]).is_empty());
    }
}
