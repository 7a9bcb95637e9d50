//! Balance reconciliation for imported bank statements
//!
//! A bank export only tells us the movements; the caller supplies the account
//! balance as it stands after all of them. From that we derive the opening
//! balance and a running balance for every row.
//!
//! The opening balance is derived from the rows in file order, while running
//! balances are allocated in date order. For exports that are not strictly
//! newest-first the derived opening balance may not sit on a real calendar
//! boundary; this is the established behaviour and is kept as is.

use bigdecimal::BigDecimal;
use chrono::NaiveDate;

use crate::ingest::{categorize, RawRow};
use crate::traits::IdGenerator;
use crate::types::*;
use crate::utils::money::{add_rounded, round_currency, sub_rounded, sum_rounded};

/// A statement row with its identity, category and running balance
#[derive(Debug, Clone, PartialEq)]
pub struct ReconciledRow {
    pub file_index: usize,
    pub id: String,
    pub date: NaiveDate,
    pub amount: BigDecimal,
    pub description: String,
    pub category: String,
    pub running_balance: BigDecimal,
}

impl ReconciledRow {
    pub fn to_transaction(&self) -> Transaction {
        Transaction {
            id: self.id.clone(),
            date: self.date,
            category: self.category.clone(),
            description: self.description.clone(),
            amount: round_currency(&self.amount),
            running_balance: round_currency(&self.running_balance),
        }
    }
}

/// Outcome of reconciling one import
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    pub ledger_type: String,
    /// Balance before the earliest row
    pub opening_balance: BigDecimal,
    /// The supplied current balance, rounded
    pub closing_balance: BigDecimal,
    /// Rows in chronological order (date, then file position)
    pub rows: Vec<ReconciledRow>,
}

/// Reconciliation engine, parameterised over the identifier source
pub struct ReconciliationEngine<'a> {
    ids: &'a dyn IdGenerator,
}

impl<'a> ReconciliationEngine<'a> {
    pub fn new(ids: &'a dyn IdGenerator) -> Self {
        Self { ids }
    }

    /// Derive opening and running balances from the current balance.
    ///
    /// Fails without partial output if any identifier cannot be generated.
    pub fn reconcile(
        &self,
        rows: Vec<RawRow>,
        current_balance: &BigDecimal,
        ledger_type: &str,
    ) -> LedgerResult<Reconciliation> {
        let total_delta = sum_rounded(rows.iter().map(|row| &row.amount));
        let opening_balance = sub_rounded(current_balance, &total_delta);

        if rows.windows(2).any(|pair| pair[0].date < pair[1].date) {
            log::warn!(
                "{} export is not newest-first; opening balance {} is derived from file order",
                ledger_type,
                opening_balance
            );
        }

        let mut chronological = rows;
        chronological.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.file_index.cmp(&b.file_index))
        });

        let mut running = opening_balance.clone();
        let mut reconciled = Vec::with_capacity(chronological.len());
        for row in chronological {
            running = add_rounded(&running, &row.amount);
            let id = self.ids.next_id()?;
            let category = match row.category {
                Some(category) if !category.trim().is_empty() => category,
                _ => categorize(&row.description).to_string(),
            };
            reconciled.push(ReconciledRow {
                file_index: row.file_index,
                id,
                date: row.date,
                amount: row.amount,
                description: row.description,
                category,
                running_balance: running.clone(),
            });
        }

        log::debug!(
            "Reconciled {} rows for {}: opening {} closing {}",
            reconciled.len(),
            ledger_type,
            opening_balance,
            running
        );

        Ok(Reconciliation {
            ledger_type: ledger_type.to_string(),
            opening_balance,
            closing_balance: round_currency(current_balance),
            rows: reconciled,
        })
    }
}
