//! Main ledger orchestrator that coordinates import, storage and reporting

use async_trait::async_trait;
use bigdecimal::BigDecimal;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::config::Settings;
use crate::ingest::parse_rows;
use crate::ledger::{partition_by_month, LedgerRepository};
use crate::reconciliation::ReconciliationEngine;
use crate::reports::{build_report, FinancialReport, DEFAULT_PERIOD};
use crate::traits::*;
use crate::types::*;
use crate::utils::money::{self, add_rounded, round_currency};
use crate::utils::validation::*;

/// A bank statement import
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BankImportRequest {
    /// Raw export, tab or comma separated
    #[serde(default)]
    pub csv: String,
    /// Account balance after the last row of the export
    #[serde(default, with = "money::as_optional_number")]
    pub current_balance: Option<BigDecimal>,
    /// Ledger type; blank means the configured default
    #[serde(default, rename = "type")]
    pub ledger_type: Option<String>,
}

/// One month laid out for printing: opening carried from the previous month,
/// transactions in date order and running balances recomputed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerRegister {
    #[serde(rename = "type")]
    pub ledger_type: String,
    pub month: String,
    #[serde(with = "money::as_number")]
    pub opening_balance: BigDecimal,
    #[serde(with = "money::as_number")]
    pub closing_balance: BigDecimal,
    pub transactions: Vec<Transaction>,
}

/// Main ledger system over an injected document store
pub struct Ledger<S: DocumentStore> {
    repository: LedgerRepository<S>,
    ids: Box<dyn IdGenerator>,
}

impl<S: DocumentStore> Ledger<S> {
    /// Create a ledger with default settings and random identifiers
    pub fn new(storage: S) -> Self {
        Self::with_settings(storage, Settings::default())
    }

    pub fn with_settings(storage: S, settings: Settings) -> Self {
        Self {
            repository: LedgerRepository::new(storage, settings),
            ids: Box::new(UuidGenerator),
        }
    }

    /// Replace the identifier source (deterministic ids in tests)
    pub fn with_id_generator(mut self, ids: Box<dyn IdGenerator>) -> Self {
        self.ids = ids;
        self
    }

    pub fn settings(&self) -> &Settings {
        self.repository.settings()
    }

    pub fn repository(&self) -> &LedgerRepository<S> {
        &self.repository
    }

    /// Import a bank export and replace every month it touches.
    ///
    /// All validation, parsing and reconciliation happens before the first
    /// write. Months are then saved in ascending order; a failed save stops
    /// the import with earlier months already written.
    pub async fn import_bank_csv(
        &mut self,
        request: BankImportRequest,
    ) -> LedgerResult<ImportSummary> {
        let ledger_type = normalize_ledger_type(
            request.ledger_type.as_deref(),
            &self.settings().default_ledger_type,
        );
        validate_ledger_type(&ledger_type)?;
        let current_balance = require_current_balance(request.current_balance.as_ref())?;
        validate_csv_content(&request.csv)?;

        let rows = parse_rows(&request.csv)?;
        let engine = ReconciliationEngine::new(self.ids.as_ref());
        let reconciliation = engine.reconcile(rows, current_balance, &ledger_type)?;
        let ledgers = partition_by_month(&ledger_type, &reconciliation.rows);

        for ledger in &ledgers {
            self.repository.save_month(ledger).await?;
        }

        let months: Vec<String> = ledgers.iter().map(|l| l.month.clone()).collect();
        log::info!(
            "Imported {} transactions into {} across {} months",
            reconciliation.rows.len(),
            ledger_type,
            months.len()
        );

        Ok(ImportSummary {
            status: "ok".to_string(),
            ledger_type,
            count: months.len(),
            months,
            transactions: reconciliation.rows.len(),
            opening_balance: reconciliation.opening_balance,
            closing_balance: reconciliation.closing_balance,
        })
    }

    /// Read one month.
    ///
    /// A month that was never written comes back empty, with its opening and
    /// closing balance carried from the nearest earlier month (or zero).
    pub async fn get_month(&self, ledger_type: &str, month: &str) -> LedgerResult<MonthlyLedger> {
        validate_ledger_type(ledger_type)?;
        validate_month(month)?;

        if let Some(ledger) = self.repository.load_month(ledger_type, month).await? {
            return Ok(ledger);
        }

        log::debug!("Ledger {} {} not found, looking back", ledger_type, month);
        let carried = self
            .repository
            .find_previous_closing(ledger_type, month)
            .await?
            .unwrap_or_else(money::zero);
        Ok(MonthlyLedger::empty(ledger_type, month, carried))
    }

    /// Build the printable register for a stored month
    pub async fn month_register(
        &self,
        ledger_type: &str,
        month: &str,
    ) -> LedgerResult<LedgerRegister> {
        validate_ledger_type(ledger_type)?;
        validate_month(month)?;

        let ledger = self
            .repository
            .load_month(ledger_type, month)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("ledger {} {}", ledger_type, month)))?;

        let opening_balance = match self
            .repository
            .find_previous_closing(ledger_type, month)
            .await?
        {
            Some(previous) => previous,
            None => round_currency(&ledger.opening_balance),
        };

        let mut transactions = ledger.transactions;
        transactions.sort_by(|a, b| a.date.cmp(&b.date));
        let mut balance = opening_balance.clone();
        for txn in &mut transactions {
            balance = add_rounded(&balance, &txn.amount);
            txn.running_balance = balance.clone();
        }

        Ok(LedgerRegister {
            ledger_type: ledger_type.to_string(),
            month: month.to_string(),
            opening_balance,
            closing_balance: balance,
            transactions,
        })
    }

    /// Write complete monthly ledgers, each under its own month.
    ///
    /// Every document is validated before anything is written.
    pub async fn save_ledgers(
        &mut self,
        ledger_type: &str,
        ledgers: &[MonthlyLedger],
    ) -> LedgerResult<()> {
        validate_ledger_type(ledger_type)?;
        for ledger in ledgers {
            validate_month(&ledger.month)?;
        }

        for ledger in ledgers {
            self.repository.save_month_as(ledger_type, ledger).await?;
        }
        Ok(())
    }

    pub async fn categories(&self) -> LedgerResult<Vec<String>> {
        self.repository.categories().await
    }

    pub async fn save_categories(&mut self, categories: &[String]) -> LedgerResult<()> {
        self.repository.save_categories(categories).await
    }

    /// Financial report for a period key; a blank key means year to date
    pub async fn financial_report(
        &self,
        period: &str,
        now: NaiveDateTime,
    ) -> LedgerResult<FinancialReport> {
        let period = match period.trim() {
            "" => DEFAULT_PERIOD,
            key => key,
        };
        // reject unknown keys before touching storage
        crate::reports::resolve_period(period, now)?;

        let ledgers_by_type = self.repository.load_all().await?;
        build_report(period, now, &ledgers_by_type)
    }

    /// Financial report as of the current UTC time
    pub async fn current_report(&self, period: &str) -> LedgerResult<FinancialReport> {
        self.financial_report(period, chrono::Utc::now().naive_utc())
            .await
    }
}

#[async_trait]
impl<S: DocumentStore> ReportGenerator for Ledger<S> {
    async fn generate_report(
        &self,
        period: &str,
        now: NaiveDateTime,
    ) -> LedgerResult<FinancialReport> {
        self.financial_report(period, now).await
    }
}
