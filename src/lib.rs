//! # Club Ledger
//!
//! Reconciliation and reporting engine for a small club's books.
//!
//! ## Features
//!
//! - **Bank import**: tab or comma separated statement exports, with rows that
//!   can't be read skipped rather than failing the import
//! - **Categorization**: keyword-based category assignment
//! - **Reconciliation**: opening and running balances derived from the current
//!   account balance
//! - **Monthly ledgers**: one replace-in-full document per ledger type and month
//! - **Financial reporting**: income and expenditure statement, as-at balance
//!   sheet and notes for the current or previous financial years
//! - **Storage abstraction**: key-addressed document storage behind a trait
//!
//! ## Quick Start
//!
//! ```rust
//! use club_ledger::{BankImportRequest, Ledger};
//! use club_ledger::utils::MemoryStorage;
//! use bigdecimal::BigDecimal;
//!
//! # async fn run() -> club_ledger::LedgerResult<()> {
//! let mut ledger = Ledger::new(MemoryStorage::new());
//! let summary = ledger
//!     .import_bank_csv(BankImportRequest {
//!         csv: "02/06/2024,100.00,Sponsorship ABC\n01/06/2024,-40.00,Trophy shop".to_string(),
//!         current_balance: Some(BigDecimal::from(160)),
//!         ledger_type: Some("BANK".to_string()),
//!     })
//!     .await?;
//! assert_eq!(summary.months, vec!["2024-06"]);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod ingest;
pub mod ledger;
pub mod reconciliation;
pub mod reports;
pub mod traits;
pub mod types;
pub mod utils;

// Re-export commonly used types
pub use config::Settings;
pub use ingest::{categorize, parse_rows, RawRow};
pub use ledger::{partition_by_month, BankImportRequest, Ledger, LedgerRegister, LedgerRepository};
pub use reconciliation::*;
pub use reports::{build_report, resolve_period, FinancialReport, ReportPeriod};
pub use traits::*;
pub use types::*;
