//! Traits for storage abstraction and injectable capabilities

use async_trait::async_trait;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::reports::FinancialReport;
use crate::types::*;

/// An entry returned when listing a storage prefix
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoreEntry {
    /// Last path segment (`2024-06.json`, `BANK`)
    pub name: String,
    /// Full key (`ledger/BANK/2024-06.json`)
    pub path: String,
    pub is_dir: bool,
}

/// Key-addressed byte storage for ledger documents
///
/// The ledger core works against any backend (local disk, object store,
/// in-memory) through these three operations. Implementations must report a
/// missing key as [`LedgerError::NotFound`]; every other failure is
/// [`LedgerError::Storage`] and aborts the calling request.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the document stored under `key`
    async fn get(&self, key: &str) -> LedgerResult<Vec<u8>>;

    /// Replace the document stored under `key`
    async fn save(&mut self, key: &str, content: &[u8]) -> LedgerResult<()>;

    /// List the direct children of `prefix`
    async fn list(&self, prefix: &str) -> LedgerResult<Vec<StoreEntry>>;
}

/// Source of transaction identifiers
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> LedgerResult<String>;
}

/// Random UUID v4 identifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidGenerator;

impl IdGenerator for UuidGenerator {
    fn next_id(&self) -> LedgerResult<String> {
        Ok(uuid::Uuid::new_v4().to_string())
    }
}

/// Trait for report generation
#[async_trait]
pub trait ReportGenerator: Send + Sync {
    /// Generate the financial report for a period key (`ytd`, `fy-1`, `fy-2`)
    async fn generate_report(
        &self,
        period: &str,
        now: NaiveDateTime,
    ) -> LedgerResult<FinancialReport>;
}
