//! Typed persistence of monthly ledgers over a [`DocumentStore`]

use bigdecimal::BigDecimal;
use chrono::Months;
use std::collections::BTreeMap;

use crate::config::Settings;
use crate::traits::*;
use crate::types::*;

/// Reads and writes ledger documents and the category list
pub struct LedgerRepository<S: DocumentStore> {
    pub(crate) storage: S,
    settings: Settings,
}

impl<S: DocumentStore> LedgerRepository<S> {
    pub fn new(storage: S, settings: Settings) -> Self {
        Self { storage, settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Load one month, `None` if it was never written
    pub async fn load_month(
        &self,
        ledger_type: &str,
        month: &str,
    ) -> LedgerResult<Option<MonthlyLedger>> {
        let key = self.settings.ledger_key(ledger_type, month);
        match self.storage.get(&key).await {
            Ok(content) => Ok(Some(decode_ledger(&key, &content)?)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Closing balance of the nearest earlier month within the lookback window.
    ///
    /// Missing months are skipped; any other storage failure is returned.
    pub async fn find_previous_closing(
        &self,
        ledger_type: &str,
        month: &str,
    ) -> LedgerResult<Option<BigDecimal>> {
        let start = parse_month(month)
            .ok_or_else(|| LedgerError::Validation("Month must be YYYY-MM".to_string()))?;

        for offset in 1..=self.settings.lookback_months {
            let Some(previous) = start.checked_sub_months(Months::new(offset)) else {
                break;
            };
            let previous_month = month_key(previous);
            if let Some(ledger) = self.load_month(ledger_type, &previous_month).await? {
                log::debug!(
                    "Carrying {} closing balance {} forward from {} to {}",
                    ledger_type,
                    ledger.closing_balance,
                    previous_month,
                    month
                );
                return Ok(Some(ledger.closing_balance));
            }
        }
        Ok(None)
    }

    /// Replace the stored document for the ledger's (type, month)
    pub async fn save_month(&mut self, ledger: &MonthlyLedger) -> LedgerResult<()> {
        self.save_month_as(&ledger.ledger_type, ledger).await
    }

    /// Replace the document under `ledger_type`, keyed by the ledger's own month
    pub async fn save_month_as(
        &mut self,
        ledger_type: &str,
        ledger: &MonthlyLedger,
    ) -> LedgerResult<()> {
        let key = self.settings.ledger_key(ledger_type, &ledger.month);
        let content = serde_json::to_vec(ledger)?;
        self.storage.save(&key, &content).await?;
        log::info!(
            "Saved ledger {} ({} transactions)",
            key,
            ledger.transactions.len()
        );
        Ok(())
    }

    /// Ledger types that have at least one stored document directory
    pub async fn list_types(&self) -> LedgerResult<Vec<String>> {
        let entries = match self.storage.list(&self.settings.ledger_prefix).await {
            Ok(entries) => entries,
            Err(err) if err.is_not_found() => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        let mut types: Vec<String> = entries
            .into_iter()
            .filter(|entry| entry.is_dir)
            .map(|entry| entry.name.trim_end_matches('/').to_string())
            .filter(|name| !name.is_empty())
            .collect();
        types.sort();
        Ok(types)
    }

    /// Months stored for one ledger type, ascending
    pub async fn list_months(&self, ledger_type: &str) -> LedgerResult<Vec<String>> {
        let mut months: Vec<String> = self
            .list_documents(ledger_type)
            .await?
            .into_iter()
            .filter_map(|entry| entry.name.strip_suffix(".json").map(str::to_string))
            .collect();
        months.sort();
        Ok(months)
    }

    /// Every stored ledger, grouped by type
    pub async fn load_all(&self) -> LedgerResult<BTreeMap<String, Vec<MonthlyLedger>>> {
        let mut ledgers_by_type = BTreeMap::new();
        for ledger_type in self.list_types().await? {
            let mut ledgers = Vec::new();
            for entry in self.list_documents(&ledger_type).await? {
                let content = self.storage.get(&entry.path).await?;
                ledgers.push(decode_ledger(&entry.path, &content)?);
            }
            ledgers_by_type.insert(ledger_type, ledgers);
        }
        Ok(ledgers_by_type)
    }

    /// Saved category list, or the configured defaults
    pub async fn categories(&self) -> LedgerResult<Vec<String>> {
        match self.storage.get(&self.settings.categories_key).await {
            Ok(content) => Ok(serde_json::from_slice(&content)?),
            Err(err) if err.is_not_found() => Ok(self.settings.default_categories.clone()),
            Err(err) => Err(err),
        }
    }

    pub async fn save_categories(&mut self, categories: &[String]) -> LedgerResult<()> {
        let content = serde_json::to_vec(categories)?;
        self.storage
            .save(&self.settings.categories_key, &content)
            .await
    }

    async fn list_documents(&self, ledger_type: &str) -> LedgerResult<Vec<StoreEntry>> {
        let entries = match self.storage.list(&self.settings.ledger_dir(ledger_type)).await {
            Ok(entries) => entries,
            Err(err) if err.is_not_found() => return Ok(Vec::new()),
            Err(err) => return Err(err),
        };
        Ok(entries
            .into_iter()
            .filter(|entry| !entry.is_dir && entry.name.ends_with(".json"))
            .collect())
    }
}

fn decode_ledger(key: &str, content: &[u8]) -> LedgerResult<MonthlyLedger> {
    serde_json::from_slice(content)
        .map_err(|e| LedgerError::Serialization(format!("{}: {}", key, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::memory_storage::MemoryStorage;
    use std::str::FromStr;

    fn dec(s: &str) -> BigDecimal {
        BigDecimal::from_str(s).unwrap()
    }

    fn repository(storage: &MemoryStorage) -> LedgerRepository<MemoryStorage> {
        LedgerRepository::new(storage.clone(), Settings::default())
    }

    #[tokio::test]
    async fn test_save_and_load_month() {
        let storage = MemoryStorage::new();
        let mut repo = repository(&storage);
        let ledger = MonthlyLedger::empty("BANK", "2024-06", dec("12.50"));

        repo.save_month(&ledger).await.unwrap();

        assert_eq!(storage.keys(), vec!["ledger/BANK/2024-06.json"]);
        let loaded = repo.load_month("BANK", "2024-06").await.unwrap();
        assert_eq!(loaded, Some(ledger));
        assert_eq!(repo.load_month("BANK", "2024-07").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_previous_closing_within_window() {
        let storage = MemoryStorage::new();
        let mut repo = repository(&storage);
        let mut january = MonthlyLedger::empty("BANK", "2024-01", dec("0"));
        january.closing_balance = dec("99");
        repo.save_month(&january).await.unwrap();

        let found = repo.find_previous_closing("BANK", "2024-06").await.unwrap();
        assert_eq!(found, Some(dec("99")));

        // eight months back is outside the default window of six
        let found = repo.find_previous_closing("BANK", "2024-09").await.unwrap();
        assert_eq!(found, None);
    }

    #[tokio::test]
    async fn test_previous_closing_surfaces_storage_errors() {
        let storage = MemoryStorage::new();
        storage.fail_on("ledger/BANK/2024-05.json");
        let repo = repository(&storage);

        let result = repo.find_previous_closing("BANK", "2024-06").await;
        assert!(matches!(result, Err(LedgerError::Storage(_))));
    }

    #[tokio::test]
    async fn test_corrupt_document_is_reported() {
        let storage = MemoryStorage::new();
        storage.insert("ledger/BANK/2024-06.json", "not json");
        let repo = repository(&storage);

        let result = repo.load_month("BANK", "2024-06").await;
        assert!(matches!(result, Err(LedgerError::Serialization(_))));
    }

    #[tokio::test]
    async fn test_load_all_groups_by_type() {
        let storage = MemoryStorage::new();
        let mut repo = repository(&storage);
        for (ledger_type, month) in [("BANK", "2024-06"), ("BANK", "2024-05"), ("CASH", "2024-06")] {
            repo.save_month(&MonthlyLedger::empty(ledger_type, month, dec("1")))
                .await
                .unwrap();
        }
        storage.insert("ledger/BANK/readme.txt", "ignored");

        let all = repo.load_all().await.unwrap();
        assert_eq!(all.keys().collect::<Vec<_>>(), vec!["BANK", "CASH"]);
        assert_eq!(all["BANK"].len(), 2);
        assert_eq!(
            repo.list_months("BANK").await.unwrap(),
            vec!["2024-05", "2024-06"]
        );
    }

    #[tokio::test]
    async fn test_categories_default_and_saved() {
        let storage = MemoryStorage::new();
        let mut repo = repository(&storage);

        let defaults = repo.categories().await.unwrap();
        assert_eq!(defaults[0], "Membership");
        assert_eq!(defaults.len(), 6);

        let custom = vec!["Grants".to_string(), "Misc".to_string()];
        repo.save_categories(&custom).await.unwrap();
        assert_eq!(repo.categories().await.unwrap(), custom);
    }
}
