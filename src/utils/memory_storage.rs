//! In-memory storage implementation for testing

use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::sync::{Arc, RwLock};

use crate::traits::*;
use crate::types::*;

/// In-memory document store for testing and development
///
/// Clones share the same underlying documents. Keys can be marked as failing
/// to exercise error paths.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    documents: Arc<RwLock<BTreeMap<String, Vec<u8>>>>,
    failing: Arc<RwLock<HashSet<String>>>,
}

impl MemoryStorage {
    /// Create a new memory storage instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all data (useful for testing)
    pub fn clear(&self) {
        self.documents.write().unwrap().clear();
        self.failing.write().unwrap().clear();
    }

    /// Insert a raw document, bypassing the trait
    pub fn insert(&self, key: &str, content: impl Into<Vec<u8>>) {
        self.documents
            .write()
            .unwrap()
            .insert(key.to_string(), content.into());
    }

    /// Make every operation touching `key` (or listing it) fail with a storage error
    pub fn fail_on(&self, key: &str) {
        self.failing.write().unwrap().insert(key.to_string());
    }

    /// Keys currently stored, sorted
    pub fn keys(&self) -> Vec<String> {
        self.documents.read().unwrap().keys().cloned().collect()
    }

    fn check_failure(&self, key: &str) -> LedgerResult<()> {
        if self.failing.read().unwrap().contains(key) {
            return Err(LedgerError::Storage(format!("simulated failure for {}", key)));
        }
        Ok(())
    }
}

#[async_trait]
impl DocumentStore for MemoryStorage {
    async fn get(&self, key: &str) -> LedgerResult<Vec<u8>> {
        self.check_failure(key)?;
        self.documents
            .read()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| LedgerError::NotFound(key.to_string()))
    }

    async fn save(&mut self, key: &str, content: &[u8]) -> LedgerResult<()> {
        self.check_failure(key)?;
        self.documents
            .write()
            .unwrap()
            .insert(key.to_string(), content.to_vec());
        Ok(())
    }

    async fn list(&self, prefix: &str) -> LedgerResult<Vec<StoreEntry>> {
        let prefix = prefix.trim_end_matches('/');
        self.check_failure(prefix)?;

        let documents = self.documents.read().unwrap();
        let mut files = Vec::new();
        let mut dirs = BTreeSet::new();
        for key in documents.keys() {
            let Some(rest) = key
                .strip_prefix(prefix)
                .and_then(|rest| rest.strip_prefix('/'))
            else {
                continue;
            };
            match rest.split_once('/') {
                Some((dir, _)) => {
                    dirs.insert(dir.to_string());
                }
                None => files.push(StoreEntry {
                    name: rest.to_string(),
                    path: key.clone(),
                    is_dir: false,
                }),
            }
        }

        let mut entries: Vec<StoreEntry> = dirs
            .into_iter()
            .map(|dir| StoreEntry {
                path: format!("{}/{}", prefix, dir),
                name: dir,
                is_dir: true,
            })
            .collect();
        entries.extend(files);
        Ok(entries)
    }
}
