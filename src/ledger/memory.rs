//! In-memory ledger

use std::collections::HashSet;

use async_trait::async_trait;
use parking_lot::Mutex;

use super::Ledger;
use crate::error::Result;

/// Ledger that keeps everything in memory; handy for tests and dry runs
#[derive(Debug, Default)]
pub struct MemoryLedger {
    unavailable: Mutex<Vec<String>>,
    registered: Mutex<Vec<(String, String)>>,
}

impl MemoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with a pre-populated unavailable list
    pub fn with_unavailable<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            unavailable: Mutex::new(names.into_iter().map(Into::into).collect()),
            registered: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of the unavailable list, in append order
    pub fn unavailable(&self) -> Vec<String> {
        self.unavailable.lock().clone()
    }

    /// Snapshot of `(username, identifier)` registrations, in append order
    pub fn registered(&self) -> Vec<(String, String)> {
        self.registered.lock().clone()
    }
}

#[async_trait]
impl Ledger for MemoryLedger {
    async fn load_unavailable(&self) -> Result<HashSet<String>> {
        Ok(self.unavailable.lock().iter().cloned().collect())
    }

    async fn mark_unavailable(&self, username: &str) -> Result<()> {
        self.unavailable.lock().push(username.to_string());
        Ok(())
    }

    async fn record_registered(&self, username: &str, identifier: &str) -> Result<()> {
        self.registered
            .lock()
            .push((username.to_string(), identifier.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_ledger_records() {
        let ledger = MemoryLedger::with_unavailable(["aaaaa"]);
        tokio_test::block_on(async {
            ledger.mark_unavailable("bbbbb").await.unwrap();
            ledger.record_registered("ccccc", "a@example.com").await.unwrap();

            let loaded = ledger.load_unavailable().await.unwrap();
            assert!(loaded.contains("aaaaa"));
            assert!(loaded.contains("bbbbb"));
        });

        assert_eq!(ledger.unavailable(), vec!["aaaaa", "bbbbb"]);
        assert_eq!(
            ledger.registered(),
            vec![("ccccc".to_string(), "a@example.com".to_string())]
        );
    }
}
