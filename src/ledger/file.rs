//! Flat-file ledger

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;

use super::Ledger;
use crate::error::{ClaimError, Result};

/// Ledger backed by two line-oriented text files
#[derive(Debug, Clone)]
pub struct FileLedger {
    unavailable_path: PathBuf,
    registered_path: PathBuf,
}

impl FileLedger {
    pub fn new(unavailable_path: impl Into<PathBuf>, registered_path: impl Into<PathBuf>) -> Self {
        Self {
            unavailable_path: unavailable_path.into(),
            registered_path: registered_path.into(),
        }
    }

    pub fn unavailable_path(&self) -> &Path {
        &self.unavailable_path
    }

    pub fn registered_path(&self) -> &Path {
        &self.registered_path
    }

    async fn append_line(path: &Path, line: &str) -> Result<()> {
        let io_err = |e: std::io::Error| ClaimError::io(e.to_string(), Some(path.to_string_lossy().to_string()));

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .await
            .map_err(io_err)?;
        file.write_all(format!("{}\n", line).as_bytes())
            .await
            .map_err(io_err)?;
        file.flush().await.map_err(io_err)
    }
}

#[async_trait]
impl Ledger for FileLedger {
    async fn load_unavailable(&self) -> Result<HashSet<String>> {
        match tokio::fs::read_to_string(&self.unavailable_path).await {
            Ok(content) => Ok(content
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(HashSet::new()),
            Err(e) => {
                tracing::error!(
                    path = %self.unavailable_path.display(),
                    error = %e,
                    "Error loading unavailable usernames"
                );
                Ok(HashSet::new())
            }
        }
    }

    async fn mark_unavailable(&self, username: &str) -> Result<()> {
        Self::append_line(&self.unavailable_path, username).await
    }

    async fn record_registered(&self, username: &str, identifier: &str) -> Result<()> {
        Self::append_line(&self.registered_path, &format!("{},{}", username, identifier)).await
    }
}
