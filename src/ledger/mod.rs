//! Result persistence
//!
//! The unavailable list doubles as a skip list across runs; the registered
//! ledger records every successful claim. Both are append-only.

mod file;
mod memory;

pub use file::FileLedger;
pub use memory::MemoryLedger;

use std::collections::HashSet;

use async_trait::async_trait;

use crate::error::Result;

/// Storage for per-username outcomes
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Usernames already known to be unusable
    async fn load_unavailable(&self) -> Result<HashSet<String>>;

    /// Append a username to the unavailable list
    async fn mark_unavailable(&self, username: &str) -> Result<()>;

    /// Append a successful registration
    async fn record_registered(&self, username: &str, identifier: &str) -> Result<()>;
}
