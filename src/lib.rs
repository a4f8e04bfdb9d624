//! Username Claimer - sequential short-username registration
//!
//! Loads account credentials, generates candidate usernames and walks every
//! candidate through the verify, order, discount, completion and confirmation
//! calls, recording each outcome in an append-only ledger.

pub mod accounts;
pub mod candidates;
pub mod config;
pub mod error;
pub mod http;
pub mod ledger;
pub mod logging;
pub mod runner;
pub mod types;
pub mod workflow;

// Re-export commonly used types
pub use config::{ClaimConfig, Endpoints, OrderTerms, Paths};
pub use error::{ClaimError, Result, StepFailure};
pub use types::{Account, ApiResponse, RunSummary};

// Re-export main functionality
pub use candidates::UsernameGenerator;
pub use http::ApiClient;
pub use ledger::{FileLedger, Ledger, MemoryLedger};
pub use runner::Runner;
pub use workflow::{Claimer, Registrar, Registration};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Initialize the library
pub fn init() -> Result<()> {
    // Load .env file if it exists
    dotenv::dotenv().ok();
    Ok(())
}
