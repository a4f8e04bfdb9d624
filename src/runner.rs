//! Batch driver: every account against every candidate, one at a time

use std::sync::Arc;
use std::time::Duration;

use crate::error::Result;
use crate::ledger::Ledger;
use crate::types::{Account, RunSummary};
use crate::workflow::Claimer;

/// Sequential claim runner
pub struct Runner {
    claimer: Box<dyn Claimer>,
    ledger: Arc<dyn Ledger>,
    delay: Duration,
}

impl Runner {
    pub fn new(claimer: impl Claimer + 'static, ledger: Arc<dyn Ledger>, delay: Duration) -> Self {
        Self {
            claimer: Box::new(claimer),
            ledger,
            delay,
        }
    }

    /// Process every candidate for every account.
    ///
    /// The unavailable list is read once up front; names marked during the
    /// run are only appended to the ledger, so later accounts still try them.
    /// Only ledger I/O errors end the run early.
    pub async fn run(&self, accounts: &[Account], candidates: &[String]) -> Result<RunSummary> {
        let unavailable = self.ledger.load_unavailable().await?;
        let mut summary = RunSummary::new();

        tracing::info!(
            accounts = accounts.len(),
            candidates = candidates.len(),
            known_unavailable = unavailable.len(),
            "Starting claim run"
        );

        for account in accounts {
            tracing::info!(account = %account.identifier, "Starting registration process with {}", account.identifier);

            for username in candidates {
                if unavailable.contains(username) {
                    tracing::info!(username = %username, "{} was previously unavailable, skipping...", username);
                    summary.skipped += 1;
                    continue;
                }

                tracing::info!(
                    username = %username,
                    account = %account.identifier,
                    "Processing {} with {}...",
                    username,
                    account.identifier
                );
                summary.attempted += 1;

                match self.claimer.claim(account, username).await {
                    Ok(registration) => {
                        tracing::info!(
                            username = %registration.username,
                            account = %registration.identifier,
                            session = %registration.session_id,
                            "{} successfully registered with {} and returned to Home.",
                            registration.username,
                            registration.identifier
                        );
                        self.ledger
                            .record_registered(&registration.username, &registration.identifier)
                            .await?;
                        summary.registered += 1;
                        self.pause().await;
                        tracing::info!("Moving to next username...");
                    }
                    Err(failure) => {
                        tracing::warn!(username = %username, "{}", failure);
                        if failure.marks_unavailable() {
                            self.ledger.mark_unavailable(username).await?;
                            summary.unavailable += 1;
                        } else {
                            summary.failed += 1;
                        }
                        self.pause().await;
                    }
                }
            }

            tracing::info!(
                account = %account.identifier,
                "Finished processing all usernames for {}. Moving to next account...",
                account.identifier
            );
        }

        tracing::info!(%summary, "All accounts processed successfully!");
        Ok(summary)
    }

    async fn pause(&self) {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::StepFailure;
    use crate::ledger::MemoryLedger;
    use crate::workflow::Registration;
    use async_trait::async_trait;

    /// Registers "abcde" and soft-fails everything else, without any I/O
    struct ScriptedClaimer;

    #[async_trait]
    impl Claimer for ScriptedClaimer {
        async fn claim(&self, account: &Account, username: &str) -> std::result::Result<Registration, StepFailure> {
            if username == "abcde" {
                Ok(Registration {
                    username: username.to_string(),
                    identifier: account.identifier.clone(),
                    session_id: "cs_1".to_string(),
                })
            } else {
                Err(StepFailure::SuccessPhraseMissing {
                    username: username.to_string(),
                })
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_delay_follows_processed_names_only() {
        let ledger = Arc::new(MemoryLedger::with_unavailable(["zzzzz"]));
        let runner = Runner::new(ScriptedClaimer, ledger.clone(), Duration::from_secs(1));
        let candidates = ["abcde", "zzzzz", "fghij"].map(String::from);

        let start = tokio::time::Instant::now();
        let summary = runner
            .run(&[Account::new("a@example.com", "tok")], &candidates)
            .await
            .unwrap();

        // One pause after the success, one after the soft failure, none for the skip
        assert_eq!(start.elapsed(), Duration::from_secs(2));
        assert_eq!(summary.registered, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert_eq!(
            ledger.registered(),
            vec![("abcde".to_string(), "a@example.com".to_string())]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_delay_never_sleeps() {
        let runner = Runner::new(ScriptedClaimer, Arc::new(MemoryLedger::new()), Duration::ZERO);
        let candidates = ["abcde", "fghij"].map(String::from);

        let start = tokio::time::Instant::now();
        runner
            .run(&[Account::new("a@example.com", "tok")], &candidates)
            .await
            .unwrap();

        assert_eq!(start.elapsed(), Duration::ZERO);
    }
}
