//! Run configuration
//!
//! Defaults reproduce the fixed production behaviour. Every value can be
//! overridden through a `CLAIM_*` environment variable (or a `.env` file
//! loaded by [`crate::init`]).

use std::env;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::{ClaimError, Result};

/// Phrase the confirmation page shows after a successful claim
pub const SUCCESS_PHRASE: &str = "Congratulations, you’ve gone offline!!!";

/// Remote endpoints used by the registration workflow
#[derive(Debug, Clone)]
pub struct Endpoints {
    /// Username availability check
    pub verify_url: String,
    /// Order creation, returns the checkout URL
    pub order_url: String,
    /// Base for the discount and zero-amount completion calls, ends with `/`
    pub checkout_base_url: String,
    /// Base for the synthesized confirmation page URL, ends with `/`
    pub home_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            verify_url: "https://protocolbackend-production.up.railway.app/api/v1/id/verify".to_string(),
            order_url: "https://protocolbackend-production.up.railway.app/api/v1/id/order".to_string(),
            checkout_base_url: "https://api.copperx.io/api/v1/payment-pages/for-checkout-session/".to_string(),
            home_base_url: "https://id.offlineprotocol.com/".to_string(),
        }
    }
}

impl Endpoints {
    /// Endpoints with every URL rooted at `base` (used against mock servers)
    pub fn rooted_at(base: &str) -> Self {
        let base = base.trim_end_matches('/');
        Self {
            verify_url: format!("{}/api/v1/id/verify", base),
            order_url: format!("{}/api/v1/id/order", base),
            checkout_base_url: format!("{}/api/v1/payment-pages/for-checkout-session/", base),
            home_base_url: format!("{}/", base),
        }
    }

    pub fn discount_url(&self, session_id: &str) -> String {
        format!("{}{}/discount", self.checkout_base_url, session_id)
    }

    pub fn completion_url(&self, session_id: &str) -> String {
        format!(
            "{}{}/mark-session-complete-for-zero-amount",
            self.checkout_base_url, session_id
        )
    }

    /// Confirmation page URL used when the completion call returns none
    pub fn fallback_success_url(&self, username: &str, session_id: &str) -> String {
        format!(
            "{}{}/claimed?cx_session_id={}",
            self.home_base_url, username, session_id
        )
    }
}

/// Fixed terms of every order
#[derive(Debug, Clone)]
pub struct OrderTerms {
    /// Registration period in years
    pub years: u32,
    pub currency: String,
    pub lite: bool,
    pub discount_code: String,
}

impl Default for OrderTerms {
    fn default() -> Self {
        Self {
            years: 3,
            currency: "usdc".to_string(),
            lite: false,
            discount_code: "PRESEED".to_string(),
        }
    }
}

/// Input and output files
#[derive(Debug, Clone)]
pub struct Paths {
    pub accounts: PathBuf,
    pub unavailable: PathBuf,
    pub registered: PathBuf,
    pub log: PathBuf,
}

impl Default for Paths {
    fn default() -> Self {
        Self {
            accounts: PathBuf::from("accounts.txt"),
            unavailable: PathBuf::from("unavailable_usernames.txt"),
            registered: PathBuf::from("registered_usernames.txt"),
            log: PathBuf::from("log.txt"),
        }
    }
}

/// Complete configuration for one run
#[derive(Debug, Clone)]
pub struct ClaimConfig {
    pub endpoints: Endpoints,
    pub terms: OrderTerms,
    pub paths: Paths,
    /// Literal the confirmation page must contain
    pub success_phrase: String,
    /// Pause after every processed username
    pub delay: Duration,
    /// Length of generated usernames
    pub username_length: usize,
    /// Number of random draws before deduplication
    pub candidate_attempts: usize,
}

impl Default for ClaimConfig {
    fn default() -> Self {
        Self {
            endpoints: Endpoints::default(),
            terms: OrderTerms::default(),
            paths: Paths::default(),
            success_phrase: SUCCESS_PHRASE.to_string(),
            delay: Duration::from_millis(1000),
            username_length: 5,
            candidate_attempts: 1000,
        }
    }
}

impl ClaimConfig {
    /// Build configuration from defaults plus `CLAIM_*` environment overrides
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        override_string("CLAIM_VERIFY_URL", &mut config.endpoints.verify_url);
        override_string("CLAIM_ORDER_URL", &mut config.endpoints.order_url);
        override_string("CLAIM_CHECKOUT_BASE_URL", &mut config.endpoints.checkout_base_url);
        override_string("CLAIM_HOME_BASE_URL", &mut config.endpoints.home_base_url);

        override_string("CLAIM_DISCOUNT_CODE", &mut config.terms.discount_code);
        override_string("CLAIM_CURRENCY", &mut config.terms.currency);
        override_parsed("CLAIM_YEARS", &mut config.terms.years)?;
        override_parsed("CLAIM_LITE", &mut config.terms.lite)?;

        override_path("CLAIM_ACCOUNTS_FILE", &mut config.paths.accounts);
        override_path("CLAIM_UNAVAILABLE_FILE", &mut config.paths.unavailable);
        override_path("CLAIM_REGISTERED_FILE", &mut config.paths.registered);
        override_path("CLAIM_LOG_FILE", &mut config.paths.log);

        override_string("CLAIM_SUCCESS_PHRASE", &mut config.success_phrase);

        let mut delay_ms = config.delay.as_millis() as u64;
        override_parsed("CLAIM_DELAY_MS", &mut delay_ms)?;
        config.delay = Duration::from_millis(delay_ms);

        override_parsed("CLAIM_USERNAME_LENGTH", &mut config.username_length)?;
        override_parsed("CLAIM_CANDIDATE_ATTEMPTS", &mut config.candidate_attempts)?;

        config.validate()?;
        Ok(config)
    }

    /// Reject values the workflow cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.username_length == 0 {
            return Err(ClaimError::config("username length must be at least 1"));
        }
        for (name, base) in [
            ("CLAIM_CHECKOUT_BASE_URL", &self.endpoints.checkout_base_url),
            ("CLAIM_HOME_BASE_URL", &self.endpoints.home_base_url),
        ] {
            if !base.ends_with('/') {
                return Err(ClaimError::config(format!("{} must end with '/': {}", name, base)));
            }
        }
        if self.success_phrase.is_empty() {
            return Err(ClaimError::config("success phrase must not be empty"));
        }
        Ok(())
    }
}

fn override_string(key: &str, target: &mut String) {
    if let Ok(value) = env::var(key) {
        if !value.trim().is_empty() {
            *target = value.trim().to_string();
        }
    }
}

fn override_path(key: &str, target: &mut PathBuf) {
    if let Ok(value) = env::var(key) {
        if !value.trim().is_empty() {
            *target = PathBuf::from(value.trim());
        }
    }
}

fn override_parsed<T>(key: &str, target: &mut T) -> Result<()>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    if let Ok(value) = env::var(key) {
        *target = value
            .trim()
            .parse()
            .map_err(|e| ClaimError::config(format!("{}={:?}: {}", key, value, e)))?;
    }
    Ok(())
}
