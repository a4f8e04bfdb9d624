//! Per-username registration workflow
//!
//! Five dependent calls: availability check, order, discount, zero-amount
//! completion and confirmation page. The first failing step ends the
//! attempt with a [`StepFailure`].

use std::sync::OnceLock;

use async_trait::async_trait;
use regex::Regex;
use serde_json::{json, Value};

use crate::config::ClaimConfig;
use crate::error::StepFailure;
use crate::http::ApiClient;
use crate::types::{Account, ApiResponse};

/// Markup wrapping the claimed username on the confirmation page
const DISPLAYED_USERNAME_PATTERN: &str =
    r#"<p class="text-3xl font-instrumentSerif italic text-primary py-5">([a-zA-Z]+)<span"#;

type StepResult<T> = std::result::Result<T, StepFailure>;

/// Confirmation of a completed claim
#[derive(Debug, Clone, PartialEq)]
pub struct Registration {
    pub username: String,
    pub identifier: String,
    pub session_id: String,
}

/// Something that can attempt to claim one username for one account
#[async_trait]
pub trait Claimer: Send + Sync {
    async fn claim(&self, account: &Account, username: &str) -> StepResult<Registration>;
}

/// Drives the registration call chain for one account and username at a time
#[derive(Debug, Clone)]
pub struct Registrar {
    client: ApiClient,
    config: ClaimConfig,
}

impl Registrar {
    pub fn new(client: ApiClient, config: ClaimConfig) -> Self {
        Self { client, config }
    }

    /// Run every step for `username` under `account`
    pub async fn claim(&self, account: &Account, username: &str) -> StepResult<Registration> {
        let bearer = account.bearer();

        self.check_availability(&bearer, username).await?;
        let checkout_url = self.place_order(account, &bearer, username).await?;
        let session_id = session_id_from(&checkout_url)
            .ok_or_else(|| StepFailure::MissingSessionId {
                username: username.to_string(),
            })?
            .to_string();
        self.apply_discount(&bearer, username, &session_id).await?;
        let success_url = self.complete_payment(&bearer, username, &session_id).await?;
        self.confirm(&bearer, username, &success_url).await?;

        Ok(Registration {
            username: username.to_string(),
            identifier: account.identifier.clone(),
            session_id,
        })
    }

    async fn check_availability(&self, bearer: &str, username: &str) -> StepResult<()> {
        let response = self
            .client
            .post(&self.config.endpoints.verify_url, &json!({ "username": username }), bearer)
            .await;

        if is_unavailable(&response) {
            return Err(StepFailure::Unavailable {
                username: username.to_string(),
                detail: response.raw_body,
            });
        }
        Ok(())
    }

    /// Returns the checkout URL
    async fn place_order(&self, account: &Account, bearer: &str, username: &str) -> StepResult<String> {
        let terms = &self.config.terms;
        let payload = json!({
            "email": account.identifier,
            "username": username,
            "years": terms.years,
            "currency": terms.currency,
            "islite": terms.lite,
        });
        let response = self
            .client
            .post(&self.config.endpoints.order_url, &payload, bearer)
            .await;

        if !response.is_ok() || !response.has_status(1.0) {
            return Err(StepFailure::RegistrationRejected {
                username: username.to_string(),
                detail: response.raw_body,
            });
        }

        response
            .str_at("/data/url")
            .map(str::to_string)
            .ok_or_else(|| StepFailure::MissingCheckoutUrl {
                username: username.to_string(),
            })
    }

    async fn apply_discount(&self, bearer: &str, username: &str, session_id: &str) -> StepResult<()> {
        let response = self
            .client
            .post(
                &self.config.endpoints.discount_url(session_id),
                &json!({ "code": self.config.terms.discount_code }),
                bearer,
            )
            .await;

        if !response.is_ok() {
            return Err(StepFailure::DiscountRejected {
                username: username.to_string(),
                detail: response.raw_body,
            });
        }

        let amount = response.body.get("amountTotal");
        if !amount.is_some_and(is_zero_amount) {
            return Err(StepFailure::AmountDue {
                username: username.to_string(),
                amount: amount.map_or_else(|| "undefined".to_string(), display_amount),
            });
        }
        Ok(())
    }

    /// Returns the confirmation page URL
    async fn complete_payment(&self, bearer: &str, username: &str, session_id: &str) -> StepResult<String> {
        let response = self
            .client
            .post(&self.config.endpoints.completion_url(session_id), &json!({}), bearer)
            .await;

        if !response.is_ok() {
            return Err(StepFailure::CompletionRejected {
                username: username.to_string(),
                detail: response.raw_body,
            });
        }

        match response.str_at("/successUrl") {
            Some(url) => Ok(url.to_string()),
            None => {
                tracing::info!(username, "Success URL not found for {}, constructing manually...", username);
                Ok(self.config.endpoints.fallback_success_url(username, session_id))
            }
        }
    }

    async fn confirm(&self, bearer: &str, username: &str, success_url: &str) -> StepResult<()> {
        let response = self.client.get(success_url, bearer).await;

        if !response.is_ok() {
            return Err(StepFailure::ConfirmationUnreachable {
                username: username.to_string(),
                detail: response.raw_body,
            });
        }

        if !response.raw_body.contains(&self.config.success_phrase) {
            return Err(StepFailure::SuccessPhraseMissing {
                username: username.to_string(),
            });
        }

        if let Some(displayed) = displayed_username(&response.raw_body) {
            if displayed != username {
                return Err(StepFailure::UsernameMismatch {
                    expected: username.to_string(),
                    displayed: displayed.to_string(),
                });
            }
        }
        Ok(())
    }
}

#[async_trait]
impl Claimer for Registrar {
    async fn claim(&self, account: &Account, username: &str) -> StepResult<Registration> {
        Registrar::claim(self, account, username).await
    }
}

/// Availability verdict for the verify endpoint.
///
/// The backend sometimes answers a taken name with HTTP 500 and
/// `"status": 0`; that case is listed explicitly alongside plain failures.
pub fn is_unavailable(response: &ApiResponse) -> bool {
    !response.succeeded || (response.http_status == 500 && response.has_status(0.0))
}

/// Last path segment of the checkout URL, if non-empty
pub fn session_id_from(checkout_url: &str) -> Option<&str> {
    checkout_url.rsplit('/').next().filter(|s| !s.is_empty())
}

/// `amountTotal` is either the string "0" or a numeric zero
pub fn is_zero_amount(amount: &Value) -> bool {
    match amount {
        Value::String(s) => s == "0",
        Value::Number(n) => n.as_f64() == Some(0.0),
        _ => false,
    }
}

fn display_amount(amount: &Value) -> String {
    match amount {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Username shown on the confirmation page, if the page has the usual markup
pub fn displayed_username(body: &str) -> Option<&str> {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(DISPLAYED_USERNAME_PATTERN).expect("displayed username pattern is valid")
    });
    pattern
        .captures(body)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn response(succeeded: bool, http_status: u16, body: Value) -> ApiResponse {
        ApiResponse {
            succeeded,
            http_status,
            raw_body: body.to_string(),
            body,
        }
    }

    #[test]
    fn test_unavailable_on_failure() {
        assert!(is_unavailable(&response(false, 400, json!({ "status": 0 }))));
        assert!(is_unavailable(&response(false, 500, json!({ "status": 0 }))));
        assert!(!is_unavailable(&response(true, 200, json!({ "status": 1 }))));
    }

    #[test]
    fn test_session_id_from_checkout_url() {
        assert_eq!(
            session_id_from("https://pay.copperx.io/checkout/cs_abc123"),
            Some("cs_abc123")
        );
        assert_eq!(session_id_from("cs_only"), Some("cs_only"));
        assert_eq!(session_id_from("https://pay.copperx.io/checkout/"), None);
    }

    #[test]
    fn test_zero_amount_accepts_string_and_number() {
        assert!(is_zero_amount(&json!("0")));
        assert!(is_zero_amount(&json!(0)));
        assert!(is_zero_amount(&json!(0.0)));
        assert!(!is_zero_amount(&json!(5)));
        assert!(!is_zero_amount(&json!("5")));
        assert!(!is_zero_amount(&json!("0.00")));
        assert!(!is_zero_amount(&Value::Null));
    }

    #[test]
    fn test_displayed_username() {
        let page = r#"<div><p class="text-3xl font-instrumentSerif italic text-primary py-5">abcde<span>.offline</span></p></div>"#;
        assert_eq!(displayed_username(page), Some("abcde"));
        assert_eq!(displayed_username("<p>abcde</p>"), None);
    }

    #[test]
    fn test_amount_display() {
        assert_eq!(display_amount(&json!("12")), "12");
        assert_eq!(display_amount(&json!(5)), "5");
    }
}
