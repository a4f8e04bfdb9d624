//! Core types shared by the loader, workflow and runner

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Account credentials loaded from the accounts file
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier (the e-mail sent with each order)
    pub identifier: String,
    /// Raw API token, without the `Bearer ` prefix
    pub token: String,
}

impl Account {
    pub fn new(identifier: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            token: token.into(),
        }
    }

    /// Authorization header value for this account
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

impl std::fmt::Debug for Account {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Account")
            .field("identifier", &self.identifier)
            .field("token", &"<redacted>")
            .finish()
    }
}

/// Normalized result of every HTTP call
#[derive(Debug, Clone, PartialEq)]
pub struct ApiResponse {
    /// 2xx response received
    pub succeeded: bool,
    /// HTTP status; 500 when the transport itself failed
    pub http_status: u16,
    /// Parsed JSON body, or the body text as a JSON string when it is not JSON
    pub body: Value,
    /// Response text on success, diagnostic message on failure
    pub raw_body: String,
}

impl ApiResponse {
    /// Exactly HTTP 200
    pub fn is_ok(&self) -> bool {
        self.http_status == 200
    }

    /// Whether the numeric `status` flag in the JSON envelope equals `flag`.
    ///
    /// Compared as a float, so `1` and `1.0` are the same flag; strings never match.
    pub fn has_status(&self, flag: f64) -> bool {
        self.body.get("status").and_then(Value::as_f64) == Some(flag)
    }

    /// Look up a string field by JSON pointer, ignoring empty strings
    pub fn str_at(&self, pointer: &str) -> Option<&str> {
        self.body
            .pointer(pointer)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
    }
}

/// Counters collected over one run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    /// Usernames that went through the workflow
    pub attempted: u64,
    pub registered: u64,
    /// Usernames appended to the unavailable list during this run
    pub unavailable: u64,
    /// Soft failures that were not marked unavailable
    pub failed: u64,
    /// Usernames skipped because they were already known unavailable
    pub skipped: u64,
    pub started_at: DateTime<Utc>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self {
            attempted: 0,
            registered: 0,
            unavailable: 0,
            failed: 0,
            skipped: 0,
            started_at: Utc::now(),
        }
    }

    /// Get elapsed time
    pub fn elapsed(&self) -> chrono::Duration {
        Utc::now() - self.started_at
    }
}

impl Default for RunSummary {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RunSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "attempted {}, registered {}, unavailable {}, failed {}, skipped {} in {}s",
            self.attempted,
            self.registered,
            self.unavailable,
            self.failed,
            self.skipped,
            self.elapsed().num_seconds()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_bearer_header() {
        let account = Account::new("a@example.com", "tok123");
        assert_eq!(account.bearer(), "Bearer tok123");
    }

    #[test]
    fn test_debug_hides_token() {
        let account = Account::new("a@example.com", "secret-token");
        let debug = format!("{:?}", account);
        assert!(debug.contains("a@example.com"));
        assert!(!debug.contains("secret-token"));
    }

    #[test]
    fn test_response_accessors() {
        let response = ApiResponse {
            succeeded: true,
            http_status: 200,
            body: json!({ "status": 1, "data": { "url": "https://x/y/cs_1", "empty": "" } }),
            raw_body: String::new(),
        };
        assert!(response.is_ok());
        assert!(response.has_status(1.0));
        assert!(!response.has_status(0.0));
        assert_eq!(response.str_at("/data/url"), Some("https://x/y/cs_1"));
        assert_eq!(response.str_at("/data/empty"), None);
        assert_eq!(response.str_at("/data/missing"), None);
    }

    #[test]
    fn test_status_flag_accepts_float_encoding() {
        let mut response = ApiResponse {
            succeeded: true,
            http_status: 200,
            body: json!({ "status": 1.0 }),
            raw_body: String::new(),
        };
        assert!(response.has_status(1.0));

        response.body = json!({ "status": "1" });
        assert!(!response.has_status(1.0));

        response.body = json!({});
        assert!(!response.has_status(0.0));
    }
}
