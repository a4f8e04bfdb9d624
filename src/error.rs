//! Error handling for username-claimer

use thiserror::Error;

/// Fatal errors: anything that stops the whole run
#[derive(Error, Debug, Clone)]
pub enum ClaimError {
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid format in accounts file{}: {message}", .line.map_or(String::new(), |l| format!(" (line {})", l)))]
    Credentials { message: String, line: Option<usize> },

    #[error("Network error: {message}")]
    Network {
        message: String,
        status_code: Option<u16>,
        url: Option<String>,
    },

    #[error("IO error: {message}")]
    Io {
        message: String,
        path: Option<String>,
    },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl ClaimError {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a credentials error, optionally pointing at a 1-based line
    pub fn credentials(message: impl Into<String>, line: Option<usize>) -> Self {
        Self::Credentials {
            message: message.into(),
            line,
        }
    }

    /// Create a network error
    pub fn network(
        message: impl Into<String>,
        status_code: Option<u16>,
        url: Option<String>,
    ) -> Self {
        Self::Network {
            message: message.into(),
            status_code,
            url,
        }
    }

    /// Create an IO error
    pub fn io(message: impl Into<String>, path: Option<String>) -> Self {
        Self::Io {
            message: message.into(),
            path,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Get user-friendly error message with suggestions
    pub fn user_message(&self) -> String {
        match self {
            Self::Config { message } => {
                format!("❌ Configuration problem: {}\n💡 Check your .env file or CLAIM_* variables", message)
            }
            Self::Credentials { .. } => {
                format!("❌ {}\n💡 Each line must look like: identifier,token", self)
            }
            Self::Network { message, status_code, .. } => {
                let status = status_code.map_or(String::new(), |c| format!(" ({})", c));
                format!("❌ Network error{}: {}\n💡 Check your internet connection", status, message)
            }
            Self::Io { message, path } => {
                let path_info = path.as_ref().map_or(String::new(), |p| format!(" ({})", p));
                format!("❌ File error{}: {}\n💡 Check file permissions and paths", path_info, message)
            }
            Self::Internal { message } => {
                format!("❌ Internal error: {}\n💡 This is a bug, please report it", message)
            }
        }
    }
}

impl From<reqwest::Error> for ClaimError {
    fn from(err: reqwest::Error) -> Self {
        let status_code = err.status().map(|s| s.as_u16());
        let url = err.url().map(|u| u.to_string());
        Self::network(err.to_string(), status_code, url)
    }
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ClaimError>;

/// Why a single username was abandoned.
///
/// None of these stop the batch. Only [`StepFailure::marks_unavailable`]
/// variants are written to the unavailable list.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StepFailure {
    #[error("{username} is not available ({detail})")]
    Unavailable { username: String, detail: String },

    #[error("Registration failed for {username}: {detail}")]
    RegistrationRejected { username: String, detail: String },

    #[error("Checkout URL not found for {username}")]
    MissingCheckoutUrl { username: String },

    #[error("Session ID not found for {username}")]
    MissingSessionId { username: String },

    #[error("Discount apply failed for {username}: {detail}")]
    DiscountRejected { username: String, detail: String },

    #[error("Discount apply failed for {username}: Amount due is {amount}")]
    AmountDue { username: String, amount: String },

    #[error("Payment failed for {username}: {detail}")]
    CompletionRejected { username: String, detail: String },

    #[error("Failed to return to Home for {username}: {detail}")]
    ConfirmationUnreachable { username: String, detail: String },

    #[error("Success message not found for {username}, registration might have failed")]
    SuccessPhraseMissing { username: String },

    #[error("Username mismatch for {expected}: Expected {expected}, got {displayed}")]
    UsernameMismatch { expected: String, displayed: String },
}

impl StepFailure {
    /// Whether the username should be appended to the unavailable list
    pub fn marks_unavailable(&self) -> bool {
        matches!(
            self,
            Self::Unavailable { .. } | Self::RegistrationRejected { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_error_mentions_line() {
        let err = ClaimError::credentials("missing token", Some(3));
        let text = err.to_string();
        assert!(text.contains("Invalid format"));
        assert!(text.contains("line 3"));
        assert!(text.contains("missing token"));
    }

    #[test]
    fn test_only_availability_failures_mark_unavailable() {
        let unavailable = StepFailure::Unavailable {
            username: "abcde".to_string(),
            detail: "HTTP 500".to_string(),
        };
        let rejected = StepFailure::RegistrationRejected {
            username: "abcde".to_string(),
            detail: "HTTP 400".to_string(),
        };
        let mismatch = StepFailure::UsernameMismatch {
            expected: "abcde".to_string(),
            displayed: "zzzzz".to_string(),
        };
        let phrase = StepFailure::SuccessPhraseMissing {
            username: "abcde".to_string(),
        };

        assert!(unavailable.marks_unavailable());
        assert!(rejected.marks_unavailable());
        assert!(!mismatch.marks_unavailable());
        assert!(!phrase.marks_unavailable());
    }

    #[test]
    fn test_reqwest_error_converts_to_network() {
        let err = reqwest::Client::new().get("not a url").build().unwrap_err();
        let claim_error = ClaimError::from(err);
        assert!(matches!(claim_error, ClaimError::Network { .. }));
        assert!(claim_error.user_message().starts_with("❌ Network error"));
    }

    #[test]
    fn test_user_message_includes_path() {
        let err = ClaimError::io("not found", Some("accounts.txt".to_string()));
        assert!(err.user_message().contains("accounts.txt"));
    }
}
