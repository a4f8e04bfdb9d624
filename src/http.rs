//! HTTP client wrapper
//!
//! Every call returns an [`ApiResponse`]; network failures and non-2xx
//! responses are folded into the same failure shape so the workflow only
//! ever inspects one type.

use reqwest::{Client, Method};
use serde_json::Value;

use crate::error::Result;
use crate::types::ApiResponse;

/// Status reported when no HTTP response was received at all
pub const TRANSPORT_FAILURE_STATUS: u16 = 500;

/// Thin JSON client with bearer authentication
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: Client,
}

impl ApiClient {
    /// Create a client with transport defaults (no proxy, no custom user agent)
    pub fn new() -> Result<Self> {
        let client = Client::builder().build()?;
        Ok(Self { client })
    }

    pub async fn post(&self, url: &str, payload: &Value, bearer: &str) -> ApiResponse {
        self.send(Method::POST, url, Some(payload), bearer).await
    }

    pub async fn get(&self, url: &str, bearer: &str) -> ApiResponse {
        self.send(Method::GET, url, None, bearer).await
    }

    /// Issue a request and normalize the outcome
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        payload: Option<&Value>,
        bearer: &str,
    ) -> ApiResponse {
        let mut request = self
            .client
            .request(method.clone(), url)
            .header("Content-Type", "application/json")
            .header("Authorization", bearer);
        if let Some(payload) = payload {
            request = request.json(payload);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                tracing::debug!(%method, url, error = %e, "Request failed before a response");
                return transport_failure(&e);
            }
        };

        let status = response.status();
        let text = match response.text().await {
            Ok(text) => text,
            Err(e) => {
                tracing::debug!(%method, url, error = %e, "Failed to read response body");
                return transport_failure(&e);
            }
        };

        tracing::debug!(%method, url, status = status.as_u16(), "Request completed");
        normalize(status.as_u16(), text)
    }
}

/// Fold a status code and body text into an [`ApiResponse`]
pub fn normalize(status: u16, text: String) -> ApiResponse {
    let body = serde_json::from_str::<Value>(&text).unwrap_or_else(|_| Value::String(text.clone()));

    if (200..300).contains(&status) {
        ApiResponse {
            succeeded: true,
            http_status: status,
            body,
            raw_body: text,
        }
    } else {
        let raw_body = format!("HTTP {}: {}", status, body);
        ApiResponse {
            succeeded: false,
            http_status: status,
            body,
            raw_body,
        }
    }
}

fn transport_failure(err: &reqwest::Error) -> ApiResponse {
    ApiResponse {
        succeeded: false,
        http_status: TRANSPORT_FAILURE_STATUS,
        body: Value::Object(Default::default()),
        raw_body: format!("Network Error: {}", err),
    }
}
