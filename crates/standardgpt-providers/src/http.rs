//! Shared client construction and error classification.

use std::time::Duration;

use reqwest::Client;
use tracing::warn;

/// Client with a total request timeout.
pub(crate) fn client(timeout: Duration) -> Client {
    Client::builder()
        .timeout(timeout)
        .build()
        .unwrap_or_else(|e| {
            warn!(error = %e, "falling back to default HTTP client");
            Client::new()
        })
}

/// API key read from the named environment variable; empty or unset is `None`.
pub(crate) fn api_key(env_var: &str) -> Option<String> {
    std::env::var(env_var)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Body of a failed response, cut for logs and error messages.
pub(crate) async fn error_body(response: reqwest::Response) -> String {
    let body = response.text().await.unwrap_or_default();
    body.chars().take(300).collect()
}
