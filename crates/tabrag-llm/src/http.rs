//! Shared HTTP plumbing for provider adapters

use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Longest provider response body echoed into an error message
const SNIPPET_LEN: usize = 300;

pub(crate) fn build_client(timeout: Duration) -> Result<reqwest::Client, String> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| format!("failed to build HTTP client: {}", e))
}

/// POST `body` as JSON and decode the JSON response.
///
/// Every failure is flattened into a human-readable reason; the caller
/// decides which error variant it belongs to.
pub(crate) async fn post_json<B, R>(
    request: reqwest::RequestBuilder,
    body: &B,
    timeout: Duration,
) -> Result<R, String>
where
    B: Serialize + ?Sized,
    R: DeserializeOwned,
{
    let started = Instant::now();

    let response = request.json(body).send().await.map_err(|e| describe_transport(&e, timeout))?;

    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(format!("HTTP {}: {}", status, make_snippet(&text)));
    }

    let decoded = response.json::<R>().await.map_err(|e| {
        if e.is_timeout() {
            describe_transport(&e, timeout)
        } else {
            format!("failed to decode provider response: {}", e)
        }
    })?;

    tracing::debug!(latency_ms = started.elapsed().as_millis() as u64, "Provider call completed");
    Ok(decoded)
}

fn describe_transport(err: &reqwest::Error, timeout: Duration) -> String {
    if err.is_timeout() {
        format!("request timed out after {:.1}s", timeout.as_secs_f64())
    } else if err.is_connect() {
        format!("connection failed: {}", err)
    } else {
        format!("transport error: {}", err)
    }
}

pub(crate) fn make_snippet(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= SNIPPET_LEN {
        return trimmed.to_string();
    }
    let cut: String = trimmed.chars().take(SNIPPET_LEN).collect();
    format!("{}…", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_snippet_is_untouched() {
        assert_eq!(make_snippet("  quota exceeded \n"), "quota exceeded");
    }

    #[test]
    fn test_long_snippet_is_truncated() {
        let long = "x".repeat(1000);
        let snippet = make_snippet(&long);
        assert_eq!(snippet.chars().count(), SNIPPET_LEN + 1);
        assert!(snippet.ends_with('…'));
    }
}
