//! Fetching source documents over HTTP.

use std::time::Duration;

use reqwest::Client;
use url::Url;

use crate::{HunterError, Result};

/// Browser user agent; many documentation sites refuse unknown clients
pub const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Request timeout for fetching a document
pub const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

fn fetch_error(url: &Url, message: impl Into<String>) -> HunterError {
    HunterError::Fetch {
        url: url.to_string(),
        message: message.into(),
    }
}

/// Download the markup at `url`.
///
/// Fails on transport errors, timeouts and non-success statuses.
pub async fn fetch_html(url: &Url) -> Result<String> {
    if !matches!(url.scheme(), "http" | "https") {
        return Err(HunterError::InvalidInput(format!(
            "unsupported URL scheme '{}'",
            url.scheme()
        )));
    }

    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .build()
        .map_err(|e| fetch_error(url, e.to_string()))?;

    tracing::debug!(%url, "fetching document");

    let response = client
        .get(url.clone())
        .send()
        .await
        .map_err(|e| fetch_error(url, e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(fetch_error(url, format!("HTTP {status}")));
    }

    let body = response
        .text()
        .await
        .map_err(|e| fetch_error(url, e.to_string()))?;

    tracing::debug!(%url, bytes = body.len(), "fetched document");
    Ok(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_rejects_non_http_schemes() {
        let url = Url::parse("file:///etc/hosts").unwrap();
        assert!(matches!(
            fetch_html(&url).await,
            Err(HunterError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_unreachable_host_is_a_fetch_error() {
        // port 9 on localhost (discard) is closed on test machines
        let url = Url::parse("http://127.0.0.1:9/").unwrap();
        match fetch_html(&url).await {
            Err(HunterError::Fetch { url, .. }) => assert_eq!(url, "http://127.0.0.1:9/"),
            other => panic!("expected fetch error, got {other:?}"),
        }
    }
}
