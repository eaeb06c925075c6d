//! Low-level HTTP client: `QuoteHttp`.
//!
//! One method per API endpoint. Returns wire types (conversion to domain types
//! happens in the quote sub-client). Requests are never retried here; the
//! refresh loop's next cycle is the retry.

use crate::domain::quote::wire::QuoteEnvelope;
use crate::error::HttpError;

use async_lock::RwLock;
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Low-level HTTP client for the quote REST API.
pub struct QuoteHttp {
    base_url: String,
    client: Client,
    /// API token sent in the `token` header. Never exposed publicly.
    api_token: Arc<RwLock<Option<String>>>,
}

impl QuoteHttp {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, HttpError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .build()?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
            api_token: Arc::new(RwLock::new(None)),
        })
    }

    /// Set the initial API token. An empty token sends no header.
    pub fn with_api_token(mut self, token: Option<String>) -> Self {
        self.api_token = Arc::new(RwLock::new(token.filter(|t| !t.is_empty())));
        self
    }

    /// Replace the API token. An empty token clears the header.
    pub(crate) async fn set_api_token(&self, token: Option<String>) {
        *self.api_token.write().await = token.filter(|t| !t.is_empty());
    }

    pub(crate) async fn has_api_token(&self) -> bool {
        self.api_token.read().await.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // ── Forex ────────────────────────────────────────────────────────────

    pub async fn get_forex_quote(
        &self,
        region: &str,
        code: &str,
    ) -> Result<QuoteEnvelope, HttpError> {
        let url = forex_quote_url(&self.base_url, region, code);
        self.do_get(&url).await
    }

    // ── Internal HTTP methods ────────────────────────────────────────────

    async fn do_get<T: DeserializeOwned>(&self, url: &str) -> Result<T, HttpError> {
        let mut req = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json");

        if let Some(token) = self.api_token.read().await.as_ref() {
            req = req.header("token", token);
        }

        let resp = req.send().await?;
        let status = resp.status();

        if status.is_success() {
            let parsed = resp.json::<T>().await?;
            return Ok(parsed);
        }

        let status_code = status.as_u16();
        let body_text = resp.text().await.unwrap_or_default();

        match status_code {
            401 => Err(HttpError::Unauthorized),
            404 => Err(HttpError::NotFound(body_text)),
            408 => Err(HttpError::Timeout),
            429 => Err(HttpError::RateLimited {
                retry_after_ms: None,
            }),
            400..=499 => Err(HttpError::BadRequest(body_text)),
            _ => Err(HttpError::ServerError {
                status: status_code,
                body: body_text,
            }),
        }
    }
}

impl Clone for QuoteHttp {
    fn clone(&self) -> Self {
        Self {
            base_url: self.base_url.clone(),
            client: self.client.clone(),
            api_token: self.api_token.clone(),
        }
    }
}

/// `{base}/forex/quote?region={region}&code={code}`.
pub(crate) fn forex_quote_url(base_url: &str, region: &str, code: &str) -> String {
    format!(
        "{}/forex/quote?region={}&code={}",
        base_url,
        urlencoding::encode(region),
        urlencoding::encode(code)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forex_quote_url() {
        assert_eq!(
            forex_quote_url("https://api.itick.io", "GB", "XAUUSD"),
            "https://api.itick.io/forex/quote?region=GB&code=XAUUSD"
        );
    }

    #[test]
    fn test_forex_quote_url_encodes_query() {
        assert_eq!(
            forex_quote_url("http://localhost", "GB", "XAU/USD"),
            "http://localhost/forex/quote?region=GB&code=XAU%2FUSD"
        );
    }

    #[test]
    fn test_new_trims_trailing_slash() {
        let http = QuoteHttp::new("https://api.itick.io/", DEFAULT_TIMEOUT).unwrap();
        assert_eq!(http.base_url(), "https://api.itick.io");
    }

    #[tokio::test]
    async fn test_empty_token_clears_header() {
        let http = QuoteHttp::new("http://localhost", DEFAULT_TIMEOUT).unwrap();
        http.set_api_token(Some("abc".into())).await;
        assert!(http.has_api_token().await);
        http.set_api_token(Some(String::new())).await;
        assert!(!http.has_api_token().await);
    }
}
