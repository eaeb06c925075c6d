//! High-level client: `MetalsClient` with its quote sub-client.
//!
//! The sub-client lives in `domain/quote/client.rs`. This module keeps the
//! builder, token management, and the [`QuoteSource`] implementation the
//! refresh loop consumes.

use crate::domain::quote::client::Quotes;
use crate::domain::quote::Quote;
use crate::error::MonitorError;
use crate::http::client::DEFAULT_TIMEOUT;
use crate::http::QuoteHttp;
use crate::monitor::QuoteSource;
use crate::settings::Settings;
use crate::shared::InstrumentCode;

use async_trait::async_trait;
use std::time::Duration;

// Re-export sub-client types for convenience.
pub use crate::domain::quote::client::Quotes as QuotesClient;

/// Entry point for the forex quote API.
#[derive(Clone)]
pub struct MetalsClient {
    pub(crate) http: QuoteHttp,
    pub(crate) region: String,
}

impl MetalsClient {
    pub fn builder() -> MetalsClientBuilder {
        MetalsClientBuilder::default()
    }

    /// Client using the default endpoint and the token stored in `settings`.
    pub fn from_settings(settings: &Settings) -> Result<Self, MonitorError> {
        Self::builder().api_token(&settings.api_token).build()
    }

    // ── Sub-client accessors ─────────────────────────────────────────────

    pub fn quotes(&self) -> Quotes<'_> {
        Quotes { client: self }
    }

    // ── Token ────────────────────────────────────────────────────────────

    /// Replace the API token on this client and every clone of it. An empty
    /// token stops sending the header.
    pub async fn set_api_token(&self, token: &str) {
        self.http.set_api_token(Some(token.to_string())).await;
    }

    pub async fn has_api_token(&self) -> bool {
        self.http.has_api_token().await
    }

    pub fn base_url(&self) -> &str {
        self.http.base_url()
    }

    pub fn region(&self) -> &str {
        &self.region
    }
}

#[async_trait]
impl QuoteSource for MetalsClient {
    async fn fetch_quote(&self, code: &InstrumentCode) -> Option<Quote> {
        self.quotes().fetch(code).await
    }

    async fn set_api_token(&self, token: &str) {
        MetalsClient::set_api_token(self, token).await;
    }
}

// ═════════════════════════════════════════════════════════════════════════════
// Builder
// ═════════════════════════════════════════════════════════════════════════════

pub struct MetalsClientBuilder {
    base_url: String,
    region: String,
    api_token: Option<String>,
    timeout: Duration,
}

impl Default for MetalsClientBuilder {
    fn default() -> Self {
        Self {
            base_url: crate::network::DEFAULT_API_URL.to_string(),
            region: crate::network::DEFAULT_FOREX_REGION.to_string(),
            api_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl MetalsClientBuilder {
    pub fn base_url(mut self, url: &str) -> Self {
        self.base_url = url.to_string();
        self
    }

    /// Forex region passed as the `region` query parameter.
    pub fn region(mut self, region: &str) -> Self {
        self.region = region.to_string();
        self
    }

    /// Pre-set the API token. Empty means none.
    pub fn api_token(mut self, token: &str) -> Self {
        self.api_token = Some(token.to_string());
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Result<MetalsClient, MonitorError> {
        let http = QuoteHttp::new(&self.base_url, self.timeout)?.with_api_token(self.api_token);
        Ok(MetalsClient {
            http,
            region: self.region,
        })
    }
}
