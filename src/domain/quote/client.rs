//! Quote sub-client: forex spot quotes.

use super::Quote;
use crate::client::MetalsClient;
use crate::error::MonitorError;
use crate::shared::InstrumentCode;

/// Sub-client for quote operations.
pub struct Quotes<'a> {
    pub(crate) client: &'a MetalsClient,
}

impl<'a> Quotes<'a> {
    /// Fetch a quote, surfacing every failure as an error.
    pub async fn get(&self, code: &InstrumentCode) -> Result<Quote, MonitorError> {
        let envelope = self
            .client
            .http
            .get_forex_quote(&self.client.region, code.as_str())
            .await?;
        let mut quote = Quote::from(envelope.into_data()?);
        if quote.code.as_str().is_empty() {
            quote.code = code.clone();
        }
        Ok(quote)
    }

    /// Fetch a quote, failing soft: any transport, status or payload error is
    /// logged and reported as `None`.
    pub async fn fetch(&self, code: &InstrumentCode) -> Option<Quote> {
        match self.get(code).await {
            Ok(quote) => {
                tracing::debug!(code = %code, last = %quote.last, "Quote received");
                Some(quote)
            }
            Err(MonitorError::Api { code: api_code, msg }) => {
                tracing::warn!(code = %code, api_code, msg = %msg, "Quote request rejected");
                None
            }
            Err(e) => {
                tracing::warn!(code = %code, error = %e, "Quote request failed");
                None
            }
        }
    }

    pub async fn london_gold(&self) -> Option<Quote> {
        self.fetch(&InstrumentCode::london_gold()).await
    }

    pub async fn london_silver(&self) -> Option<Quote> {
        self.fetch(&InstrumentCode::london_silver()).await
    }
}
