//! Conversions from wire types to domain types for quotes.

use super::wire::{QuoteData, QuoteEnvelope};
use super::Quote;
use crate::error::MonitorError;
use crate::shared::InstrumentCode;
use chrono::TimeZone;

impl QuoteEnvelope {
    /// Unwrap the payload, treating a non-zero `code` or a missing `data` as
    /// an API error.
    pub fn into_data(self) -> Result<QuoteData, MonitorError> {
        match self.data {
            Some(data) if self.code == 0 => Ok(data),
            _ => Err(MonitorError::Api {
                code: self.code,
                msg: self.msg.unwrap_or_default(),
            }),
        }
    }
}

impl From<QuoteData> for Quote {
    fn from(d: QuoteData) -> Self {
        let timestamp = d
            .t
            .filter(|ms| *ms > 0)
            .and_then(|ms| chrono::Utc.timestamp_millis_opt(ms).single())
            .unwrap_or_else(chrono::Utc::now);

        Self {
            code: InstrumentCode::from(d.s.unwrap_or_default()),
            last: d.ld,
            change: d.ch,
            change_percent: d.chp,
            bid: None,
            ask: None,
            high: d.h,
            low: d.l,
            open: d.o,
            previous_close: d.p,
            timestamp,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use std::str::FromStr;

    const SAMPLE: &str = r#"{
        "code": 0,
        "msg": null,
        "data": {
            "s": "XAUUSD",
            "ld": 2345.67,
            "o": 2330.1,
            "p": 2333.25,
            "h": 2351.0,
            "l": 2328.4,
            "t": 1740076800000,
            "v": 0,
            "tu": 0,
            "ts": 0,
            "ch": 12.42,
            "chp": 0.53
        }
    }"#;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_envelope_success_maps_to_quote() {
        let env: QuoteEnvelope = serde_json::from_str(SAMPLE).unwrap();
        let quote: Quote = env.into_data().unwrap().into();
        assert_eq!(quote.code.as_str(), "XAUUSD");
        assert_eq!(quote.last, dec("2345.67"));
        assert_eq!(quote.change, dec("12.42"));
        assert_eq!(quote.change_percent, dec("0.53"));
        assert_eq!(quote.open, dec("2330.1"));
        assert_eq!(quote.previous_close, dec("2333.25"));
        assert_eq!(quote.high, dec("2351"));
        assert_eq!(quote.low, dec("2328.4"));
        assert_eq!(quote.timestamp.timestamp_millis(), 1740076800000);
        assert!(quote.bid.is_none() && quote.ask.is_none());
    }

    #[test]
    fn test_nonzero_code_is_api_error() {
        let env: QuoteEnvelope =
            serde_json::from_str(r#"{"code": 401, "msg": "invalid token", "data": null}"#).unwrap();
        match env.into_data() {
            Err(MonitorError::Api { code, msg }) => {
                assert_eq!(code, 401);
                assert_eq!(msg, "invalid token");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_data_is_api_error() {
        let env: QuoteEnvelope = serde_json::from_str(r#"{"code": 0, "msg": "ok"}"#).unwrap();
        assert!(matches!(env.into_data(), Err(MonitorError::Api { code: 0, .. })));
    }

    #[test]
    fn test_missing_or_nonpositive_timestamp_uses_now() {
        let before = Utc::now();
        let zero: Quote = QuoteData { t: Some(0), ..Default::default() }.into();
        let absent: Quote = QuoteData::default().into();
        let after = Utc::now();
        for q in [zero, absent] {
            assert!(q.timestamp >= before && q.timestamp <= after);
        }
    }
}
