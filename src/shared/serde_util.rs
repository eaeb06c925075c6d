//! Custom serde helpers for the quote API wire format.

/// Deserializes a JSON number, numeric string, or `null` into `Decimal`.
///
/// The quote API sends prices as bare JSON numbers, which the `serde-str`
/// feature of `rust_decimal` refuses. `null` becomes zero. Numbers are parsed
/// from their shortest decimal rendering, so `2345.67` stays exactly
/// `2345.67`.
pub mod decimal_lenient {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer};
    use std::str::FromStr;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(serde_json::Number),
        Text(String),
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = match Option::<Raw>::deserialize(deserializer)? {
            None => return Ok(Decimal::ZERO),
            Some(Raw::Number(n)) => n.to_string(),
            Some(Raw::Text(s)) => s,
        };
        let text = text.trim();
        if text.is_empty() {
            return Ok(Decimal::ZERO);
        }
        Decimal::from_str(text)
            .or_else(|_| Decimal::from_scientific(text))
            .map_err(|e| serde::de::Error::custom(format!("Invalid decimal {:?}: {}", text, e)))
    }
}
