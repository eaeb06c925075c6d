//! USD-per-ounce → CNY-per-gram conversion.
//!
//! All arithmetic is done on `rust_decimal::Decimal` with checked operations,
//! so repeated application never drifts and overflow surfaces as an error
//! instead of a panic.

use crate::error::ConversionError;
use rust_decimal::Decimal;

/// Troy ounce to gram.
pub fn ounce_to_gram() -> Decimal {
    Decimal::new(311035, 4)
}

/// Fixed USD → CNY rate.
pub fn usd_to_cny_rate() -> Decimal {
    Decimal::new(725, 2)
}

/// Fixed-rate, fixed-unit price converter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitConverter {
    rate: Decimal,
    unit: Decimal,
}

impl Default for UnitConverter {
    fn default() -> Self {
        Self {
            rate: usd_to_cny_rate(),
            unit: ounce_to_gram(),
        }
    }
}

impl UnitConverter {
    /// Build a converter with a custom rate and units-per-source-unit.
    ///
    /// Returns `DivisionByZero` if `unit` is zero.
    pub fn new(rate: Decimal, unit: Decimal) -> Result<Self, ConversionError> {
        if unit.is_zero() {
            return Err(ConversionError::DivisionByZero);
        }
        Ok(Self { rate, unit })
    }

    pub fn rate(&self) -> Decimal {
        self.rate
    }

    pub fn unit(&self) -> Decimal {
        self.unit
    }

    /// `price * rate / unit`.
    pub fn to_secondary_unit(&self, price: Decimal) -> Result<Decimal, ConversionError> {
        price
            .checked_mul(self.rate)
            .and_then(|v| v.checked_div(self.unit))
            .ok_or_else(|| ConversionError::Overflow(price.to_string()))
    }

    /// Inverse of [`to_secondary_unit`](Self::to_secondary_unit): `price * unit / rate`.
    pub fn from_secondary_unit(&self, price: Decimal) -> Result<Decimal, ConversionError> {
        if self.rate.is_zero() {
            return Err(ConversionError::DivisionByZero);
        }
        price
            .checked_mul(self.unit)
            .and_then(|v| v.checked_div(self.rate))
            .ok_or_else(|| ConversionError::Overflow(price.to_string()))
    }

    /// Converted `current` minus converted `previous`.
    pub fn delta(&self, current: Decimal, previous: Decimal) -> Result<Decimal, ConversionError> {
        let current = self.to_secondary_unit(current)?;
        let previous = self.to_secondary_unit(previous)?;
        current
            .checked_sub(previous)
            .ok_or_else(|| ConversionError::Overflow(current.to_string()))
    }

    /// Percent change of the converted values; zero when the converted
    /// previous value is zero.
    pub fn delta_percent(
        &self,
        current: Decimal,
        previous: Decimal,
    ) -> Result<Decimal, ConversionError> {
        let previous_converted = self.to_secondary_unit(previous)?;
        if previous_converted.is_zero() {
            return Ok(Decimal::ZERO);
        }
        let delta = self.delta(current, previous)?;
        delta
            .checked_div(previous_converted)
            .and_then(|v| v.checked_mul(Decimal::ONE_HUNDRED))
            .ok_or_else(|| ConversionError::Overflow(delta.to_string()))
    }
}
