//! Display domain: per-instrument records the presentation layer renders.

use crate::shared::fmt;
use rust_decimal::Decimal;
use serde::Serialize;

pub const LONDON_GOLD: &str = "London Gold";
pub const LONDON_SILVER: &str = "London Silver";
pub const CNY_GOLD: &str = "CNY Gold";

/// Current value, change and pre-rendered text for one tracked instrument.
///
/// Updated in place on every successful refresh of its instrument and never
/// reset; a failed refresh leaves the previous values showing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DisplayRecord {
    pub name: String,
    pub price: Decimal,
    pub change: Decimal,
    pub change_percent: Decimal,
    pub is_positive: bool,
    pub formatted_price: String,
    pub formatted_change: String,
}

impl DisplayRecord {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            price: Decimal::ZERO,
            change: Decimal::ZERO,
            change_percent: Decimal::ZERO,
            is_positive: false,
            formatted_price: fmt::PLACEHOLDER.to_string(),
            formatted_change: fmt::PLACEHOLDER.to_string(),
        }
    }

    pub fn update(&mut self, price: Decimal, change: Decimal, change_percent: Decimal) {
        self.price = price;
        self.change = change;
        self.change_percent = change_percent;
        self.is_positive = change >= Decimal::ZERO;
        self.formatted_price = fmt::price(&price);
        self.formatted_change = fmt::change(self.is_positive, &change_percent);
    }

    /// Whether at least one refresh has landed.
    pub fn has_data(&self) -> bool {
        self.formatted_price != fmt::PLACEHOLDER
    }
}
