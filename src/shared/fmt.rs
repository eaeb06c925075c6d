//! Decimal formatting for human-readable display.

use rust_decimal::{Decimal, RoundingStrategy};

/// Placeholder shown before the first successful refresh.
pub const PLACEHOLDER: &str = "---";

const ARROW_UP: &str = "▲";
const ARROW_DOWN: &str = "▼";

/// Adds thousands separators to the integer part of an already-rounded
/// number string. Keeps the fractional part untouched.
pub fn group_thousands(formatted: &str) -> String {
    let (sign, unsigned) = match formatted.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", formatted),
    };
    let (integer, fraction) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let grouped = integer
        .as_bytes()
        .rchunks(3)
        .rev()
        .map(|c| std::str::from_utf8(c).unwrap_or_default())
        .collect::<Vec<_>>()
        .join(",");

    match fraction {
        Some(f) => format!("{}{}.{}", sign, grouped, f),
        None => format!("{}{}", sign, grouped),
    }
}

/// Fixed-point rendering with `dp` decimals, midpoint away from zero.
pub fn fixed(value: &Decimal, dp: u32) -> String {
    let rounded = value.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}", dp as usize, rounded)
}

/// Price text: two decimals with thousands separators (`2,345.67`).
pub fn price(value: &Decimal) -> String {
    group_thousands(&fixed(value, 2))
}

/// Change text: direction arrow followed by the absolute percent (`▲0.53%`).
pub fn change(is_positive: bool, percent: &Decimal) -> String {
    let arrow = if is_positive { ARROW_UP } else { ARROW_DOWN };
    format!("{}{}%", arrow, fixed(&percent.abs(), 2))
}
