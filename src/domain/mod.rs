//! Domain modules organized as vertical slices.
//!
//! - `quote`: wire types, conversion and the quote sub-client
//! - `display`: per-instrument display records
//! - `history`: rolling primary-metal history and chart windows

pub mod display;
pub mod history;
pub mod quote;
