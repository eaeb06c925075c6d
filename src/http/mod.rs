//! HTTP client layer: `QuoteHttp`.

pub mod client;

pub use client::QuoteHttp;
