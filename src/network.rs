//! Quote API endpoint constants.

/// Default REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.itick.io";

/// Region code sent with every forex quote request.
pub const DEFAULT_FOREX_REGION: &str = "GB";
