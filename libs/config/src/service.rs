//! Service configuration defaults
//!
//! Default values shared between the services so that serde defaults and
//! documentation agree.

/// Market data adapter defaults
pub mod adapters {
    /// BingX public REST endpoint
    pub const BINGX_BASE_URL: &str = "https://open-api.bingx.com";

    /// Request timeout (milliseconds)
    pub const REQUEST_TIMEOUT_MS: u64 = 10_000;

    /// Rate limit (requests per second)
    pub const DEFAULT_RATE_LIMIT_RPS: u32 = 5;
}

/// Scanner defaults
pub mod scanner {
    /// Candles requested per (symbol, timeframe)
    pub const DEFAULT_CANDLE_LIMIT: usize = 300;
}

/// Notifier service defaults
pub mod notifier {
    /// Telegram Bot API endpoint
    pub const TELEGRAM_BASE_URL: &str = "https://api.telegram.org";

    /// Seconds between scheduled scans
    pub const DEFAULT_SCAN_INTERVAL_SECS: u64 = 180;

    /// Long-poll timeout for `getUpdates` (seconds)
    pub const POLL_TIMEOUT_SECS: u64 = 30;

    /// Report timestamps are rendered in this offset (Asia/Taipei)
    pub const DEFAULT_UTC_OFFSET_HOURS: i32 = 8;
}
