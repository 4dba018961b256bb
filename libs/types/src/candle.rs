//! OHLCV candles and ticker quotes

use serde::{Deserialize, Serialize};

/// One OHLCV bar. `open_time` is milliseconds since the Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Closed price interval `[low, high]`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub low: f64,
    pub high: f64,
}

impl PriceRange {
    pub fn contains(&self, price: f64) -> bool {
        price >= self.low && price <= self.high
    }

    pub fn midpoint(&self) -> f64 {
        (self.low + self.high) / 2.0
    }
}

impl Candle {
    pub fn new(open_time: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> Self {
        Self {
            open_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Absolute body size `|close - open|`
    pub fn body(&self) -> f64 {
        (self.close - self.open).abs()
    }

    pub fn is_bullish(&self) -> bool {
        self.close > self.open
    }

    pub fn is_bearish(&self) -> bool {
        self.close < self.open
    }

    /// Greatest of the bar range and the gaps against the previous close
    pub fn true_range(&self, prev_close: f64) -> f64 {
        (self.high - self.low)
            .max((self.high - prev_close).abs())
            .max((self.low - prev_close).abs())
    }

    /// Full high/low range including wicks
    pub fn wick_range(&self) -> PriceRange {
        PriceRange {
            low: self.low,
            high: self.high,
        }
    }

    /// Open/close range without wicks
    pub fn body_range(&self) -> PriceRange {
        PriceRange {
            low: self.open.min(self.close),
            high: self.open.max(self.close),
        }
    }
}

/// Latest quote for a symbol as reported by the venue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticker {
    /// Symbol form the venue actually answered for
    pub symbol: String,
    pub last_price: f64,
    /// 24h change in percent, when the venue reports it
    pub percent_change: Option<f64>,
}
