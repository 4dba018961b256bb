//! Testing utilities for strategies
//!
//! In-memory market data and hand-built candle series used by the strategy,
//! adapter and notifier tests.

use crate::{MarketDataProvider, ProviderError};
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use types::{Candle, Ticker, Timeframe};

/// One request observed by [`MockMarketData`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Ticker(String),
    Candles(String, Timeframe),
}

/// Mock market data provider for testing
#[derive(Debug, Default)]
pub struct MockMarketData {
    tickers: HashMap<String, Ticker>,
    series: HashMap<(String, Timeframe), Vec<Candle>>,
    default_series: HashMap<String, Vec<Candle>>,
    failing: HashSet<String>,
    failing_series: HashSet<(String, Timeframe)>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockMarketData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quote `symbol` at `price`
    pub fn with_ticker(mut self, symbol: &str, price: f64, percent_change: f64) -> Self {
        self.tickers.insert(
            symbol.to_string(),
            Ticker {
                symbol: symbol.to_string(),
                last_price: price,
                percent_change: Some(percent_change),
            },
        );
        self
    }

    /// Serve `candles` for one (symbol, timeframe)
    pub fn with_candles(mut self, symbol: &str, timeframe: Timeframe, candles: Vec<Candle>) -> Self {
        self.series.insert((symbol.to_string(), timeframe), candles);
        self
    }

    /// Serve `candles` for every timeframe of `symbol` without a specific series
    pub fn with_default_candles(mut self, symbol: &str, candles: Vec<Candle>) -> Self {
        self.default_series.insert(symbol.to_string(), candles);
        self
    }

    /// Every request for `symbol` fails
    pub fn failing(mut self, symbol: &str) -> Self {
        self.failing.insert(symbol.to_string());
        self
    }

    /// Candle requests for one (symbol, timeframe) fail
    pub fn failing_candles(mut self, symbol: &str, timeframe: Timeframe) -> Self {
        self.failing_series.insert((symbol.to_string(), timeframe));
        self
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().clone()
    }
}

#[async_trait]
impl MarketDataProvider for MockMarketData {
    fn name(&self) -> &'static str {
        "mock"
    }

    async fn ticker(&self, symbol: &str) -> Result<Ticker, ProviderError> {
        self.calls.lock().push(MockCall::Ticker(symbol.to_string()));

        if self.failing.contains(symbol) {
            return Err(ProviderError::SymbolUnavailable {
                symbol: symbol.to_string(),
                reason: "mock failure".to_string(),
            });
        }

        self.tickers
            .get(symbol)
            .cloned()
            .ok_or_else(|| ProviderError::SymbolUnavailable {
                symbol: symbol.to_string(),
                reason: "no such market".to_string(),
            })
    }

    async fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError> {
        self.calls
            .lock()
            .push(MockCall::Candles(symbol.to_string(), timeframe));

        let key = (symbol.to_string(), timeframe);
        if self.failing.contains(symbol) || self.failing_series.contains(&key) {
            return Err(ProviderError::DataUnavailable {
                symbol: symbol.to_string(),
                timeframe,
                reason: "mock failure".to_string(),
            });
        }

        let candles = self
            .series
            .get(&key)
            .or_else(|| self.default_series.get(symbol))
            .ok_or_else(|| ProviderError::DataUnavailable {
                symbol: symbol.to_string(),
                timeframe,
                reason: "no series".to_string(),
            })?;

        let skip = candles.len().saturating_sub(limit);
        Ok(candles[skip..].to_vec())
    }
}

/// Build a candle at bar `index` with one-minute spacing
pub fn candle(index: usize, open: f64, high: f64, low: f64, close: f64) -> Candle {
    Candle::new(index as i64 * 60_000, open, high, low, close, 10.0)
}

/// `len` bars with every price equal to `price`
pub fn flat_series(len: usize, price: f64) -> Vec<Candle> {
    (0..len).map(|i| candle(i, price, price, price, price)).collect()
}

/// A 100-bar series ending in an upward break of structure.
///
/// The structure sits on a quiet, range-bound base rather than a rising
/// staircase, so the ATR and swing levels are known exactly.
///
/// - quiet bars: open 100, high 101, low 99.5, close 100.5 (ties never confirm a swing)
/// - bar 40: swing low at 95
/// - bar 90: swing high at 103
/// - bar 98: bearish retracement, wick range [101.5, 104.5]
/// - bar 99: bullish breakout from 101.6 to `breakout_close`, high `breakout_close + 0.2`
///
/// With the default signal settings a close of 104.0 yields a LONG signal from
/// the bar-98 order block; a close above 104.5 leaves the block.
pub fn long_breakout_series(breakout_close: f64) -> Vec<Candle> {
    (0..100)
        .map(|i| match i {
            40 => candle(i, 100.0, 101.0, 95.0, 100.5),
            90 => candle(i, 100.0, 103.0, 99.5, 100.5),
            98 => candle(i, 104.0, 104.5, 101.5, 102.0),
            99 => candle(i, 101.6, breakout_close + 0.2, 101.5, breakout_close),
            _ => candle(i, 100.0, 101.0, 99.5, 100.5),
        })
        .collect()
}

/// Reflect every price around `axis`, turning bullish structure into bearish
pub fn mirror_series(candles: &[Candle], axis: f64) -> Vec<Candle> {
    candles
        .iter()
        .map(|c| Candle {
            open_time: c.open_time,
            open: axis - c.open,
            high: axis - c.low,
            low: axis - c.high,
            close: axis - c.close,
            volume: c.volume,
        })
        .collect()
}
