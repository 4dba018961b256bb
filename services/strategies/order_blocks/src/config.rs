//! Strategy configuration
//!
//! Typed settings for signal generation and scanning. Values are validated
//! once at startup; the generator assumes a validated configuration.

use crate::error::{Result, StrategyError};
use crate::signals::MIN_SIGNAL_BARS;
use ::config::service::scanner::DEFAULT_CANDLE_LIMIT;
use ::config::KeyedDefault;
use serde::{Deserialize, Serialize};
use types::Timeframe;

/// Which part of the source candle forms the order block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderBlockSource {
    /// Full high/low range
    Wick,
    /// Open/close range
    Body,
}

/// Where inside the order block the entry is placed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EntryMode {
    /// Midpoint of the block
    #[serde(rename = "ob_mid")]
    Mid,
    /// Edge in the direction of the break (high for LONG, low for SHORT)
    #[serde(rename = "ob_top")]
    Top,
    /// Edge against the direction of the break (low for LONG, high for SHORT)
    #[serde(rename = "ob_bottom")]
    Bottom,
}

/// Optional trend-quality filter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnrGate {
    pub enabled: bool,

    /// Regression window in bars
    pub length: usize,

    /// Minimum SNR per timeframe
    pub min: KeyedDefault<Timeframe, f64>,
}

impl Default for SnrGate {
    fn default() -> Self {
        Self {
            enabled: false,
            length: 50,
            min: KeyedDefault::new(0.05),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalConfig {
    /// Bars on each side required to confirm a swing point
    pub swing_lookback: usize,

    pub atr_period: usize,

    /// Breakout body must be at least `atr * atr_multiplier`
    pub atr_multiplier: f64,

    pub order_block_source: OrderBlockSource,

    pub entry_mode: EntryMode,

    /// Stop distance beyond the block, in ATRs
    pub stop_atr_pad: f64,

    /// Take-profit risk multiples per timeframe
    pub targets: KeyedDefault<Timeframe, Vec<f64>>,

    pub snr: SnrGate,
}

impl Default for SignalConfig {
    fn default() -> Self {
        Self {
            swing_lookback: 5,
            atr_period: 14,
            atr_multiplier: 0.6,
            order_block_source: OrderBlockSource::Wick,
            entry_mode: EntryMode::Mid,
            stop_atr_pad: 0.1,
            targets: KeyedDefault::new(vec![1.0, 1.5, 2.0]),
            snr: SnrGate::default(),
        }
    }
}

impl SignalConfig {
    pub fn validate(&self) -> Result<()> {
        if self.swing_lookback == 0 {
            return Err(StrategyError::config("swing_lookback must be at least 1"));
        }
        if self.atr_period == 0 {
            return Err(StrategyError::config("atr_period must be at least 1"));
        }
        if !(self.atr_multiplier.is_finite() && self.atr_multiplier > 0.0) {
            return Err(StrategyError::config(format!(
                "atr_multiplier must be positive, got {}",
                self.atr_multiplier
            )));
        }
        if !(self.stop_atr_pad.is_finite() && self.stop_atr_pad >= 0.0) {
            return Err(StrategyError::config(format!(
                "stop_atr_pad must be non-negative, got {}",
                self.stop_atr_pad
            )));
        }
        for multiples in self.targets.values() {
            if multiples.is_empty() {
                return Err(StrategyError::config("target multiples cannot be empty"));
            }
            if let Some(bad) = multiples.iter().find(|m| !(m.is_finite() && **m > 0.0)) {
                return Err(StrategyError::config(format!(
                    "target multiples must be positive, got {}",
                    bad
                )));
            }
        }
        if self.snr.length < 3 {
            return Err(StrategyError::config("snr.length must be at least 3"));
        }
        if let Some(bad) = self.snr.min.values().find(|m| !(m.is_finite() && **m >= 0.0)) {
            return Err(StrategyError::config(format!(
                "snr.min thresholds must be non-negative, got {}",
                bad
            )));
        }
        Ok(())
    }
}

/// Which symbols and timeframes to scan
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub symbols: Vec<String>,

    /// Priority order for `/signal` and scheduled scans
    pub timeframes: Vec<Timeframe>,

    /// Priority order for the higher-timeframe scan
    pub htf_timeframes: Vec<Timeframe>,

    /// Every timeframe of the multi-timeframe summary
    pub summary_timeframes: Vec<Timeframe>,

    /// Candles requested per (symbol, timeframe)
    pub candle_limit: usize,
}

impl Default for ScanConfig {
    fn default() -> Self {
        use Timeframe::*;
        Self {
            symbols: [
                "BTC/USDT",
                "ETH/USDT",
                "SOL/USDT",
                "DOGE/USDT",
                "XRP/USDT",
                "ADA/USDT",
                "LINK/USDT",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            timeframes: vec![M5, M15, M30, H1, H4, D1],
            htf_timeframes: vec![M30, H1, H4, D1, W1],
            summary_timeframes: vec![M5, M15, M30, H1, H4, D1, W1],
            candle_limit: DEFAULT_CANDLE_LIMIT,
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.symbols.is_empty() {
            return Err(StrategyError::config("symbol list cannot be empty"));
        }
        if self.symbols.iter().any(|s| s.trim().is_empty()) {
            return Err(StrategyError::config("symbols cannot be blank"));
        }
        for (name, list) in [
            ("timeframes", &self.timeframes),
            ("htf_timeframes", &self.htf_timeframes),
            ("summary_timeframes", &self.summary_timeframes),
        ] {
            if list.is_empty() {
                return Err(StrategyError::config(format!("{} cannot be empty", name)));
            }
        }
        if self.candle_limit < MIN_SIGNAL_BARS {
            return Err(StrategyError::config(format!(
                "candle_limit must be at least {}, got {}",
                MIN_SIGNAL_BARS, self.candle_limit
            )));
        }
        Ok(())
    }
}
