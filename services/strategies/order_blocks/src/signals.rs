//! Trading signal definitions and generation
//!
//! [`SignalGenerator`] runs the gate sequence for one (symbol, timeframe)
//! series and either emits a [`Signal`] or names the first gate that failed.

use crate::config::{EntryMode, SignalConfig};
use crate::indicators::{self, SwingPoint};
use crate::order_block::{self, OrderBlock};
use serde::{Deserialize, Serialize};
use std::fmt;
use types::{Candle, Timeframe};

/// Minimum series length for signal generation
pub const MIN_SIGNAL_BARS: usize = 80;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    Long,
    Short,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Long => f.write_str("LONG"),
            Direction::Short => f.write_str("SHORT"),
        }
    }
}

/// A directional trade idea. Recomputed on every scan, never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub direction: Direction,
    pub timeframe: Timeframe,
    pub entry: f64,
    pub stop: f64,
    /// Ordered by increasing distance from entry
    pub targets: Vec<f64>,
    pub order_block_low: f64,
    pub order_block_high: f64,
    /// Present when the trend-quality gate was evaluated
    pub snr: Option<f64>,
}

impl Signal {
    /// Entry-to-stop distance
    pub fn risk(&self) -> f64 {
        (self.entry - self.stop).abs()
    }
}

/// Why no signal was produced. Every variant is a normal outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    InsufficientData,
    AtrUnavailable,
    NoSwingHigh,
    NoSwingLow,
    WeakBody,
    SnrUnavailable,
    SnrBelowThreshold,
    NoStructureBreak,
    NoOrderBlock,
    OutsideOrderBlock,
    NonPositiveRisk,
}

impl Rejection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Rejection::InsufficientData => "insufficient data",
            Rejection::AtrUnavailable => "ATR unavailable",
            Rejection::NoSwingHigh => "no confirmed swing high",
            Rejection::NoSwingLow => "no confirmed swing low",
            Rejection::WeakBody => "breakout body below ATR threshold",
            Rejection::SnrUnavailable => "SNR unavailable",
            Rejection::SnrBelowThreshold => "SNR below threshold",
            Rejection::NoStructureBreak => "no break of structure",
            Rejection::NoOrderBlock => "no order block",
            Rejection::OutsideOrderBlock => "close outside order block",
            Rejection::NonPositiveRisk => "non-positive risk",
        }
    }
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify the last close against the most recent swing pair.
///
/// If the close is beyond both swings (only possible when the swing high sits
/// below the swing low), the more recently confirmed swing decides.
pub fn classify_break(close: f64, high: &SwingPoint, low: &SwingPoint) -> Option<Direction> {
    match (close > high.price, close < low.price) {
        (true, false) => Some(Direction::Long),
        (false, true) => Some(Direction::Short),
        (true, true) if high.index >= low.index => Some(Direction::Long),
        (true, true) => Some(Direction::Short),
        (false, false) => None,
    }
}

fn pick_entry(block: &OrderBlock, direction: Direction, mode: EntryMode) -> f64 {
    match (mode, direction) {
        (EntryMode::Mid, _) => block.range().midpoint(),
        (EntryMode::Top, Direction::Long) | (EntryMode::Bottom, Direction::Short) => block.high,
        (EntryMode::Top, Direction::Short) | (EntryMode::Bottom, Direction::Long) => block.low,
    }
}

/// Stateless signal generator for one configuration
#[derive(Debug, Clone)]
pub struct SignalGenerator {
    config: SignalConfig,
}

impl SignalGenerator {
    pub fn new(config: SignalConfig) -> Self {
        Self { config }
    }

    /// Signal for the last bar of `candles`, if every gate passes
    pub fn generate(&self, candles: &[Candle], timeframe: Timeframe) -> Option<Signal> {
        self.evaluate(candles, timeframe).ok()
    }

    /// Run the gates in order, stopping at the first failure
    pub fn evaluate(&self, candles: &[Candle], timeframe: Timeframe) -> Result<Signal, Rejection> {
        let cfg = &self.config;
        let last = match candles.last() {
            Some(last) if candles.len() >= MIN_SIGNAL_BARS => last,
            _ => return Err(Rejection::InsufficientData),
        };
        let close = last.close;

        // A flat market has zero ATR and cannot normalise anything.
        let atr = indicators::atr(candles, cfg.atr_period)
            .filter(|atr| atr.is_finite() && *atr > 0.0)
            .ok_or(Rejection::AtrUnavailable)?;

        let swing_high =
            indicators::swing_high(candles, cfg.swing_lookback).ok_or(Rejection::NoSwingHigh)?;
        let swing_low =
            indicators::swing_low(candles, cfg.swing_lookback).ok_or(Rejection::NoSwingLow)?;

        if last.body() < atr * cfg.atr_multiplier {
            return Err(Rejection::WeakBody);
        }

        let snr = if cfg.snr.enabled {
            let value = indicators::snr(candles, cfg.snr.length).ok_or(Rejection::SnrUnavailable)?;
            if value < *cfg.snr.min.resolve(&timeframe) {
                return Err(Rejection::SnrBelowThreshold);
            }
            Some(value)
        } else {
            None
        };

        let direction =
            classify_break(close, &swing_high, &swing_low).ok_or(Rejection::NoStructureBreak)?;

        let break_index = candles.len() - 1;
        let block =
            order_block::find_order_block(candles, break_index, direction, cfg.order_block_source)
                .ok_or(Rejection::NoOrderBlock)?;

        if !block.contains(close) {
            return Err(Rejection::OutsideOrderBlock);
        }

        let entry = pick_entry(&block, direction, cfg.entry_mode);
        let stop = match direction {
            Direction::Long => block.low - atr * cfg.stop_atr_pad,
            Direction::Short => block.high + atr * cfg.stop_atr_pad,
        };
        let risk = (entry - stop).abs();
        if !(risk.is_finite() && risk > 0.0) {
            return Err(Rejection::NonPositiveRisk);
        }

        let mut multiples = cfg.targets.resolve(&timeframe).clone();
        multiples.sort_by(f64::total_cmp);
        let targets = multiples
            .iter()
            .map(|m| match direction {
                Direction::Long => entry + m * risk,
                Direction::Short => entry - m * risk,
            })
            .collect();

        Ok(Signal {
            direction,
            timeframe,
            entry,
            stop,
            targets,
            order_block_low: block.low,
            order_block_high: block.high,
            snr,
        })
    }
}

impl Default for SignalGenerator {
    fn default() -> Self {
        Self::new(SignalConfig::default())
    }
}
