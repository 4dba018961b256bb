//! # Order-Block Strategy - Smart Money Concepts Signal Generation
//!
//! ## Purpose
//!
//! Scans closed OHLCV candles for an impulsive break of market structure that
//! retraces into the last opposing candle (the order block). When the latest
//! close sits inside that block the strategy emits a directional signal with
//! entry, protective stop and risk-multiple targets.
//!
//! ## Integration Points
//!
//! - **Input Sources**: any [`strategy_shared::MarketDataProvider`] (BingX REST in production)
//! - **Output Destinations**: the signal notifier's presentation layer
//! - **Configuration**: [`SignalConfig`] and [`ScanConfig`] sections of the service TOML
//! - **Monitoring**: [`strategy_shared::ScanMetrics`] counters and `tracing` events
//!
//! ## Architecture Role
//!
//! ```text
//! Provider → [Scanner] → [SignalGenerator] → [Order Block] → Signal
//!    ↓           ↓              ↓                  ↓
//! Ticker     Per-symbol     ATR / swings       50-bar backward
//! Candles    isolation      body + SNR gates   search from break
//! ```
//!
//! ## Signal Gates
//!
//! Evaluated in order, the first failure ends the evaluation:
//!
//! 1. at least [`MIN_SIGNAL_BARS`] candles
//! 2. ATR defined and positive
//! 3. confirmed swing high and swing low
//! 4. last candle body at least `ATR × atr_multiplier`
//! 5. optional signal-to-noise floor per timeframe
//! 6. close beyond the most recent swing (break of structure)
//! 7. an opposing candle within [`ORDER_BLOCK_LOOKBACK`] bars of the break
//! 8. the close inside that block
//!
//! ## Example
//!
//! ```rust,no_run
//! use order_block_strategy::{Scanner, SignalConfig};
//! use strategy_shared::MarketDataProvider;
//! use types::Timeframe;
//!
//! async fn hourly_scan<P: MarketDataProvider>(provider: P) {
//!     let scanner = Scanner::new(provider, SignalConfig::default(), 300);
//!     let symbols = vec!["BTC/USDT".to_string(), "ETH/USDT".to_string()];
//!
//!     for result in scanner.scan_all(&symbols, &[Timeframe::H1, Timeframe::H4]).await {
//!         if let Some(signal) = result.signal() {
//!             println!("{} {} @ {:.4}", result.symbol, signal.direction, signal.entry);
//!         }
//!     }
//! }
//! ```

pub mod config;
pub mod error;
pub mod indicators;
pub mod order_block;
pub mod scanner;
pub mod signals;

pub use crate::config::{EntryMode, OrderBlockSource, ScanConfig, SignalConfig, SnrGate};
pub use crate::error::{Result, StrategyError};
pub use crate::indicators::{SwingKind, SwingPoint};
pub use crate::order_block::{find_order_block, OrderBlock, ORDER_BLOCK_LOOKBACK};
pub use crate::scanner::{
    Agreement, MultiTimeframeScan, ScanResult, Scanner, SymbolScan, TimeframeOutcome,
};
pub use crate::signals::{Direction, Rejection, Signal, SignalGenerator, MIN_SIGNAL_BARS};
