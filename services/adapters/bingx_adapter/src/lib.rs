//! # BingX Market Data Adapter
//!
//! Public REST market data from BingX for the order-block scanner: last price
//! with 24h change, and OHLCV candles for any supported timeframe, on either
//! the USDT perpetual swap or the spot product line.
//!
//! ## Symbol Resolution
//!
//! Configured symbols use the unified `BASE/QUOTE` spelling. Each request tries
//! the perpetual form (`BASE/QUOTE:QUOTE`) and the spot form in the order the
//! configured [`MarketType`] prefers; the first form the venue answers for is
//! reported back as the resolved symbol.
//!
//! ## Safety
//!
//! - **Rate Limiting**: one `governor` quota shared by every endpoint
//! - **Timeouts**: per-request timeout from [`BingxConfig::timeout_ms`]
//! - **No Retries**: a failed form falls through to the next form, never to the same one

pub mod client;
pub mod config;
pub mod error;
pub mod rate_limit;
pub mod symbols;
mod wire;

pub use crate::client::BingxClient;
pub use crate::config::{BingxConfig, MarketType};
pub use crate::error::{AdapterError, Result};
pub use crate::rate_limit::RateLimiter;
pub use crate::symbols::{candidate_forms, SymbolForm};
