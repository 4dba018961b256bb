//! Strategy traits and interfaces

use async_trait::async_trait;
use thiserror::Error;
use types::{Candle, Ticker, Timeframe};

/// Failure to obtain market data for a symbol, after every known alternate
/// symbol form was tried.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProviderError {
    #[error("Ticker unavailable for {symbol}: {reason}")]
    SymbolUnavailable { symbol: String, reason: String },

    #[error("Candles unavailable for {symbol} {timeframe}: {reason}")]
    DataUnavailable {
        symbol: String,
        timeframe: Timeframe,
        reason: String,
    },
}

/// Source of ticker quotes and candle series.
///
/// Implementations issue one request at a time; callers never hold more than
/// one call in flight.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Provider name for identification
    fn name(&self) -> &'static str;

    /// Latest quote for `symbol`
    async fn ticker(&self, symbol: &str) -> Result<Ticker, ProviderError>;

    /// Most recent `limit` candles for `symbol`, oldest first
    async fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>, ProviderError>;
}
