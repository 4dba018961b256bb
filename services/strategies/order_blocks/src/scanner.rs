//! Scan orchestration across symbols and timeframes
//!
//! Symbols are processed strictly one after another and each provider call is
//! awaited before the next is issued. A provider failure is recorded against
//! its symbol (or timeframe) and the scan moves on.

use crate::config::SignalConfig;
use crate::signals::{Direction, Rejection, Signal, SignalGenerator};
use std::collections::BTreeMap;
use std::sync::Arc;
use strategy_shared::{MarketDataProvider, ProviderError, ScanMetrics};
use tracing::{debug, info, warn};
use types::{Ticker, Timeframe};

/// Outcome for one requested symbol
#[derive(Debug, Clone, PartialEq)]
pub struct ScanResult<T> {
    /// Symbol as configured
    pub symbol: String,
    pub outcome: Result<T, ProviderError>,
}

/// First-match scan of one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct SymbolScan {
    /// Symbol form the venue answered for
    pub symbol: String,
    pub price: f64,
    pub percent_change: Option<f64>,
    pub signal: Option<Signal>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TimeframeOutcome {
    Signal(Signal),
    NoSignal(Rejection),
    Error(ProviderError),
}

impl TimeframeOutcome {
    pub fn signal(&self) -> Option<&Signal> {
        match self {
            TimeframeOutcome::Signal(signal) => Some(signal),
            _ => None,
        }
    }
}

/// How a symbol's timeframes relate to each other
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Agreement {
    /// Two or more timeframes signal, all in this direction
    Aligned(Direction),
    /// A single signal, or signals in both directions
    Divergent,
    NoSignals,
}

/// Full-matrix scan of one symbol
#[derive(Debug, Clone, PartialEq)]
pub struct MultiTimeframeScan {
    pub symbol: String,
    pub price: f64,
    pub percent_change: Option<f64>,
    pub per_timeframe: BTreeMap<Timeframe, TimeframeOutcome>,
}

impl MultiTimeframeScan {
    pub fn signals(&self) -> impl Iterator<Item = &Signal> {
        self.per_timeframe.values().filter_map(TimeframeOutcome::signal)
    }

    pub fn agreement(&self) -> Agreement {
        let directions: Vec<Direction> = self.signals().map(|s| s.direction).collect();
        match directions.first() {
            None => Agreement::NoSignals,
            Some(&first) if directions.len() >= 2 && directions.iter().all(|d| *d == first) => {
                Agreement::Aligned(first)
            }
            Some(_) => Agreement::Divergent,
        }
    }
}

impl ScanResult<SymbolScan> {
    pub fn signal(&self) -> Option<&Signal> {
        self.outcome.as_ref().ok().and_then(|scan| scan.signal.as_ref())
    }
}

/// Runs the signal generator over a market data provider
pub struct Scanner<P> {
    provider: P,
    generator: SignalGenerator,
    candle_limit: usize,
    metrics: Arc<ScanMetrics>,
}

impl<P: MarketDataProvider> Scanner<P> {
    pub fn new(provider: P, config: SignalConfig, candle_limit: usize) -> Self {
        Self {
            provider,
            generator: SignalGenerator::new(config),
            candle_limit,
            metrics: Arc::new(ScanMetrics::new()),
        }
    }

    pub fn metrics(&self) -> &Arc<ScanMetrics> {
        &self.metrics
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Try `timeframes` in priority order and keep the first signal
    pub async fn scan_one(
        &self,
        symbol: &str,
        timeframes: &[Timeframe],
    ) -> Result<SymbolScan, ProviderError> {
        let ticker = self.provider.ticker(symbol).await?;

        for &timeframe in timeframes {
            let candles = self
                .provider
                .candles(symbol, timeframe, self.candle_limit)
                .await?;

            match self.generator.evaluate(&candles, timeframe) {
                Ok(signal) => {
                    info!(
                        symbol = %ticker.symbol,
                        timeframe = %timeframe,
                        direction = %signal.direction,
                        entry = signal.entry,
                        "Order-block signal"
                    );
                    return Ok(Self::symbol_scan(ticker, Some(signal)));
                }
                Err(rejection) => {
                    debug!(symbol, timeframe = %timeframe, reason = %rejection, "No signal");
                }
            }
        }

        Ok(Self::symbol_scan(ticker, None))
    }

    /// First-match scan of every symbol
    pub async fn scan_all(
        &self,
        symbols: &[String],
        timeframes: &[Timeframe],
    ) -> Vec<ScanResult<SymbolScan>> {
        self.metrics.increment_scans();
        let mut results = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            self.metrics.increment_symbols();
            let outcome = self.scan_one(symbol, timeframes).await;
            match &outcome {
                Ok(scan) if scan.signal.is_some() => self.metrics.increment_signals(),
                Ok(_) => {}
                Err(e) => {
                    self.metrics.increment_errors();
                    warn!(symbol = %symbol, "Skipping symbol: {}", e);
                }
            }
            results.push(ScanResult {
                symbol: symbol.clone(),
                outcome,
            });
        }

        info!(
            "Scan complete: {} symbols, {} signals, {} errors",
            results.len(),
            results.iter().filter(|r| r.signal().is_some()).count(),
            results.iter().filter(|r| r.outcome.is_err()).count()
        );
        results
    }

    /// Evaluate every timeframe of one symbol independently
    pub async fn scan_symbol_multi(
        &self,
        symbol: &str,
        timeframes: &[Timeframe],
    ) -> Result<MultiTimeframeScan, ProviderError> {
        let ticker = self.provider.ticker(symbol).await?;
        let mut per_timeframe = BTreeMap::new();

        for &timeframe in timeframes {
            let outcome = match self.provider.candles(symbol, timeframe, self.candle_limit).await {
                Ok(candles) => match self.generator.evaluate(&candles, timeframe) {
                    Ok(signal) => TimeframeOutcome::Signal(signal),
                    Err(rejection) => TimeframeOutcome::NoSignal(rejection),
                },
                Err(e) => {
                    warn!(symbol, timeframe = %timeframe, "Timeframe unavailable: {}", e);
                    TimeframeOutcome::Error(e)
                }
            };
            per_timeframe.insert(timeframe, outcome);
        }

        Ok(MultiTimeframeScan {
            symbol: ticker.symbol,
            price: ticker.last_price,
            percent_change: ticker.percent_change,
            per_timeframe,
        })
    }

    /// Full-matrix scan of every symbol
    pub async fn scan_all_multi(
        &self,
        symbols: &[String],
        timeframes: &[Timeframe],
    ) -> Vec<ScanResult<MultiTimeframeScan>> {
        self.metrics.increment_scans();
        let mut results = Vec::with_capacity(symbols.len());

        for symbol in symbols {
            self.metrics.increment_symbols();
            let outcome = self.scan_symbol_multi(symbol, timeframes).await;
            match &outcome {
                Ok(scan) => {
                    for _ in scan.signals() {
                        self.metrics.increment_signals();
                    }
                }
                Err(e) => {
                    self.metrics.increment_errors();
                    warn!(symbol = %symbol, "Skipping symbol: {}", e);
                }
            }
            results.push(ScanResult {
                symbol: symbol.clone(),
                outcome,
            });
        }

        info!(
            "Multi-timeframe scan complete: {} symbols over {} timeframes",
            results.len(),
            timeframes.len()
        );
        results
    }

    fn symbol_scan(ticker: Ticker, signal: Option<Signal>) -> SymbolScan {
        SymbolScan {
            symbol: ticker.symbol,
            price: ticker.last_price,
            percent_change: ticker.percent_change,
            signal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategy_shared::testing::{
        flat_series, long_breakout_series, mirror_series, MockCall, MockMarketData,
    };

    fn symbols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn scanner(mock: MockMarketData) -> Scanner<MockMarketData> {
        Scanner::new(mock, SignalConfig::default(), 300)
    }

    #[tokio::test]
    async fn test_first_match_stops_at_first_signal() {
        let mock = MockMarketData::new()
            .with_ticker("BTC/USDT", 104.0, 2.5)
            .with_candles("BTC/USDT", Timeframe::M5, flat_series(100, 104.0))
            .with_candles("BTC/USDT", Timeframe::M15, long_breakout_series(104.0))
            .with_candles("BTC/USDT", Timeframe::H1, long_breakout_series(104.0));
        let scanner = scanner(mock);

        let scan = scanner
            .scan_one("BTC/USDT", &[Timeframe::M5, Timeframe::M15, Timeframe::H1])
            .await
            .unwrap();

        let signal = scan.signal.unwrap();
        assert_eq!(signal.timeframe, Timeframe::M15);
        assert_eq!(signal.direction, Direction::Long);
        assert_eq!(scan.price, 104.0);
        assert_eq!(scan.percent_change, Some(2.5));

        // ticker once, then timeframes in order until the hit
        assert_eq!(
            scanner.provider().calls(),
            vec![
                MockCall::Ticker("BTC/USDT".to_string()),
                MockCall::Candles("BTC/USDT".to_string(), Timeframe::M5),
                MockCall::Candles("BTC/USDT".to_string(), Timeframe::M15),
            ]
        );
    }

    #[tokio::test]
    async fn test_first_match_without_signal() {
        let mock = MockMarketData::new()
            .with_ticker("ETH/USDT", 3_000.0, -1.0)
            .with_default_candles("ETH/USDT", flat_series(100, 3_000.0));
        let scan = scanner(mock)
            .scan_one("ETH/USDT", &[Timeframe::H1, Timeframe::H4])
            .await
            .unwrap();
        assert_eq!(scan.signal, None);
        assert_eq!(scan.symbol, "ETH/USDT");
    }

    #[tokio::test]
    async fn test_scan_all_isolates_failures() {
        let names = symbols(&[
            "BTC/USDT", "ETH/USDT", "SOL/USDT", "DOGE/USDT", "XRP/USDT", "ADA/USDT", "LINK/USDT",
        ]);
        let mut mock = MockMarketData::new();
        for name in &names {
            mock = mock
                .with_ticker(name, 100.0, 0.0)
                .with_default_candles(name, flat_series(100, 100.0));
        }
        let mock = mock
            .with_default_candles("SOL/USDT", long_breakout_series(104.0))
            .failing("DOGE/USDT")
            .failing_candles("ADA/USDT", Timeframe::H1);
        let scanner = scanner(mock);

        let results = scanner.scan_all(&names, &[Timeframe::H1]).await;

        assert_eq!(results.len(), 7);
        assert_eq!(results.iter().filter(|r| r.outcome.is_err()).count(), 2);
        assert_eq!(results[3].symbol, "DOGE/USDT");
        assert!(matches!(
            results[3].outcome,
            Err(ProviderError::SymbolUnavailable { .. })
        ));
        assert!(matches!(
            results[5].outcome,
            Err(ProviderError::DataUnavailable { timeframe: Timeframe::H1, .. })
        ));
        assert_eq!(
            results.iter().filter_map(|r| r.signal()).count(),
            1,
            "only SOL carries the breakout"
        );
        assert!(results[2].signal().is_some());

        let metrics = scanner.metrics().snapshot();
        assert_eq!(metrics.scans_run, 1);
        assert_eq!(metrics.symbols_scanned, 7);
        assert_eq!(metrics.signals_generated, 1);
        assert_eq!(metrics.provider_errors, 2);
    }

    #[tokio::test]
    async fn test_multi_keeps_every_timeframe() {
        let breakout = long_breakout_series(104.0);
        let mock = MockMarketData::new()
            .with_ticker("BTC/USDT:USDT", 104.0, 1.0)
            .with_candles("BTC/USDT:USDT", Timeframe::M15, breakout.clone())
            .with_candles("BTC/USDT:USDT", Timeframe::H1, breakout.clone())
            .with_candles("BTC/USDT:USDT", Timeframe::H4, flat_series(100, 104.0))
            .failing_candles("BTC/USDT:USDT", Timeframe::D1);

        let scan = scanner(mock)
            .scan_symbol_multi(
                "BTC/USDT:USDT",
                &[Timeframe::D1, Timeframe::M15, Timeframe::H4, Timeframe::H1],
            )
            .await
            .unwrap();

        assert_eq!(scan.per_timeframe.len(), 4);
        assert!(matches!(scan.per_timeframe[&Timeframe::M15], TimeframeOutcome::Signal(_)));
        assert!(matches!(scan.per_timeframe[&Timeframe::H1], TimeframeOutcome::Signal(_)));
        assert_eq!(
            scan.per_timeframe[&Timeframe::H4],
            TimeframeOutcome::NoSignal(Rejection::AtrUnavailable)
        );
        assert!(matches!(scan.per_timeframe[&Timeframe::D1], TimeframeOutcome::Error(_)));
        assert_eq!(scan.agreement(), Agreement::Aligned(Direction::Long));

        let order: Vec<Timeframe> = scan.per_timeframe.keys().copied().collect();
        assert_eq!(order, vec![Timeframe::M15, Timeframe::H1, Timeframe::H4, Timeframe::D1]);
    }

    #[tokio::test]
    async fn test_agreement_classification() {
        let long = long_breakout_series(104.0);
        let short = mirror_series(&long, 200.0);
        let mock = MockMarketData::new()
            .with_ticker("MIXED", 100.0, 0.0)
            .with_candles("MIXED", Timeframe::H1, long.clone())
            .with_candles("MIXED", Timeframe::H4, short)
            .with_ticker("SINGLE", 100.0, 0.0)
            .with_candles("SINGLE", Timeframe::H1, long)
            .with_candles("SINGLE", Timeframe::H4, flat_series(100, 1.0))
            .with_ticker("QUIET", 100.0, 0.0)
            .with_default_candles("QUIET", flat_series(100, 1.0))
            .failing("GONE");
        let scanner = scanner(mock);

        let results = scanner
            .scan_all_multi(
                &symbols(&["MIXED", "SINGLE", "QUIET", "GONE"]),
                &[Timeframe::H1, Timeframe::H4],
            )
            .await;

        let agreement = |i: usize| results[i].outcome.as_ref().unwrap().agreement();
        assert_eq!(agreement(0), Agreement::Divergent);
        assert_eq!(agreement(1), Agreement::Divergent);
        assert_eq!(agreement(2), Agreement::NoSignals);
        assert!(results[3].outcome.is_err());

        let metrics = scanner.metrics().snapshot();
        assert_eq!(metrics.signals_generated, 3);
        assert_eq!(metrics.provider_errors, 1);
    }
}
