//! BingX REST client implementing [`MarketDataProvider`]

use crate::config::{BingxConfig, MarketType};
use crate::error::{AdapterError, Result};
use crate::rate_limit::RateLimiter;
use crate::symbols::{candidate_forms, SymbolForm};
use crate::wire::{into_candles, Envelope, RawKline, TickerData};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use std::time::Duration;
use strategy_shared::{MarketDataProvider, ProviderError};
use tracing::{debug, info};
use types::{Candle, Ticker, Timeframe};
use url::Url;

const SWAP_TICKER_PATH: &str = "/openApi/swap/v2/quote/ticker";
const SWAP_KLINES_PATH: &str = "/openApi/swap/v3/quote/klines";
const SPOT_TICKER_PATH: &str = "/openApi/spot/v1/ticker/24hr";
const SPOT_KLINES_PATH: &str = "/openApi/spot/v2/market/kline";

/// Largest page either kline endpoint serves
const MAX_KLINE_LIMIT: usize = 1440;

pub struct BingxClient {
    http: reqwest::Client,
    base_url: Url,
    market: MarketType,
    limiter: RateLimiter,
}

impl BingxClient {
    pub fn new(config: BingxConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .pool_idle_timeout(Duration::from_secs(90))
            .tcp_nodelay(true)
            .build()?;
        let base_url = Url::parse(&config.base_url)?;

        info!(
            base_url = %base_url,
            market = %config.market,
            rps = config.requests_per_second,
            "BingX client ready"
        );

        Ok(Self {
            http,
            base_url,
            market: config.market,
            limiter: RateLimiter::per_second(config.requests_per_second),
        })
    }

    /// Latest price of one concrete symbol form
    pub async fn fetch_ticker(&self, form: &SymbolForm) -> Result<Ticker> {
        let data: TickerData = match form.market {
            MarketType::Swap => {
                self.get(SWAP_TICKER_PATH, vec![("symbol", form.venue.clone())])
                    .await?
            }
            MarketType::Spot => {
                self.get(
                    SPOT_TICKER_PATH,
                    vec![("symbol", form.venue.clone()), timestamp()],
                )
                .await?
            }
        };
        data.into_ticker(&form.unified)
    }

    /// Most recent `limit` closed and forming candles, oldest first
    pub async fn fetch_klines(
        &self,
        form: &SymbolForm,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Candle>> {
        let mut query = vec![
            ("symbol", form.venue.clone()),
            ("interval", timeframe.as_str().to_string()),
            ("limit", limit.clamp(1, MAX_KLINE_LIMIT).to_string()),
        ];
        let path = match form.market {
            MarketType::Swap => SWAP_KLINES_PATH,
            MarketType::Spot => {
                query.push(timestamp());
                SPOT_KLINES_PATH
            }
        };

        let raw: Vec<RawKline> = self.get(path, query).await?;
        into_candles(raw, limit)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, query: Vec<(&str, String)>) -> Result<T> {
        self.limiter.wait().await;

        let url = self.base_url.join(path)?;
        debug!(url = %url, ?query, "GET");

        let envelope: Envelope = self
            .http
            .get(url)
            .query(&query)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        envelope.into_data()
    }
}

fn timestamp() -> (&'static str, String) {
    ("timestamp", chrono::Utc::now().timestamp_millis().to_string())
}

/// Reason for the last failed form, or a note that none was tried
fn failure_reason(last_error: Option<AdapterError>) -> String {
    last_error
        .map(|e| e.to_string())
        .unwrap_or_else(|| "no candidate symbol forms".to_string())
}

#[async_trait]
impl MarketDataProvider for BingxClient {
    fn name(&self) -> &'static str {
        "bingx"
    }

    async fn ticker(&self, symbol: &str) -> std::result::Result<Ticker, ProviderError> {
        let mut last_error = None;
        for form in candidate_forms(symbol, self.market) {
            match self.fetch_ticker(&form).await {
                Ok(ticker) => return Ok(ticker),
                Err(e) => {
                    debug!(symbol, form = %form.unified, "Ticker form rejected: {}", e);
                    last_error = Some(e);
                }
            }
        }
        Err(ProviderError::SymbolUnavailable {
            symbol: symbol.to_string(),
            reason: failure_reason(last_error),
        })
    }

    async fn candles(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> std::result::Result<Vec<Candle>, ProviderError> {
        let mut last_error = None;
        for form in candidate_forms(symbol, self.market) {
            match self.fetch_klines(&form, timeframe, limit).await {
                Ok(candles) => return Ok(candles),
                Err(e) => {
                    debug!(
                        symbol,
                        form = %form.unified,
                        timeframe = %timeframe,
                        "Kline form rejected: {}",
                        e
                    );
                    last_error = Some(e);
                }
            }
        }
        Err(ProviderError::DataUnavailable {
            symbol: symbol.to_string(),
            timeframe,
            reason: failure_reason(last_error),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    fn client(server: &Server, market: MarketType) -> BingxClient {
        BingxClient::new(BingxConfig {
            base_url: server.url(),
            market,
            requests_per_second: 1_000,
            timeout_ms: 2_000,
        })
        .unwrap()
    }

    fn symbol_query(venue: &str) -> Matcher {
        Matcher::UrlEncoded("symbol".into(), venue.into())
    }

    #[tokio::test]
    async fn test_swap_ticker_resolves_perpetual_form() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SWAP_TICKER_PATH)
            .match_query(symbol_query("BTC-USDT"))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{"code":0,"msg":"","data":{"symbol":"BTC-USDT","lastPrice":"65000.5","priceChangePercent":"1.25"}}"#,
            )
            .expect(1)
            .create_async()
            .await;

        let ticker = client(&server, MarketType::Swap)
            .ticker("BTC/USDT")
            .await
            .unwrap();

        assert_eq!(ticker.symbol, "BTC/USDT:USDT");
        assert_eq!(ticker.last_price, 65_000.5);
        assert_eq!(ticker.percent_change, Some(1.25));
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_ticker_falls_back_to_spot_form() {
        let mut server = Server::new_async().await;
        let swap = server
            .mock("GET", SWAP_TICKER_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":109400,"msg":"symbol not exist","data":{}}"#)
            .expect(1)
            .create_async()
            .await;
        let spot = server
            .mock("GET", SPOT_TICKER_PATH)
            .match_query(Matcher::AllOf(vec![
                symbol_query("ADA-USDT"),
                Matcher::Regex("timestamp=\\d+".into()),
            ]))
            .with_status(200)
            .with_body(r#"{"code":0,"data":[{"symbol":"ADA-USDT","lastPrice":0.4512,"priceChangePercent":"-2.5%"}]}"#)
            .expect(1)
            .create_async()
            .await;

        let ticker = client(&server, MarketType::Swap)
            .ticker("ADA/USDT")
            .await
            .unwrap();

        assert_eq!(ticker.symbol, "ADA/USDT");
        assert_eq!(ticker.last_price, 0.4512);
        assert_eq!(ticker.percent_change, Some(-2.5));
        swap.assert_async().await;
        spot.assert_async().await;
    }

    #[tokio::test]
    async fn test_ticker_unavailable_after_every_form_fails() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Any)
            .with_status(500)
            .expect(2)
            .create_async()
            .await;

        let err = client(&server, MarketType::Spot)
            .ticker("XYZ/USDT")
            .await
            .unwrap_err();

        match err {
            ProviderError::SymbolUnavailable { symbol, reason } => {
                assert_eq!(symbol, "XYZ/USDT");
                assert!(reason.contains("HTTP"), "unexpected reason: {}", reason);
            }
            other => panic!("expected SymbolUnavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_swap_klines_sorted_oldest_first() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", SWAP_KLINES_PATH)
            .match_query(Matcher::AllOf(vec![
                symbol_query("ETH-USDT"),
                Matcher::UrlEncoded("interval".into(), "4h".into()),
                Matcher::UrlEncoded("limit".into(), "2".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"code":0,"data":[
                    {"open":"3010","close":"3050","high":"3060","low":"3000","volume":"12.5","time":1700028800000},
                    {"open":"2990","close":"3010","high":"3020","low":"2980","volume":"9","time":1700014400000}
                ]}"#,
            )
            .create_async()
            .await;

        let candles = client(&server, MarketType::Swap)
            .candles("ETH/USDT", Timeframe::H4, 2)
            .await
            .unwrap();

        assert_eq!(candles.len(), 2);
        assert_eq!(candles[0].open_time, 1_700_014_400_000);
        assert_eq!(candles[1].close, 3050.0);
        assert_eq!(candles[1].volume, 12.5);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_spot_klines_rows() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", SPOT_KLINES_PATH)
            .match_query(Matcher::AllOf(vec![
                symbol_query("SOL-USDT"),
                Matcher::UrlEncoded("interval".into(), "1d".into()),
            ]))
            .with_status(200)
            .with_body(
                r#"{"code":0,"data":[[1700000000000,150.0,155.0,148.0,152.5,1000.0,1700086399999,152000.0]]}"#,
            )
            .create_async()
            .await;

        let candles = client(&server, MarketType::Spot)
            .candles("SOL/USDT", Timeframe::D1, 300)
            .await
            .unwrap();

        assert_eq!(candles, vec![Candle::new(1_700_000_000_000, 150.0, 155.0, 148.0, 152.5, 1000.0)]);
    }

    #[tokio::test]
    async fn test_kline_failure_reports_timeframe() {
        let mut server = Server::new_async().await;
        server
            .mock("GET", Matcher::Any)
            .with_status(200)
            .with_body(r#"{"code":100400,"msg":"invalid interval"}"#)
            .create_async()
            .await;

        let err = client(&server, MarketType::Swap)
            .candles("LINK/USDT", Timeframe::W1, 300)
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProviderError::DataUnavailable { timeframe: Timeframe::W1, ref reason, .. }
                if reason.contains("invalid interval")
        ));
    }
}
