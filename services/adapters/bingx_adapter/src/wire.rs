//! BingX response payloads
//!
//! The swap and spot APIs disagree on shapes: numbers arrive as JSON numbers
//! or strings (percentages sometimes with a trailing `%`), tickers as one
//! object or a list, and klines as objects or positional rows.

use crate::error::{AdapterError, Result};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use types::{Candle, Ticker};

/// Common `{code, msg, data}` wrapper
///
/// `data` stays untyped until the code is checked; error responses carry
/// placeholder payloads that match no schema.
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(default)]
    pub code: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub data: Option<serde_json::Value>,
}

impl Envelope {
    pub fn into_data<T: DeserializeOwned>(self) -> Result<T> {
        if self.code != 0 {
            return Err(AdapterError::Api {
                code: self.code,
                message: self.msg,
            });
        }
        let data = self
            .data
            .ok_or_else(|| AdapterError::parse("response has no data"))?;
        serde_json::from_value(data).map_err(|e| AdapterError::parse(e.to_string()))
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub(crate) enum Number {
    Float(f64),
    Text(String),
}

impl Number {
    pub fn value(&self) -> Result<f64> {
        let value = match self {
            Number::Float(v) => *v,
            Number::Text(s) => s
                .trim()
                .trim_end_matches('%')
                .parse::<f64>()
                .map_err(|e| AdapterError::parse(format!("invalid number {:?}: {}", s, e)))?,
        };
        if value.is_finite() {
            Ok(value)
        } else {
            Err(AdapterError::parse("non-finite number"))
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawTicker {
    #[serde(rename = "lastPrice")]
    pub last_price: Number,
    #[serde(rename = "priceChangePercent", default)]
    pub price_change_percent: Option<Number>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum TickerData {
    One(RawTicker),
    Many(Vec<RawTicker>),
}

impl TickerData {
    /// Ticker reported under the resolved `symbol`
    pub fn into_ticker(self, symbol: &str) -> Result<Ticker> {
        let raw = match self {
            TickerData::One(raw) => raw,
            TickerData::Many(list) => list
                .into_iter()
                .next()
                .ok_or_else(|| AdapterError::parse("empty ticker list"))?,
        };
        let percent_change = match &raw.price_change_percent {
            Some(pct) => pct.value().ok(),
            None => None,
        };
        Ok(Ticker {
            symbol: symbol.to_string(),
            last_price: raw.last_price.value()?,
            percent_change,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct KlineObject {
    #[serde(alias = "openTime")]
    pub time: Number,
    pub open: Number,
    pub high: Number,
    pub low: Number,
    pub close: Number,
    #[serde(default)]
    pub volume: Option<Number>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawKline {
    /// `[openTime, open, high, low, close, volume, ...]`
    Row(Vec<Number>),
    Object(KlineObject),
}

impl RawKline {
    pub fn into_candle(self) -> Result<Candle> {
        match self {
            RawKline::Row(fields) => {
                if fields.len() < 5 {
                    return Err(AdapterError::parse(format!(
                        "kline row has {} fields",
                        fields.len()
                    )));
                }
                let volume = match fields.get(5) {
                    Some(v) => v.value()?,
                    None => 0.0,
                };
                Ok(Candle::new(
                    fields[0].value()? as i64,
                    fields[1].value()?,
                    fields[2].value()?,
                    fields[3].value()?,
                    fields[4].value()?,
                    volume,
                ))
            }
            RawKline::Object(k) => Ok(Candle::new(
                k.time.value()? as i64,
                k.open.value()?,
                k.high.value()?,
                k.low.value()?,
                k.close.value()?,
                match &k.volume {
                    Some(v) => v.value()?,
                    None => 0.0,
                },
            )),
        }
    }
}

/// Oldest first, at most `limit` of the most recent
pub(crate) fn into_candles(raw: Vec<RawKline>, limit: usize) -> Result<Vec<Candle>> {
    let mut candles = raw
        .into_iter()
        .map(RawKline::into_candle)
        .collect::<Result<Vec<_>>>()?;
    candles.sort_by_key(|c| c.open_time);
    candles.dedup_by_key(|c| c.open_time);
    let skip = candles.len().saturating_sub(limit);
    candles.drain(..skip);
    Ok(candles)
}
