//! Configuration for the BingX adapter

use crate::error::{AdapterError, Result};
use ::config::service::adapters::{BINGX_BASE_URL, DEFAULT_RATE_LIMIT_RPS, REQUEST_TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which BingX product line answers first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MarketType {
    /// USDT-margined perpetual swaps
    #[default]
    Swap,
    Spot,
}

impl fmt::Display for MarketType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketType::Swap => write!(f, "swap"),
            MarketType::Spot => write!(f, "spot"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BingxConfig {
    pub base_url: String,
    pub market: MarketType,
    /// Requests per second across all endpoints
    pub requests_per_second: u32,
    pub timeout_ms: u64,
}

impl Default for BingxConfig {
    fn default() -> Self {
        Self {
            base_url: BINGX_BASE_URL.to_string(),
            market: MarketType::Swap,
            requests_per_second: DEFAULT_RATE_LIMIT_RPS,
            timeout_ms: REQUEST_TIMEOUT_MS,
        }
    }
}

impl BingxConfig {
    pub fn validate(&self) -> Result<()> {
        url::Url::parse(&self.base_url)?;
        if self.requests_per_second == 0 {
            return Err(AdapterError::Configuration(
                "requests_per_second must be at least 1".to_string(),
            ));
        }
        if self.timeout_ms == 0 {
            return Err(AdapterError::Configuration(
                "timeout_ms must be positive".to_string(),
            ));
        }
        Ok(())
    }
}
