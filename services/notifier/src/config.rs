//! Notifier service configuration

use ::config::service::notifier::{
    DEFAULT_SCAN_INTERVAL_SECS, DEFAULT_UTC_OFFSET_HOURS, POLL_TIMEOUT_SECS, TELEGRAM_BASE_URL,
};
use ::config::{expand_env, load_config};
use anyhow::{bail, Context, Result};
use bingx_adapter::BingxConfig;
use chrono::FixedOffset;
use order_block_strategy::{ScanConfig, SignalConfig};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelegramConfig {
    /// Bot token, `${VAR}` references are expanded at load time
    pub bot_token: String,
    pub base_url: String,
    pub poll_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: "${TELEGRAM_BOT_TOKEN}".to_string(),
            base_url: TELEGRAM_BASE_URL.to_string(),
            poll_timeout_secs: POLL_TIMEOUT_SECS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotifierConfig {
    /// Fallback filter when `RUST_LOG` is unset
    pub log_level: String,
    pub scan_interval_secs: u64,
    /// Offset used for report timestamps
    pub utc_offset_hours: i32,
    pub scan: ScanConfig,
    pub signal: SignalConfig,
    pub exchange: BingxConfig,
    pub telegram: TelegramConfig,
}

impl Default for NotifierConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            scan_interval_secs: DEFAULT_SCAN_INTERVAL_SECS,
            utc_offset_hours: DEFAULT_UTC_OFFSET_HOURS,
            scan: ScanConfig::default(),
            signal: SignalConfig::default(),
            exchange: BingxConfig::default(),
            telegram: TelegramConfig::default(),
        }
    }
}

impl NotifierConfig {
    /// Load, expand secrets and validate
    pub fn load(path: &Path, environment: Option<&str>) -> Result<Self> {
        let mut config: Self = load_config(path, environment)?;
        config.telegram.bot_token = expand_env(&config.telegram.bot_token)
            .context("Failed to expand telegram.bot_token")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.scan_interval_secs == 0 {
            bail!("scan_interval_secs must be positive");
        }
        if self.utc_offset().is_none() {
            bail!("utc_offset_hours out of range: {}", self.utc_offset_hours);
        }
        if self.telegram.bot_token.trim().is_empty() {
            bail!("telegram.bot_token is empty");
        }
        url::Url::parse(&self.telegram.base_url).context("Invalid telegram.base_url")?;

        self.scan.validate().context("Invalid [scan] section")?;
        self.signal.validate().context("Invalid [signal] section")?;
        self.exchange.validate().context("Invalid [exchange] section")?;
        Ok(())
    }

    pub fn utc_offset(&self) -> Option<FixedOffset> {
        if !(-12..=14).contains(&self.utc_offset_hours) {
            return None;
        }
        FixedOffset::east_opt(self.utc_offset_hours * 3600)
    }

    pub fn scan_interval(&self) -> Duration {
        Duration::from_secs(self.scan_interval_secs)
    }
}
