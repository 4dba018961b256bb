//! Command routing and scheduled scans
//!
//! One task owns the scanner, the messenger and the subscriber store. The
//! loop takes one event at a time (a scan tick or a batch of chat updates)
//! and finishes handling it before taking the next, so a scheduled scan never
//! overlaps a command.

use crate::commands::Command;
use crate::config::NotifierConfig;
use crate::presentation::{self, StatusView};
use crate::subscribers::SubscriberStore;
use crate::telegram::{Messenger, Update};
use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use order_block_strategy::{ScanConfig, ScanResult, Scanner};
use std::future::Future;
use std::time::Duration;
use strategy_shared::{MarketDataProvider, ProviderError};
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// Back-off after a failed long poll
const POLL_RETRY_DELAY: Duration = Duration::from_secs(5);

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub scan: ScanConfig,
    /// Shown by `/status`
    pub market: String,
    pub scan_interval: Duration,
    pub utc_offset: FixedOffset,
}

impl ServiceSettings {
    pub fn from_config(config: &NotifierConfig) -> anyhow::Result<Self> {
        Ok(Self {
            scan: config.scan.clone(),
            market: config.exchange.market.to_string(),
            scan_interval: config.scan_interval(),
            utc_offset: config
                .utc_offset()
                .context("utc_offset_hours out of range")?,
        })
    }
}

pub struct NotifierService<P, M> {
    scanner: Scanner<P>,
    messenger: M,
    subscribers: SubscriberStore,
    settings: ServiceSettings,
}

/// The error shared by every row, when no symbol could be scanned
fn total_failure<T>(rows: &[ScanResult<T>]) -> Option<&ProviderError> {
    let mut last = None;
    for row in rows {
        match &row.outcome {
            Ok(_) => return None,
            Err(e) => last = Some(e),
        }
    }
    last
}

impl<P: MarketDataProvider, M: Messenger> NotifierService<P, M> {
    pub fn new(scanner: Scanner<P>, messenger: M, settings: ServiceSettings) -> Self {
        Self {
            scanner,
            messenger,
            subscribers: SubscriberStore::new(),
            settings,
        }
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    pub fn subscribers(&self) -> &SubscriberStore {
        &self.subscribers
    }

    fn now(&self) -> DateTime<FixedOffset> {
        Utc::now().with_timezone(&self.settings.utc_offset)
    }

    /// Reply text for `command` sent from `chat_id`
    pub async fn reply(&mut self, chat_id: i64, command: Command) -> String {
        let scan = &self.settings.scan;
        match command {
            Command::Signal | Command::SignalHtf => {
                let timeframes = if command == Command::Signal {
                    &scan.timeframes
                } else {
                    &scan.htf_timeframes
                };
                let rows = self.scanner.scan_all(&scan.symbols, timeframes).await;
                match total_failure(&rows) {
                    Some(e) => presentation::failure_reply(command, &e.to_string()),
                    None => presentation::signal_report(&rows, self.now()),
                }
            }
            Command::Summary => {
                let rows = self
                    .scanner
                    .scan_all_multi(&scan.symbols, &scan.summary_timeframes)
                    .await;
                match total_failure(&rows) {
                    Some(e) => presentation::failure_reply(command, &e.to_string()),
                    None => presentation::summary_report(&rows, self.now()),
                }
            }
            Command::AutoOn => {
                if self.subscribers.subscribe(chat_id) {
                    info!(chat_id, subscribers = self.subscribers.len(), "Chat subscribed");
                }
                presentation::auto_on_reply(self.settings.scan_interval)
            }
            Command::AutoOff => {
                if self.subscribers.unsubscribe(chat_id) {
                    info!(chat_id, subscribers = self.subscribers.len(), "Chat unsubscribed");
                }
                presentation::AUTO_OFF_REPLY.to_string()
            }
            Command::Status => {
                let metrics = self.scanner.metrics();
                let view = StatusView {
                    market: self.settings.market.clone(),
                    timeframes: &scan.timeframes,
                    htf_timeframes: &scan.htf_timeframes,
                    summary_timeframes: &scan.summary_timeframes,
                    subscribers: self.subscribers.len(),
                    scan_interval: self.settings.scan_interval,
                    metrics: metrics.snapshot(),
                    uptime: metrics.uptime(),
                };
                presentation::status_report(&view, self.now())
            }
            Command::Market | Command::Limit => presentation::ORDER_PLACEMENT_DISABLED.to_string(),
        }
    }

    /// Answer a command message; anything else is dropped
    pub async fn handle_update(&mut self, update: Update) {
        let Some(message) = update.message else {
            return;
        };
        let Some(command) = message.text.as_deref().and_then(Command::parse) else {
            return;
        };
        let chat_id = message.chat.id;

        info!(chat_id, command = %command, "Command received");
        let reply = self.reply(chat_id, command).await;
        if let Err(e) = self.messenger.send_message(chat_id, &reply).await {
            warn!(chat_id, command = %command, "Reply failed: {}", e);
        }
    }

    /// Push new signals to every subscriber, returns the number of deliveries
    pub async fn scheduled_scan(&self) -> usize {
        if self.subscribers.is_empty() {
            debug!("No subscribers, skipping scheduled scan");
            return 0;
        }

        let scan = &self.settings.scan;
        let rows = self.scanner.scan_all(&scan.symbols, &scan.timeframes).await;
        if let Some(e) = total_failure(&rows) {
            warn!("Scheduled scan failed: {}", e);
            return 0;
        }
        let Some(report) = presentation::hits_report(&rows, self.now()) else {
            debug!("Scheduled scan found no signals");
            return 0;
        };

        let mut delivered = 0;
        for chat_id in self.subscribers.iter() {
            match self.messenger.send_message(chat_id, &report).await {
                Ok(()) => delivered += 1,
                Err(e) => warn!(chat_id, "Push failed: {}", e),
            }
        }
        info!(
            delivered,
            subscribers = self.subscribers.len(),
            "Pushed scheduled signals"
        );
        delivered
    }

    /// Serve commands and scheduled scans until `shutdown` resolves
    pub async fn run<S: Future<Output = ()>>(&mut self, shutdown: S) {
        let period = self.settings.scan_interval;
        let mut ticker = interval_at(Instant::now() + period, period);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

        tokio::pin!(shutdown);
        let mut offset: Option<i64> = None;

        info!(
            interval_secs = period.as_secs(),
            symbols = self.settings.scan.symbols.len(),
            "Notifier running"
        );

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    info!("Shutdown requested");
                    break;
                }
                _ = ticker.tick() => {
                    self.scheduled_scan().await;
                }
                updates = self.messenger.get_updates(offset) => match updates {
                    Ok(updates) => {
                        for update in updates {
                            offset = Some(update.update_id + 1);
                            self.handle_update(update).await;
                        }
                    }
                    Err(e) => {
                        warn!("Polling failed: {}", e);
                        tokio::time::sleep(POLL_RETRY_DELAY).await;
                    }
                },
            }
        }
    }
}
