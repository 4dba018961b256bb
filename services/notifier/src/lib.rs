//! # Signal Notifier
//!
//! Telegram front end for the order-block scanner.
//!
//! ## Commands
//!
//! | Command | Action |
//! |---------|--------|
//! | `/signal` | first-match scan over the primary timeframes |
//! | `/signal_htf` | first-match scan over the higher timeframes |
//! | `/summary` | every timeframe of every symbol, grouped by agreement |
//! | `/auto_on`, `/auto_off` | join or leave the scheduled push |
//! | `/status` | market, timeframes, subscribers and scan counters |
//! | `/market`, `/limit` | refused, order placement is disabled |
//!
//! ## Architecture Role
//!
//! ```text
//! Telegram getUpdates ─┐
//!                      ├→ [NotifierService] → Scanner → BingX REST
//! Scan interval tick ──┘          ↓
//!                        presentation → sendMessage
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod presentation;
pub mod service;
pub mod subscribers;
pub mod telegram;

pub use crate::commands::Command;
pub use crate::config::{NotifierConfig, TelegramConfig};
pub use crate::error::{NotifierError, Result};
pub use crate::service::{NotifierService, ServiceSettings};
pub use crate::subscribers::SubscriberStore;
pub use crate::telegram::{Messenger, TelegramClient};
