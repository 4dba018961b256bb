//! Error types for the notifier service

use thiserror::Error;

pub type Result<T> = std::result::Result<T, NotifierError>;

#[derive(Debug, Error)]
pub enum NotifierError {
    #[error("HTTP request failed: {0}")]
    Http(reqwest::Error),

    /// `ok: false` answer from the Bot API
    #[error("Telegram API error: {0}")]
    Telegram(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

// Request URLs carry the bot token
impl From<reqwest::Error> for NotifierError {
    fn from(err: reqwest::Error) -> Self {
        NotifierError::Http(err.without_url())
    }
}
