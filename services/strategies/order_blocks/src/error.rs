//! Error types for the order-block strategy

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum StrategyError {
    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl StrategyError {
    pub(crate) fn config(message: impl Into<String>) -> Self {
        StrategyError::Configuration {
            message: message.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, StrategyError>;
