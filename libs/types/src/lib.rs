//! # Market Data Types
//!
//! Value types shared by every crate in the scanner workspace.
//!
//! ## Design Philosophy
//!
//! - **Immutable Snapshots**: candles and tickers are plain values, fetched once per scan
//! - **Oldest First**: candle series are always ordered by ascending `open_time`
//! - **Typed Timeframes**: timeframe labels are parsed once at the configuration boundary
//!
//! ## Quick Start
//!
//! ```rust
//! use types::{Candle, Timeframe};
//!
//! let tf: Timeframe = "4h".parse().unwrap();
//! assert_eq!(tf.as_str(), "4h");
//!
//! let bar = Candle::new(0, 100.0, 101.0, 99.0, 100.5, 12.0);
//! assert!(bar.is_bullish());
//! ```

pub mod candle;
pub mod timeframe;

pub use candle::{Candle, PriceRange, Ticker};
pub use timeframe::{Timeframe, TimeframeParseError};
