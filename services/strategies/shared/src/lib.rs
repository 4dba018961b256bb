//! Shared Strategy Framework
//!
//! Market data seam, scan metrics and test fixtures shared by the scanner
//! strategy, its adapters and the notifier service.

pub mod metrics;
pub mod testing;
pub mod traits;

pub use metrics::*;
pub use traits::*;
