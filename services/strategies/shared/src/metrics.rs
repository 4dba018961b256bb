//! Scan metrics collection

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Thread-safe counters for scan activity
#[derive(Debug)]
pub struct ScanMetrics {
    start_time: Instant,
    scans_run: AtomicU64,
    symbols_scanned: AtomicU64,
    signals_generated: AtomicU64,
    provider_errors: AtomicU64,
}

/// Point-in-time copy of [`ScanMetrics`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanMetricsSnapshot {
    pub scans_run: u64,
    pub symbols_scanned: u64,
    pub signals_generated: u64,
    pub provider_errors: u64,
}

impl ScanMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            scans_run: AtomicU64::new(0),
            symbols_scanned: AtomicU64::new(0),
            signals_generated: AtomicU64::new(0),
            provider_errors: AtomicU64::new(0),
        }
    }

    pub fn increment_scans(&self) {
        self.scans_run.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_symbols(&self) {
        self.symbols_scanned.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_signals(&self) {
        self.signals_generated.fetch_add(1, Ordering::Relaxed);
    }

    pub fn increment_errors(&self) {
        self.provider_errors.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ScanMetricsSnapshot {
        ScanMetricsSnapshot {
            scans_run: self.scans_run.load(Ordering::Relaxed),
            symbols_scanned: self.symbols_scanned.load(Ordering::Relaxed),
            signals_generated: self.signals_generated.load(Ordering::Relaxed),
            provider_errors: self.provider_errors.load(Ordering::Relaxed),
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}
