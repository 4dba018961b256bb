//! Plain-text chat reports
//!
//! Prices are shown with 4 decimals and percent changes with 2. Every report
//! carries a timestamp in the configured UTC offset.

use crate::commands::Command;
use chrono::{DateTime, FixedOffset};
use order_block_strategy::{
    Agreement, Direction, MultiTimeframeScan, ScanResult, Signal, SymbolScan, TimeframeOutcome,
};
use std::time::Duration;
use strategy_shared::ScanMetricsSnapshot;
use types::Timeframe;

pub const ORDER_PLACEMENT_DISABLED: &str =
    "Order placement is disabled (signals and quotes only).";

pub fn timestamp(now: DateTime<FixedOffset>) -> String {
    format!("{} (UTC{})", now.format("%Y-%m-%d %H:%M"), now.format("%:z"))
}

fn price(value: f64) -> String {
    format!("{:.4}", value)
}

fn percent(value: Option<f64>) -> String {
    format!("{:.2}%", value.unwrap_or(0.0))
}

fn icon(direction: Direction) -> &'static str {
    match direction {
        Direction::Long => "🟢",
        Direction::Short => "🔴",
    }
}

fn targets(signal: &Signal) -> String {
    signal
        .targets
        .iter()
        .enumerate()
        .map(|(i, target)| format!("TP{} {}", i + 1, price(*target)))
        .collect::<Vec<_>>()
        .join(" / ")
}

fn levels(lines: &mut Vec<String>, signal: &Signal) {
    lines.push(format!(
        "OB range: {} ~ {}",
        price(signal.order_block_low),
        price(signal.order_block_high)
    ));
    lines.push(format!(
        "Entry: {} | Stop: {}",
        price(signal.entry),
        price(signal.stop)
    ));
    lines.push(format!("Targets: {}", targets(signal)));
}

fn join(lines: Vec<String>) -> String {
    lines.join("\n").trim().to_string()
}

/// Quote and first-match outcome for every symbol
pub fn signal_report(rows: &[ScanResult<SymbolScan>], now: DateTime<FixedOffset>) -> String {
    let mut lines = vec![
        "Quotes and order-block entries (close inside OB only)".to_string(),
        format!("Generated: {}", timestamp(now)),
        String::new(),
    ];

    for row in rows {
        match &row.outcome {
            Err(e) => {
                lines.push(row.symbol.clone());
                lines.push(format!("Error: {}", e));
            }
            Ok(scan) => {
                lines.push(scan.symbol.clone());
                lines.push(format!("Price: {}", price(scan.price)));
                lines.push(format!("Change: {}", percent(scan.percent_change)));
                match &scan.signal {
                    Some(signal) => {
                        let icon = icon(signal.direction);
                        lines.push(format!("{} {} ({})", icon, signal.direction, signal.timeframe));
                        levels(&mut lines, signal);
                    }
                    None => lines.push("Signal: none".to_string()),
                }
            }
        }
        lines.push(String::new());
    }

    join(lines)
}

/// Only the symbols with a signal; `None` when there are none
pub fn hits_report(rows: &[ScanResult<SymbolScan>], now: DateTime<FixedOffset>) -> Option<String> {
    let hits: Vec<(&SymbolScan, &Signal)> = rows
        .iter()
        .filter_map(|row| {
            let scan = row.outcome.as_ref().ok()?;
            Some((scan, scan.signal.as_ref()?))
        })
        .collect();
    if hits.is_empty() {
        return None;
    }

    let mut lines = vec![
        "Order-block entry signals (close inside OB only)".to_string(),
        format!("Signal time: {}", timestamp(now)),
        String::new(),
    ];
    for (scan, signal) in hits {
        let icon = icon(signal.direction);
        lines.push(format!("{} {}", icon, scan.symbol));
        lines.push(format!(
            "Direction: {} {} ({})",
            icon, signal.direction, signal.timeframe
        ));
        levels(&mut lines, signal);
        lines.push(String::new());
    }

    Some(join(lines))
}

/// Symbols grouped into aligned and divergent sections
pub fn summary_report(
    rows: &[ScanResult<MultiTimeframeScan>],
    now: DateTime<FixedOffset>,
) -> String {
    let mut aligned = Vec::new();
    let mut divergent = Vec::new();

    for row in rows {
        let mut block = Vec::new();
        let is_aligned = match &row.outcome {
            Err(e) => {
                block.push(row.symbol.clone());
                block.push(format!("Reason: {}", e));
                false
            }
            Ok(scan) => match scan.agreement() {
                Agreement::Aligned(direction) => {
                    block.push(scan.symbol.clone());
                    block.push(quote_line(scan));
                    block.push(format!("Direction: {} {}", icon(direction), direction));
                    for signal in scan.signals() {
                        block.push(format!("- {}", signal.timeframe));
                        levels(&mut block, signal);
                    }
                    true
                }
                Agreement::NoSignals => {
                    block.push(scan.symbol.clone());
                    block.push("Reason: no signal on any timeframe".to_string());
                    false
                }
                Agreement::Divergent => {
                    block.push(scan.symbol.clone());
                    block.push(quote_line(scan));
                    block.push(format!("Directions: {}", direction_map(scan)));
                    false
                }
            },
        };
        block.push(String::new());

        if is_aligned {
            aligned.extend(block);
        } else {
            divergent.extend(block);
        }
    }

    let mut lines = vec![
        "Multi-timeframe order-block summary (close inside OB only)".to_string(),
        format!("Generated: {}", timestamp(now)),
        String::new(),
    ];
    if !aligned.is_empty() {
        lines.push("Aligned (every signalling timeframe agrees)".to_string());
        lines.push(String::new());
        lines.extend(aligned);
    }
    if !divergent.is_empty() {
        lines.push("Divergent or missing signals".to_string());
        lines.push(String::new());
        lines.extend(divergent);
    }
    join(lines)
}

fn quote_line(scan: &MultiTimeframeScan) -> String {
    format!(
        "Price: {} | Change: {}",
        price(scan.price),
        percent(scan.percent_change)
    )
}

fn direction_map(scan: &MultiTimeframeScan) -> String {
    scan.per_timeframe
        .iter()
        .map(|(timeframe, outcome)| match outcome {
            TimeframeOutcome::Signal(signal) => {
                format!("{}={}{}", timeframe, icon(signal.direction), signal.direction)
            }
            TimeframeOutcome::NoSignal(_) => format!("{}=none", timeframe),
            TimeframeOutcome::Error(_) => format!("{}=error", timeframe),
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Inputs of the `/status` reply
#[derive(Debug, Clone)]
pub struct StatusView<'a> {
    pub market: String,
    pub timeframes: &'a [Timeframe],
    pub htf_timeframes: &'a [Timeframe],
    pub summary_timeframes: &'a [Timeframe],
    pub subscribers: usize,
    pub scan_interval: Duration,
    pub metrics: ScanMetricsSnapshot,
    pub uptime: Duration,
}

fn timeframe_list(timeframes: &[Timeframe]) -> String {
    timeframes
        .iter()
        .map(Timeframe::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

pub fn status_report(view: &StatusView<'_>, now: DateTime<FixedOffset>) -> String {
    let uptime = view.uptime.as_secs();
    join(vec![
        format!("Mode: signals only | Market: {}", view.market),
        format!("Timeframes: {}", timeframe_list(view.timeframes)),
        format!("HTF timeframes: {}", timeframe_list(view.htf_timeframes)),
        format!("Summary timeframes: {}", timeframe_list(view.summary_timeframes)),
        format!(
            "Subscribed chats: {} (every {})",
            view.subscribers,
            interval(view.scan_interval)
        ),
        format!(
            "Scans: {} | Symbols: {} | Signals: {} | Errors: {}",
            view.metrics.scans_run,
            view.metrics.symbols_scanned,
            view.metrics.signals_generated,
            view.metrics.provider_errors
        ),
        format!("Uptime: {}h {:02}m", uptime / 3600, uptime % 3600 / 60),
        format!("Time: {}", timestamp(now)),
    ])
}

/// "3 min", or seconds when not a whole number of minutes
pub fn interval(period: Duration) -> String {
    let secs = period.as_secs();
    if secs >= 60 && secs % 60 == 0 {
        format!("{} min", secs / 60)
    } else {
        format!("{} s", secs)
    }
}

pub fn auto_on_reply(period: Duration) -> String {
    format!("Auto scan enabled (every {})", interval(period))
}

pub const AUTO_OFF_REPLY: &str = "Auto scan disabled";

pub fn failure_reply(command: Command, reason: &str) -> String {
    format!("{} failed: {}", command, reason)
}
