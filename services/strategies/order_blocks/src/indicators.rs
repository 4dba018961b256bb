//! Technical indicators for signal generation
//!
//! Pure functions over an oldest-first candle slice. Each returns `None` when
//! the series is too short or the result is undefined.

use types::Candle;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwingKind {
    High,
    Low,
}

/// A local extremum confirmed by `lookback` bars on both sides
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwingPoint {
    pub index: usize,
    pub price: f64,
    pub kind: SwingKind,
}

/// Average True Range over the most recent `period` bars.
///
/// Needs `period + 1` candles so that every averaged bar has a previous close.
pub fn atr(candles: &[Candle], period: usize) -> Option<f64> {
    if period == 0 || candles.len() < period + 1 {
        return None;
    }

    let recent = &candles[candles.len() - period - 1..];
    let total: f64 = recent
        .windows(2)
        .map(|pair| pair[1].true_range(pair[0].close))
        .sum();

    Some(total / period as f64)
}

/// Most recent confirmed swing high
pub fn swing_high(candles: &[Candle], lookback: usize) -> Option<SwingPoint> {
    find_swing(candles, lookback, SwingKind::High)
}

/// Most recent confirmed swing low
pub fn swing_low(candles: &[Candle], lookback: usize) -> Option<SwingPoint> {
    find_swing(candles, lookback, SwingKind::Low)
}

/// Scan backward for the nearest bar whose high (low) is strictly above
/// (below) every neighbour within `lookback` bars on both sides.
///
/// The last bar never takes part in confirmation: it is the bar being tested
/// for a break, so candidates end at `len - lookback - 2`. Ties disqualify.
fn find_swing(candles: &[Candle], lookback: usize, kind: SwingKind) -> Option<SwingPoint> {
    let len = candles.len();
    if len < 2 * lookback + 2 {
        return None;
    }

    let price_of = |c: &Candle| match kind {
        SwingKind::High => c.high,
        SwingKind::Low => c.low,
    };
    let beats = |candidate: f64, neighbour: f64| match kind {
        SwingKind::High => candidate > neighbour,
        SwingKind::Low => candidate < neighbour,
    };

    (lookback..=len - lookback - 2).rev().find_map(|i| {
        let price = price_of(&candles[i]);
        let confirmed = (1..=lookback).all(|k| {
            beats(price, price_of(&candles[i - k])) && beats(price, price_of(&candles[i + k]))
        });

        confirmed.then_some(SwingPoint {
            index: i,
            price,
            kind,
        })
    })
}

/// Trend signal-to-noise ratio of the last `length` closes.
///
/// Fits `close = a + b * i` by least squares and returns `|b|` divided by the
/// residual standard deviation (`length - 2` degrees of freedom, at least 1).
/// Constant or perfectly degenerate windows yield `None`.
pub fn snr(candles: &[Candle], length: usize) -> Option<f64> {
    if length < 2 || candles.len() < length {
        return None;
    }

    let closes: Vec<f64> = candles[candles.len() - length..]
        .iter()
        .map(|c| c.close)
        .collect();
    let n = length as f64;
    let mean_x = (n - 1.0) / 2.0;
    let mean_y = closes.iter().sum::<f64>() / n;

    let (sxx, sxy) = closes
        .iter()
        .enumerate()
        .fold((0.0, 0.0), |(sxx, sxy), (i, y)| {
            let dx = i as f64 - mean_x;
            (sxx + dx * dx, sxy + dx * (y - mean_y))
        });
    if sxx == 0.0 || !sxx.is_finite() {
        return None;
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let ssr: f64 = closes
        .iter()
        .enumerate()
        .map(|(i, y)| {
            let residual = y - (intercept + slope * i as f64);
            residual * residual
        })
        .sum();

    let dof = length.saturating_sub(2).max(1) as f64;
    let resid_sd = (ssr / dof).sqrt();
    if !resid_sd.is_finite() || resid_sd <= 0.0 {
        return None;
    }

    let ratio = slope.abs() / resid_sd;
    ratio.is_finite().then_some(ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategy_shared::testing::{candle, flat_series};

    /// Quiet bars with one spike at `peak` and one dip at `trough`
    fn series_with_extremes(len: usize, peak: usize, trough: usize) -> Vec<Candle> {
        (0..len)
            .map(|i| match i {
                _ if i == peak => candle(i, 100.0, 105.0, 99.0, 100.0),
                _ if i == trough => candle(i, 100.0, 101.0, 95.0, 100.0),
                _ => candle(i, 100.0, 101.0, 99.0, 100.0),
            })
            .collect()
    }

    #[test]
    fn test_atr_requires_period_plus_one() {
        let series = flat_series(14, 100.0);
        assert_eq!(atr(&series, 14), None);

        let series = flat_series(15, 100.0);
        assert_eq!(atr(&series, 14), Some(0.0));
        assert_eq!(atr(&series, 0), None);
    }

    #[test]
    fn test_atr_averages_last_period_true_ranges() {
        let series = vec![
            candle(0, 10.0, 11.0, 9.0, 10.0),  // ignored
            candle(1, 10.0, 12.0, 10.0, 11.0), // TR 2
            candle(2, 11.0, 11.5, 10.5, 11.0), // TR 1
            candle(3, 14.0, 15.0, 14.0, 14.5), // gap: 15 - 11 = 4
        ];
        assert_eq!(atr(&series, 3), Some(7.0 / 3.0));
        // only the last two bars
        assert_eq!(atr(&series, 2), Some(2.5));
    }

    #[test]
    fn test_swing_high_needs_both_sides() {
        let series = series_with_extremes(30, 12, 20);
        let high = swing_high(&series, 5).unwrap();
        assert_eq!(high.index, 12);
        assert_eq!(high.price, 105.0);
        assert_eq!(high.kind, SwingKind::High);

        let low = swing_low(&series, 5).unwrap();
        assert_eq!(low.index, 20);
        assert_eq!(low.price, 95.0);
    }

    #[test]
    fn test_swing_ignores_unconfirmed_recent_bars() {
        // peak at 25 in a 30-bar series: only 4 bars to its right
        let series = series_with_extremes(30, 25, 3);
        assert_eq!(swing_high(&series, 5), None);
        // a trough at 3 lacks 5 bars on its left
        assert_eq!(swing_low(&series, 5), None);
    }

    #[test]
    fn test_swing_excludes_last_bar_from_confirmation() {
        // candidate at len - lookback - 1 would need the last bar on its right
        let series = series_with_extremes(12, 6, 0);
        assert_eq!(swing_high(&series, 5), None);

        let series = series_with_extremes(12, 5, 0);
        assert_eq!(swing_high(&series, 5).map(|s| s.index), Some(5));
    }

    #[test]
    fn test_plateau_is_not_a_swing() {
        let mut series = series_with_extremes(30, 12, 99);
        series[13] = candle(13, 100.0, 105.0, 99.0, 100.0);
        assert_eq!(swing_high(&series, 5), None);

        assert_eq!(swing_low(&flat_series(40, 100.0), 3), None);
    }

    #[test]
    fn test_swing_returns_most_recent() {
        let mut series = series_with_extremes(40, 10, 99);
        series[25] = candle(25, 100.0, 103.0, 99.0, 100.0);
        assert_eq!(swing_high(&series, 5).map(|s| s.index), Some(25));
    }

    #[test]
    fn test_snr_undefined_for_constant_series() {
        assert_eq!(snr(&flat_series(60, 42.0), 50), None);
    }

    #[test]
    fn test_snr_undefined_for_short_series() {
        let series: Vec<Candle> = (0..20)
            .map(|i| candle(i, 100.0, 101.0, 99.0, 100.0 + (i % 3) as f64))
            .collect();
        assert_eq!(snr(&series, 21), None);
        assert!(snr(&series, 20).is_some());
    }

    #[test]
    fn test_snr_prefers_clean_trends() {
        let noise = [0.0, 0.6, -0.4, 0.3, -0.5, 0.2];
        let clean: Vec<Candle> = (0..50)
            .map(|i| {
                let close = 100.0 + i as f64 + noise[i % noise.len()] * 0.1;
                candle(i, close, close + 0.5, close - 0.5, close)
            })
            .collect();
        let choppy: Vec<Candle> = (0..50)
            .map(|i| {
                let close = 100.0 + i as f64 * 0.1 + noise[i % noise.len()] * 5.0;
                candle(i, close, close + 0.5, close - 0.5, close)
            })
            .collect();

        let clean_snr = snr(&clean, 50).unwrap();
        let choppy_snr = snr(&choppy, 50).unwrap();
        assert!(clean_snr > choppy_snr);
        assert!(choppy_snr > 0.0);
    }

    #[test]
    fn test_snr_zero_slope_is_defined() {
        let series: Vec<Candle> = (0..10)
            .map(|i| {
                let close = if i % 2 == 0 { 100.0 } else { 101.0 };
                candle(i, close, close, close, close)
            })
            .collect();
        // symmetric oscillation: slope near zero, noise non-zero
        let value = snr(&series[..9], 9).unwrap();
        assert!(value < 0.1);
    }
}
