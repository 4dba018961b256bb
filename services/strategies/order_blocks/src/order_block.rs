//! Order-block location
//!
//! The order block of a break is the last candle before it that moved against
//! the break: a bearish candle before an upward break, a bullish candle before
//! a downward one. The nearest such candle wins; there is no scoring.

use crate::config::OrderBlockSource;
use crate::signals::Direction;
use types::{Candle, PriceRange};

/// Bars searched before the break
pub const ORDER_BLOCK_LOOKBACK: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderBlock {
    pub low: f64,
    pub high: f64,
    /// Index of the source candle
    pub index: usize,
}

impl OrderBlock {
    pub fn range(&self) -> PriceRange {
        PriceRange {
            low: self.low,
            high: self.high,
        }
    }

    pub fn contains(&self, price: f64) -> bool {
        self.range().contains(price)
    }
}

/// Find the order block for a break at `break_index` in `direction`.
///
/// Searches `break_index - 1` back to `break_index - 50` (clamped at zero).
pub fn find_order_block(
    candles: &[Candle],
    break_index: usize,
    direction: Direction,
    source: OrderBlockSource,
) -> Option<OrderBlock> {
    let window_start = break_index.saturating_sub(ORDER_BLOCK_LOOKBACK);
    let window = candles.get(window_start..break_index)?;

    window
        .iter()
        .enumerate()
        .rev()
        .find(|(_, c)| match direction {
            Direction::Long => c.is_bearish(),
            Direction::Short => c.is_bullish(),
        })
        .map(|(offset, c)| {
            let range = match source {
                OrderBlockSource::Wick => c.wick_range(),
                OrderBlockSource::Body => c.body_range(),
            };
            OrderBlock {
                low: range.low,
                high: range.high,
                index: window_start + offset,
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use strategy_shared::testing::candle;

    fn bullish(i: usize) -> Candle {
        candle(i, 100.0, 102.0, 99.0, 101.0)
    }

    fn bearish(i: usize) -> Candle {
        candle(i, 101.0, 102.5, 98.5, 100.0)
    }

    #[test]
    fn test_nearest_opposite_candle_wins() {
        let mut series: Vec<Candle> = (0..10).map(bullish).collect();
        series[3] = bearish(3);
        series[6] = bearish(6);

        let block = find_order_block(&series, 9, Direction::Long, OrderBlockSource::Wick).unwrap();
        assert_eq!(block.index, 6);
        assert_eq!((block.low, block.high), (98.5, 102.5));
    }

    #[test]
    fn test_body_source_uses_open_close() {
        let mut series: Vec<Candle> = (0..10).map(bullish).collect();
        series[6] = bearish(6);

        let block = find_order_block(&series, 9, Direction::Long, OrderBlockSource::Body).unwrap();
        assert_eq!((block.low, block.high), (100.0, 101.0));
        assert!(block.contains(100.5));
        assert!(!block.contains(101.5));
    }

    #[test]
    fn test_short_break_looks_for_bullish_candle() {
        let mut series: Vec<Candle> = (0..10).map(bearish).collect();
        series[2] = bullish(2);

        let block = find_order_block(&series, 9, Direction::Short, OrderBlockSource::Wick).unwrap();
        assert_eq!(block.index, 2);
        assert_eq!(find_order_block(&series, 9, Direction::Long, OrderBlockSource::Wick).map(|b| b.index), Some(8));
    }

    #[test]
    fn test_break_candle_itself_is_excluded() {
        let mut series: Vec<Candle> = (0..10).map(bullish).collect();
        series[9] = bearish(9);
        assert_eq!(find_order_block(&series, 9, Direction::Long, OrderBlockSource::Wick), None);
    }

    #[test]
    fn test_window_is_fifty_bars() {
        let mut series: Vec<Candle> = (0..120).map(bullish).collect();
        series[49] = bearish(49);
        // 100 - 50 = 50 is the oldest bar searched
        assert_eq!(find_order_block(&series, 100, Direction::Long, OrderBlockSource::Wick), None);

        series[50] = bearish(50);
        assert_eq!(
            find_order_block(&series, 100, Direction::Long, OrderBlockSource::Wick).map(|b| b.index),
            Some(50)
        );
    }

    #[test]
    fn test_doji_is_not_opposite() {
        let mut series: Vec<Candle> = (0..5).map(bullish).collect();
        series[3] = candle(3, 100.0, 101.0, 99.0, 100.0);
        assert_eq!(find_order_block(&series, 4, Direction::Long, OrderBlockSource::Wick), None);
        assert_eq!(find_order_block(&series, 0, Direction::Long, OrderBlockSource::Wick), None);
        assert_eq!(find_order_block(&series, 40, Direction::Long, OrderBlockSource::Wick), None);
    }
}
