//! Entry-signal math shared by the strategies.
//!
//! Heuristic filters over a daily close series: moving-average trend check,
//! recent support/resistance, and two Fibonacci retracement levels forming
//! an entry floor. False negatives on empty or short history are the
//! intended conservative behavior.

use crate::market::PricePoint;

pub const MA_SHORT_PERIOD: usize = 20;
pub const MA_LONG_PERIOD: usize = 50;
pub const SWING_WINDOW: usize = 50;

/// Below this many history points no strategy produces a signal.
pub const MIN_HISTORY: usize = 20;

pub const TAKE_PROFIT_1_RATIO: f64 = 1.04;
pub const TAKE_PROFIT_2_RATIO: f64 = 1.10;
pub const STOP_LOSS_RATIO: f64 = 0.95;

/// Exit thresholds derived from an entry price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TradeTargets {
    pub take_profit_1: f64,
    pub take_profit_2: f64,
    pub stop_loss: f64,
}

impl TradeTargets {
    pub fn for_entry(entry_price: f64) -> Self {
        Self {
            take_profit_1: entry_price * TAKE_PROFIT_1_RATIO,
            take_profit_2: entry_price * TAKE_PROFIT_2_RATIO,
            stop_loss: entry_price * STOP_LOSS_RATIO,
        }
    }
}

/// Simple moving average over the trailing `period` values, `None` until
/// enough data has accumulated.
pub fn moving_average(closes: &[f64], period: usize) -> Option<f64> {
    if period == 0 || closes.len() < period {
        return None;
    }
    let window = &closes[closes.len() - period..];
    Some(window.iter().sum::<f64>() / period as f64)
}

/// Lowest low and highest high over the trailing swing window.
pub fn support_resistance(history: &[PricePoint]) -> (f64, f64) {
    let start = history.len().saturating_sub(SWING_WINDOW);
    let window = &history[start..];
    let support = window.iter().map(|p| p.low).fold(f64::INFINITY, f64::min);
    let resistance = window
        .iter()
        .map(|p| p.high)
        .fold(f64::NEG_INFINITY, f64::max);
    (support, resistance)
}

/// The 50% and 61.8% retracement levels of the trailing swing range.
pub fn fibonacci_levels(high: f64, low: f64) -> (f64, f64) {
    let range = high - low;
    (high - 0.5 * range, high - 0.618 * range)
}

/// Core entry filter: uptrend, and the last close sitting inside the zone
/// between the entry floor and the recent high.
///
/// The floor is the lowest of recent support and the two retracement
/// levels. When the long moving average has not accumulated yet the trend
/// filter does not veto, matching the short-history behavior of the close
/// series this runs on.
pub fn entry_signal(history: &[PricePoint]) -> bool {
    if history.len() < MIN_HISTORY {
        return false;
    }
    let closes: Vec<f64> = history.iter().map(|p| p.close).collect();
    let current = closes[closes.len() - 1];

    let short = match moving_average(&closes, MA_SHORT_PERIOD) {
        Some(v) => v,
        None => return false,
    };
    if let Some(long) = moving_average(&closes, MA_LONG_PERIOD) {
        if short < long {
            return false;
        }
    }

    let (support, resistance) = support_resistance(history);
    let (fib_half, fib_golden) = fibonacci_levels(resistance, support);
    let entry_floor = support.min(fib_half).min(fib_golden);

    entry_floor < current && current < resistance
}

/// Simpler momentum filter: last close above the short moving average, and
/// the short average not below the long one.
pub fn trend_signal(history: &[PricePoint]) -> bool {
    if history.len() < MIN_HISTORY {
        return false;
    }
    let closes: Vec<f64> = history.iter().map(|p| p.close).collect();
    let current = closes[closes.len() - 1];

    let short = match moving_average(&closes, MA_SHORT_PERIOD) {
        Some(v) => v,
        None => return false,
    };
    if let Some(long) = moving_average(&closes, MA_LONG_PERIOD) {
        if short < long {
            return false;
        }
    }
    current > short
}

#[cfg(test)]
mod tests {
    use super::*;

    fn history(closes: &[f64]) -> Vec<PricePoint> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| PricePoint {
                timestamp: i as i64 * 86_400_000,
                close,
                high: close,
                low: close,
                volume: 1000.0,
            })
            .collect()
    }

    #[test]
    fn moving_average_needs_full_period() {
        assert_eq!(moving_average(&[1.0, 2.0, 3.0], 5), None);
        assert_eq!(moving_average(&[1.0, 2.0, 3.0, 4.0], 4), Some(2.5));
        // Only the trailing window counts.
        assert_eq!(moving_average(&[100.0, 1.0, 2.0, 3.0], 3), Some(2.0));
    }

    #[test]
    fn targets_scale_with_entry_price() {
        let targets = TradeTargets::for_entry(100.0);
        assert!((targets.take_profit_1 - 104.0).abs() < 1e-9);
        assert!((targets.take_profit_2 - 110.0).abs() < 1e-9);
        assert!((targets.stop_loss - 95.0).abs() < 1e-9);
    }

    #[test]
    fn fibonacci_levels_of_swing_range() {
        let (half, golden) = fibonacci_levels(130.0, 100.0);
        assert!((half - 115.0).abs() < 1e-9);
        assert!((golden - 111.46).abs() < 1e-2);
    }

    #[test]
    fn no_signal_below_min_history_regardless_of_values() {
        let short = history(&[1e9; 19]);
        assert!(!entry_signal(&short));
        assert!(!trend_signal(&short));
        assert!(!entry_signal(&[]));
        assert!(!trend_signal(&[]));
    }

    #[test]
    fn no_signal_in_downtrend() {
        // 60 descending closes: short MA well below long MA.
        let closes: Vec<f64> = (0..60).map(|i| 200.0 - i as f64).collect();
        let h = history(&closes);
        assert!(!entry_signal(&h));
        assert!(!trend_signal(&h));
    }

    #[test]
    fn signal_fires_in_uptrend_pullback() {
        // Steady rise to 130 with a final pullback to 125: the close sits
        // above the entry floor and below the recent high.
        let mut closes: Vec<f64> = (0..59).map(|i| 100.0 + i as f64 * 0.5).collect();
        closes.push(125.0);
        let h = history(&closes);
        assert!(entry_signal(&h));
    }

    #[test]
    fn no_signal_at_the_recent_high() {
        // Monotonic rise: the last close IS the resistance, and the zone
        // check is strict.
        let closes: Vec<f64> = (0..60).map(|i| 100.0 + i as f64 * 0.5).collect();
        let h = history(&closes);
        assert!(!entry_signal(&h));
    }

    #[test]
    fn trend_signal_requires_close_above_short_ma() {
        let mut closes: Vec<f64> = (0..59).map(|i| 100.0 + i as f64 * 0.5).collect();
        closes.push(125.0);
        let h = history(&closes);
        assert!(trend_signal(&h));

        // Flat series: close equals the average, not above it.
        let flat = history(&[100.0; 60]);
        assert!(!trend_signal(&flat));
    }
}
