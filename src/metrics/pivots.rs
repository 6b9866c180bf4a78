// =============================================================================
// Pivot-Point Support / Resistance
// =============================================================================
//
// A bar is a pivot high (resistance) when its high strictly exceeds every
// high within 5 bars on each side; a pivot low (support) is the mirror
// image. Up to the 3 most recent distinct levels per side are kept; the
// nearest level below the last close is the active support, the nearest
// above is the active resistance.

use serde::{Deserialize, Serialize};

use crate::types::Candle;

/// Bars required on each side of a pivot.
const PIVOT_WINDOW: usize = 5;

/// Minimum bars for pivot detection (window + centre + window).
pub const PIVOT_MIN_BARS: usize = PIVOT_WINDOW * 2 + 1;

/// Levels kept per side.
const MAX_LEVELS: usize = 3;

/// Detected support/resistance structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SupportResistance {
    /// Up to 3 most recent distinct support levels.
    pub support_levels: Vec<f64>,
    /// Up to 3 most recent distinct resistance levels.
    pub resistance_levels: Vec<f64>,
    /// Nearest support below the last close.
    pub nearest_support: Option<f64>,
    /// Nearest resistance above the last close.
    pub nearest_resistance: Option<f64>,
    /// Distance from close down to the nearest support, in percent.
    pub support_distance_pct: Option<f64>,
    /// Distance from close up to the nearest resistance, in percent.
    pub resistance_distance_pct: Option<f64>,
}

/// Find pivot-based support and resistance levels.
///
/// Returns an empty structure (no levels, no distances) when fewer than
/// [`PIVOT_MIN_BARS`] bars are supplied.
pub fn find_support_resistance(bars: &[Candle]) -> SupportResistance {
    if bars.len() < PIVOT_MIN_BARS {
        return SupportResistance::default();
    }

    let mut resistance_levels: Vec<f64> = Vec::new();
    let mut support_levels: Vec<f64> = Vec::new();

    for i in PIVOT_WINDOW..bars.len() - PIVOT_WINDOW {
        let high = bars[i].high;
        let low = bars[i].low;

        let left = &bars[i - PIVOT_WINDOW..i];
        let right = &bars[i + 1..i + 1 + PIVOT_WINDOW];

        let is_pivot_high =
            left.iter().all(|b| high > b.high) && right.iter().all(|b| high > b.high);
        if is_pivot_high {
            resistance_levels.push(high);
        }

        let is_pivot_low = left.iter().all(|b| low < b.low) && right.iter().all(|b| low < b.low);
        if is_pivot_low {
            support_levels.push(low);
        }
    }

    let resistance_levels = recent_distinct(&resistance_levels);
    let support_levels = recent_distinct(&support_levels);

    let current_price = bars[bars.len() - 1].close;

    let nearest_support = support_levels
        .iter()
        .copied()
        .filter(|s| *s < current_price)
        .fold(None, |acc: Option<f64>, s| match acc {
            Some(best) if best >= s => Some(best),
            _ => Some(s),
        });

    let nearest_resistance = resistance_levels
        .iter()
        .copied()
        .filter(|r| *r > current_price)
        .fold(None, |acc: Option<f64>, r| match acc {
            Some(best) if best <= r => Some(best),
            _ => Some(r),
        });

    let support_distance_pct = nearest_support
        .filter(|_| current_price > 0.0)
        .map(|s| (current_price - s) / current_price * 100.0);
    let resistance_distance_pct = nearest_resistance
        .filter(|_| current_price > 0.0)
        .map(|r| (r - current_price) / current_price * 100.0);

    SupportResistance {
        support_levels,
        resistance_levels,
        nearest_support,
        nearest_resistance,
        support_distance_pct,
        resistance_distance_pct,
    }
}

/// Keep the most recent `MAX_LEVELS` distinct values from an
/// oldest-first pivot list, preserving recency order (newest first).
fn recent_distinct(levels: &[f64]) -> Vec<f64> {
    let mut out: Vec<f64> = Vec::new();
    for level in levels.iter().rev() {
        if out.len() == MAX_LEVELS {
            break;
        }
        if !out.iter().any(|l| (l - level).abs() < f64::EPSILON) {
            out.push(*level);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(high: f64, low: f64, close: f64) -> Candle {
        Candle {
            open: (high + low) / 2.0,
            high,
            low,
            close,
            volume: 1000.0,
        }
    }

    /// Flat series with one spike high at index 7 and one dip low at 14.
    fn series_with_pivots() -> Vec<Candle> {
        let mut bars: Vec<Candle> = (0..22).map(|_| bar(101.0, 99.0, 100.0)).collect();
        bars[7] = bar(110.0, 99.0, 105.0);
        bars[14] = bar(101.0, 90.0, 95.0);
        bars
    }

    #[test]
    fn insufficient_bars_yields_empty() {
        let bars: Vec<Candle> = (0..10).map(|_| bar(101.0, 99.0, 100.0)).collect();
        let sr = find_support_resistance(&bars);
        assert!(sr.support_levels.is_empty());
        assert!(sr.resistance_levels.is_empty());
        assert!(sr.nearest_support.is_none());
        assert!(sr.nearest_resistance.is_none());
    }

    #[test]
    fn detects_spike_and_dip() {
        let sr = find_support_resistance(&series_with_pivots());
        assert_eq!(sr.resistance_levels, vec![110.0]);
        assert_eq!(sr.support_levels, vec![90.0]);
        assert_eq!(sr.nearest_resistance, Some(110.0));
        assert_eq!(sr.nearest_support, Some(90.0));
        assert!((sr.resistance_distance_pct.unwrap() - 10.0).abs() < 1e-9);
        assert!((sr.support_distance_pct.unwrap() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn pivot_requires_strict_exceedance() {
        // A plateau equal to its neighbours is not a pivot.
        let mut bars: Vec<Candle> = (0..22).map(|_| bar(101.0, 99.0, 100.0)).collect();
        bars[8] = bar(101.0, 99.0, 100.0);
        let sr = find_support_resistance(&bars);
        assert!(sr.resistance_levels.is_empty());
        assert!(sr.support_levels.is_empty());
    }

    #[test]
    fn keeps_three_most_recent_distinct_levels() {
        // Four spaced spike highs; only the newest three survive.
        let mut bars: Vec<Candle> = (0..60).map(|_| bar(101.0, 99.0, 100.0)).collect();
        bars[7] = bar(108.0, 99.0, 100.0);
        bars[20] = bar(112.0, 99.0, 100.0);
        bars[33] = bar(109.0, 99.0, 100.0);
        bars[46] = bar(111.0, 99.0, 100.0);
        let sr = find_support_resistance(&bars);
        assert_eq!(sr.resistance_levels.len(), 3);
        // Newest first; the oldest spike (108) fell off.
        assert_eq!(sr.resistance_levels, vec![111.0, 109.0, 112.0]);
        // Nearest above the close of 100 is 109.
        assert_eq!(sr.nearest_resistance, Some(109.0));
    }

    #[test]
    fn levels_on_wrong_side_are_ignored() {
        // Close above the only resistance pivot: no nearest resistance.
        let mut bars: Vec<Candle> = (0..22).map(|_| bar(101.0, 99.0, 100.0)).collect();
        bars[7] = bar(110.0, 99.0, 105.0);
        bars[21] = bar(121.0, 119.0, 120.0);
        let sr = find_support_resistance(&bars);
        assert!(sr.nearest_resistance.is_none());
        assert!(sr.resistance_distance_pct.is_none());
    }
}
