// =============================================================================
// Bollinger Bands
// =============================================================================
//
// Bollinger Bands consist of a middle band (SMA), an upper band (SMA + k*σ),
// and a lower band (SMA - k*σ). The Band Width is the normalised distance:
// BBW = (upper - lower) / middle * 100.
//
// On top of the raw bands, `analyze_bands` classifies the price position
// into five zones and flags volatility squeezes (< 5 % width) and
// expansions (> 15 % width).

use serde::{Deserialize, Serialize};

/// Result of a Bollinger Band calculation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BollingerResult {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub width: f64,
}

/// Where the price sits relative to the bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BandPosition {
    BelowLower,
    LowerThird,
    Middle,
    UpperThird,
    AboveUpper,
}

/// Trading signal implied by the band position and width.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum BandSignal {
    /// Price below the lower band.
    Oversold,
    /// Price above the upper band.
    Overbought,
    /// Band width < 5 % — volatility compression, breakout pending.
    Squeeze,
    /// Band width > 15 % — strong trend in progress.
    Expansion,
    Neutral,
}

/// Band position, signal, and width for one price observation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandAnalysis {
    pub position: BandPosition,
    pub signal: BandSignal,
    pub band_width_pct: f64,
}

/// Calculate Bollinger Bands for the given closing prices.
///
/// Returns `None` when:
/// - Fewer than `period` data points.
/// - Middle band is zero (degenerate input).
pub fn calculate_bollinger(closes: &[f64], period: usize, num_std: f64) -> Option<BollingerResult> {
    if period == 0 || closes.len() < period {
        return None;
    }

    let window = &closes[closes.len() - period..];
    let sum: f64 = window.iter().sum();
    let middle = sum / period as f64;

    if middle == 0.0 {
        return None;
    }

    let variance = window.iter().map(|x| (x - middle).powi(2)).sum::<f64>() / period as f64;
    let std_dev = variance.sqrt();

    let upper = middle + num_std * std_dev;
    let lower = middle - num_std * std_dev;
    let width = (upper - lower) / middle * 100.0;

    if width.is_finite() {
        Some(BollingerResult {
            upper,
            middle,
            lower,
            width,
        })
    } else {
        None
    }
}

/// Classify a price against pre-computed band levels.
///
/// Zone boundaries: below-lower, lower third, middle, upper third,
/// above-upper. A neutral zone resolves to SQUEEZE below 5 % width or
/// EXPANSION above 15 %.
pub fn analyze_bands(price: f64, upper: f64, middle: f64, lower: f64) -> BandAnalysis {
    let band_width_pct = if middle > 0.0 {
        (upper - lower) / middle * 100.0
    } else {
        0.0
    };

    let (position, mut signal) = if price < lower {
        (BandPosition::BelowLower, BandSignal::Oversold)
    } else if price < lower + (middle - lower) * 0.33 {
        (BandPosition::LowerThird, BandSignal::Neutral)
    } else if price < middle + (upper - middle) * 0.33 {
        (BandPosition::Middle, BandSignal::Neutral)
    } else if price < upper {
        (BandPosition::UpperThird, BandSignal::Neutral)
    } else {
        (BandPosition::AboveUpper, BandSignal::Overbought)
    };

    if signal == BandSignal::Neutral {
        if band_width_pct < 5.0 {
            signal = BandSignal::Squeeze;
        } else if band_width_pct > 15.0 {
            signal = BandSignal::Expansion;
        }
    }

    BandAnalysis {
        position,
        signal,
        band_width_pct,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bollinger_basic() {
        let closes: Vec<f64> = (1..=20).map(|x| x as f64).collect();
        let result = calculate_bollinger(&closes, 20, 2.0);
        assert!(result.is_some());
        let bb = result.unwrap();
        assert!(bb.upper > bb.middle);
        assert!(bb.lower < bb.middle);
        assert!(bb.width > 0.0);
    }

    #[test]
    fn bollinger_insufficient_data() {
        let closes = vec![1.0, 2.0, 3.0];
        assert!(calculate_bollinger(&closes, 20, 2.0).is_none());
    }

    #[test]
    fn bollinger_flat() {
        let closes = vec![100.0; 20];
        let result = calculate_bollinger(&closes, 20, 2.0);
        assert!(result.is_some());
        assert!((result.unwrap().width - 0.0).abs() < 1e-10);
    }

    #[test]
    fn band_break_below_is_oversold() {
        let analysis = analyze_bands(84.0, 110.0, 100.0, 90.0);
        assert_eq!(analysis.position, BandPosition::BelowLower);
        assert_eq!(analysis.signal, BandSignal::Oversold);
        assert!((analysis.band_width_pct - 20.0).abs() < 1e-9);
    }

    #[test]
    fn band_break_above_is_overbought() {
        let analysis = analyze_bands(112.0, 110.0, 100.0, 90.0);
        assert_eq!(analysis.position, BandPosition::AboveUpper);
        assert_eq!(analysis.signal, BandSignal::Overbought);
    }

    #[test]
    fn narrow_bands_signal_squeeze() {
        // Width = 4 % and price mid-band.
        let analysis = analyze_bands(100.0, 102.0, 100.0, 98.0);
        assert_eq!(analysis.position, BandPosition::Middle);
        assert_eq!(analysis.signal, BandSignal::Squeeze);
    }

    #[test]
    fn wide_bands_signal_expansion() {
        // Width = 20 % and price mid-band.
        let analysis = analyze_bands(100.0, 110.0, 100.0, 90.0);
        assert_eq!(analysis.signal, BandSignal::Expansion);
    }

    #[test]
    fn zone_thirds() {
        // lower 90, middle 100, upper 110 (width 20 %, expansion in neutral).
        let lower_third = analyze_bands(91.0, 110.0, 100.0, 90.0);
        assert_eq!(lower_third.position, BandPosition::LowerThird);

        let upper_third = analyze_bands(108.0, 110.0, 100.0, 90.0);
        assert_eq!(upper_third.position, BandPosition::UpperThird);
    }
}
