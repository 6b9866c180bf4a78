// =============================================================================
// Multi-Timeframe Trend Alignment
// =============================================================================
//
// Per timeframe: UPTREND when MA20 > MA50 * 1.02, DOWNTREND when
// MA20 < MA50 * 0.98, else SIDEWAYS. The alignment score across
// daily/weekly/monthly follows a fixed combinatorial table — two agreeing
// trends plus a sideways outrank two agreeing trends plus an opposing one.

use serde::{Deserialize, Serialize};

use crate::types::Candle;

/// Bars required to compute the MA50 leg of the trend.
pub const TREND_MIN_BARS: usize = 50;

/// Directional state of one timeframe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trend {
    Uptrend,
    Downtrend,
    Sideways,
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Uptrend => write!(f, "UPTREND"),
            Self::Downtrend => write!(f, "DOWNTREND"),
            Self::Sideways => write!(f, "SIDEWAYS"),
        }
    }
}

/// How strongly the three timeframes agree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AlignmentStatus {
    /// Score >= 0.8.
    Strong,
    /// Score >= 0.6.
    Moderate,
    /// Score >= 0.4.
    Weak,
    /// Score < 0.4 — timeframes disagree.
    Conflicting,
}

/// Per-timeframe trends plus the combined alignment score.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TrendAlignment {
    pub daily: Trend,
    pub weekly: Trend,
    pub monthly: Trend,
    pub score: f64,
    pub status: AlignmentStatus,
}

/// Classify the trend of one timeframe from its bars (oldest first).
///
/// Fewer than [`TREND_MIN_BARS`] bars classifies as SIDEWAYS (not enough
/// history to anchor the MA50).
pub fn classify_trend(bars: &[Candle]) -> Trend {
    if bars.len() < TREND_MIN_BARS {
        return Trend::Sideways;
    }

    let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
    let ma20 = closes[closes.len() - 20..].iter().sum::<f64>() / 20.0;
    let ma50 = closes[closes.len() - 50..].iter().sum::<f64>() / 50.0;

    if ma20 > ma50 * 1.02 {
        Trend::Uptrend
    } else if ma20 < ma50 * 0.98 {
        Trend::Downtrend
    } else {
        Trend::Sideways
    }
}

/// Alignment score for three timeframe trends.
///
/// Fixed table:
/// - all three agree (non-sideways)        -> 1.0
/// - two agree + one sideways              -> 0.75
/// - two agree + one opposing              -> 0.66
/// - one up + one down (conflict)          -> 0.33
/// - two sideways + one trend              -> 0.5
/// - all sideways                          -> 0.5
/// - anything else                         -> 0.0
pub fn alignment_score(daily: Trend, weekly: Trend, monthly: Trend) -> f64 {
    let trends = [daily, weekly, monthly];
    let up = trends.iter().filter(|t| **t == Trend::Uptrend).count();
    let down = trends.iter().filter(|t| **t == Trend::Downtrend).count();
    let sideways = trends.iter().filter(|t| **t == Trend::Sideways).count();

    if sideways == 3 {
        return 0.5;
    }

    if up == 3 || down == 3 {
        return 1.0;
    }

    if up == 2 || down == 2 {
        return if sideways == 1 { 0.75 } else { 0.66 };
    }

    if up == 1 && down == 1 {
        return 0.33;
    }

    if sideways == 2 {
        return 0.5;
    }

    0.0
}

/// Classify the three timeframes and compute their alignment.
pub fn analyze_alignment(
    daily_bars: &[Candle],
    weekly_bars: &[Candle],
    monthly_bars: &[Candle],
) -> TrendAlignment {
    let daily = classify_trend(daily_bars);
    let weekly = classify_trend(weekly_bars);
    let monthly = classify_trend(monthly_bars);
    let score = alignment_score(daily, weekly, monthly);

    let status = if score >= 0.8 {
        AlignmentStatus::Strong
    } else if score >= 0.6 {
        AlignmentStatus::Moderate
    } else if score >= 0.4 {
        AlignmentStatus::Weak
    } else {
        AlignmentStatus::Conflicting
    };

    TrendAlignment {
        daily,
        weekly,
        monthly,
        score,
        status,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bars_with_trend(slope: f64) -> Vec<Candle> {
        (0..60)
            .map(|i| {
                let close = 100.0 + slope * i as f64;
                Candle {
                    open: close,
                    high: close + 1.0,
                    low: close - 1.0,
                    close,
                    volume: 1000.0,
                }
            })
            .collect()
    }

    #[test]
    fn rising_closes_are_uptrend() {
        assert_eq!(classify_trend(&bars_with_trend(1.0)), Trend::Uptrend);
    }

    #[test]
    fn falling_closes_are_downtrend() {
        assert_eq!(classify_trend(&bars_with_trend(-1.0)), Trend::Downtrend);
    }

    #[test]
    fn flat_closes_are_sideways() {
        assert_eq!(classify_trend(&bars_with_trend(0.0)), Trend::Sideways);
    }

    #[test]
    fn short_history_is_sideways() {
        let bars = bars_with_trend(1.0)[..40].to_vec();
        assert_eq!(classify_trend(&bars), Trend::Sideways);
    }

    #[test]
    fn alignment_table() {
        use Trend::*;
        assert!((alignment_score(Uptrend, Uptrend, Uptrend) - 1.0).abs() < f64::EPSILON);
        assert!((alignment_score(Downtrend, Downtrend, Downtrend) - 1.0).abs() < f64::EPSILON);
        assert!((alignment_score(Uptrend, Uptrend, Sideways) - 0.75).abs() < f64::EPSILON);
        assert!((alignment_score(Uptrend, Uptrend, Downtrend) - 0.66).abs() < f64::EPSILON);
        assert!((alignment_score(Uptrend, Downtrend, Sideways) - 0.33).abs() < f64::EPSILON);
        assert!((alignment_score(Uptrend, Sideways, Sideways) - 0.5).abs() < f64::EPSILON);
        assert!((alignment_score(Sideways, Sideways, Sideways) - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn partial_agreement_with_sideways_beats_opposition() {
        use Trend::*;
        let with_sideways = alignment_score(Uptrend, Uptrend, Sideways);
        let with_opposition = alignment_score(Uptrend, Uptrend, Downtrend);
        assert!(with_sideways > with_opposition);
    }

    #[test]
    fn full_alignment_analysis() {
        let up = bars_with_trend(1.0);
        let alignment = analyze_alignment(&up, &up, &up);
        assert_eq!(alignment.daily, Trend::Uptrend);
        assert!((alignment.score - 1.0).abs() < f64::EPSILON);
        assert_eq!(alignment.status, AlignmentStatus::Strong);
    }

    #[test]
    fn conflicting_status() {
        let alignment = analyze_alignment(
            &bars_with_trend(1.0),
            &bars_with_trend(-1.0),
            &bars_with_trend(0.0),
        );
        assert_eq!(alignment.status, AlignmentStatus::Conflicting);
    }
}
