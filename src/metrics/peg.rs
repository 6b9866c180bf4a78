// =============================================================================
// PEG Ratio — growth-adjusted valuation
// =============================================================================
//
// PEG = P/E ÷ growth%. A P/E of 60 on 40 % growth gives PEG 1.5 (fair); the
// same P/E on 10 % growth gives 6.0 (expensive). Growth below 1 % makes the
// ratio meaningless, so the calculation returns a "very high" sentinel with
// an N/A classification instead of dividing by a near-zero denominator.

use serde::{Deserialize, Serialize};

/// Sentinel PEG value used when earnings growth is too low to divide by.
pub const PEG_NOT_MEANINGFUL: f64 = 999.0;

/// Valuation band derived from the PEG ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PegValuation {
    ExtremelyUndervalued,
    Undervalued,
    Fair,
    SlightlyOvervalued,
    Overvalued,
    /// Growth below 1 % — PEG is undefined.
    NotMeaningful,
}

impl std::fmt::Display for PegValuation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExtremelyUndervalued => write!(f, "EXTREMELY_UNDERVALUED"),
            Self::Undervalued => write!(f, "UNDERVALUED"),
            Self::Fair => write!(f, "FAIR"),
            Self::SlightlyOvervalued => write!(f, "SLIGHTLY_OVERVALUED"),
            Self::Overvalued => write!(f, "OVERVALUED"),
            Self::NotMeaningful => write!(f, "N/A"),
        }
    }
}

/// PEG ratio plus its valuation band.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PegAssessment {
    pub ratio: f64,
    pub valuation: PegValuation,
}

/// Assess the PEG ratio for `pe_ratio` and `earnings_growth` (a fraction,
/// 0.18 = 18 % YoY).
///
/// Bands:
/// - < 0.5   extremely undervalued
/// - < 1.0   undervalued
/// - <= 1.5  fair (a growth-matched P/E sits exactly on 1.5)
/// - < 2.0   slightly overvalued
/// - else    overvalued
///
/// Growth below 1 % yields [`PEG_NOT_MEANINGFUL`] with `NotMeaningful`.
pub fn assess_peg(pe_ratio: f64, earnings_growth: f64) -> PegAssessment {
    let growth_pct = earnings_growth * 100.0;

    if growth_pct < 1.0 {
        return PegAssessment {
            ratio: PEG_NOT_MEANINGFUL,
            valuation: PegValuation::NotMeaningful,
        };
    }

    let ratio = pe_ratio / growth_pct;

    let valuation = if ratio < 0.5 {
        PegValuation::ExtremelyUndervalued
    } else if ratio < 1.0 {
        PegValuation::Undervalued
    } else if ratio <= 1.5 {
        PegValuation::Fair
    } else if ratio < 2.0 {
        PegValuation::SlightlyOvervalued
    } else {
        PegValuation::Overvalued
    };

    PegAssessment { ratio, valuation }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn peg_fair_band() {
        // P/E 60 on 40 % growth -> exactly 1.5 (fair).
        let peg = assess_peg(60.0, 0.40);
        assert!((peg.ratio - 1.5).abs() < 1e-10);
        assert_eq!(peg.valuation, PegValuation::Fair);
    }

    #[test]
    fn peg_slightly_overvalued_above_fair() {
        let peg = assess_peg(64.0, 0.40);
        assert_eq!(peg.valuation, PegValuation::SlightlyOvervalued);
    }

    #[test]
    fn peg_undervalued() {
        // P/E 25 on 30 % growth -> ~0.83 (undervalued).
        let peg = assess_peg(25.0, 0.30);
        assert!((peg.ratio - 0.8333).abs() < 1e-3);
        assert_eq!(peg.valuation, PegValuation::Undervalued);
    }

    #[test]
    fn peg_extremely_undervalued() {
        let peg = assess_peg(12.0, 0.40);
        assert!(peg.ratio < 0.5);
        assert_eq!(peg.valuation, PegValuation::ExtremelyUndervalued);
    }

    #[test]
    fn peg_overvalued() {
        let peg = assess_peg(45.0, 0.10);
        assert!(peg.ratio > 2.0);
        assert_eq!(peg.valuation, PegValuation::Overvalued);
    }

    #[test]
    fn low_growth_is_not_meaningful() {
        let peg = assess_peg(25.0, 0.005);
        assert!((peg.ratio - PEG_NOT_MEANINGFUL).abs() < f64::EPSILON);
        assert_eq!(peg.valuation, PegValuation::NotMeaningful);

        // Negative growth likewise.
        let peg = assess_peg(25.0, -0.10);
        assert_eq!(peg.valuation, PegValuation::NotMeaningful);
    }

    #[test]
    fn valuation_display_na() {
        assert_eq!(format!("{}", PegValuation::NotMeaningful), "N/A");
    }
}
