// =============================================================================
// CDS Spread — market-implied credit risk
// =============================================================================
//
// Credit default swap spreads price the market's view of default risk. The
// bands follow ratings-agency convention: investment grade below 100 bps,
// speculative above 200, distressed above 500. CRITICAL forces a SELL at the
// risk-domain level regardless of every other signal.

use serde::{Deserialize, Serialize};

/// Credit risk band implied by the CDS spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CreditRiskLevel {
    /// < 100 bps — investment grade.
    Low,
    /// 100-200 bps — stable but watch.
    Moderate,
    /// 200-500 bps — speculative grade, rising default risk.
    High,
    /// >= 500 bps — default plausible; forces SELL.
    Critical,
}

impl std::fmt::Display for CreditRiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Full credit assessment for a CDS spread.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct CreditAssessment {
    pub spread_bps: f64,
    pub level: CreditRiskLevel,
    /// 0-10 severity score (10 is worst).
    pub risk_score: f64,
    /// Fixed confidence modifier applied by the risk scorer when the level
    /// does not force an action: LOW +0.10, MODERATE 0.00. HIGH/CRITICAL
    /// carry negative modifiers for record-keeping, but the scorer decides
    /// the action directly at those levels.
    pub confidence_modifier: f64,
}

/// Classify a CDS spread (basis points) into a credit risk band.
pub fn assess_cds_spread(spread_bps: f64) -> CreditAssessment {
    let (level, risk_score, confidence_modifier) = if spread_bps < 100.0 {
        (
            CreditRiskLevel::Low,
            (spread_bps / 100.0 * 3.0).min(10.0),
            0.10,
        )
    } else if spread_bps < 200.0 {
        (
            CreditRiskLevel::Moderate,
            3.0 + (spread_bps - 100.0) / 100.0 * 3.0,
            0.0,
        )
    } else if spread_bps < 500.0 {
        (
            CreditRiskLevel::High,
            6.0 + (spread_bps - 200.0) / 300.0 * 3.0,
            -0.15,
        )
    } else {
        (
            CreditRiskLevel::Critical,
            (9.0 + (spread_bps - 500.0) / 500.0).min(10.0),
            -0.25,
        )
    };

    CreditAssessment {
        spread_bps,
        level,
        risk_score,
        confidence_modifier,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn low_credit_risk() {
        let cds = assess_cds_spread(60.0);
        assert_eq!(cds.level, CreditRiskLevel::Low);
        assert!((cds.confidence_modifier - 0.10).abs() < f64::EPSILON);
        assert!(cds.risk_score < 3.0);
    }

    #[test]
    fn moderate_credit_risk() {
        let cds = assess_cds_spread(150.0);
        assert_eq!(cds.level, CreditRiskLevel::Moderate);
        assert!((cds.confidence_modifier - 0.0).abs() < f64::EPSILON);
        assert!((cds.risk_score - 4.5).abs() < 1e-9);
    }

    #[test]
    fn high_credit_risk() {
        let cds = assess_cds_spread(350.0);
        assert_eq!(cds.level, CreditRiskLevel::High);
        assert!((cds.risk_score - 7.5).abs() < 1e-9);
    }

    #[test]
    fn critical_credit_risk() {
        let cds = assess_cds_spread(600.0);
        assert_eq!(cds.level, CreditRiskLevel::Critical);
        assert!(cds.risk_score > 9.0);
        assert!(cds.risk_score <= 10.0);
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(assess_cds_spread(99.9).level, CreditRiskLevel::Low);
        assert_eq!(assess_cds_spread(100.0).level, CreditRiskLevel::Moderate);
        assert_eq!(assess_cds_spread(200.0).level, CreditRiskLevel::High);
        assert_eq!(assess_cds_spread(500.0).level, CreditRiskLevel::Critical);
    }

    #[test]
    fn risk_score_caps_at_ten() {
        let cds = assess_cds_spread(5000.0);
        assert!((cds.risk_score - 10.0).abs() < f64::EPSILON);
    }
}
