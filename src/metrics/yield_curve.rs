// =============================================================================
// Yield Curve — 10Y-2Y spread classification
// =============================================================================
//
// The 10Y-2Y treasury spread is the classic recession gauge. An inverted
// curve (short rates above long rates) has preceded every modern US
// recession, which is why INVERTED carries the highest override priority in
// the macro scorer.

use serde::{Deserialize, Serialize};

/// Shape of the yield curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum YieldCurveSignal {
    /// Spread < 0 bps — recession signal.
    Inverted,
    /// 0-25 bps — slowdown warning.
    Flattening,
    /// 25-150 bps — healthy economy.
    Normal,
    /// >= 150 bps — expansion expected.
    Steep,
}

impl std::fmt::Display for YieldCurveSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Inverted => write!(f, "INVERTED"),
            Self::Flattening => write!(f, "FLATTENING"),
            Self::Normal => write!(f, "NORMAL"),
            Self::Steep => write!(f, "STEEP"),
        }
    }
}

/// Spread and classification for a 2Y/10Y yield pair.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct YieldCurveReading {
    /// 10Y minus 2Y, in basis points.
    pub spread_bps: f64,
    pub signal: YieldCurveSignal,
}

/// Classify the yield curve from 2-year and 10-year yields (in percent).
pub fn classify_yield_curve(yield_2y: f64, yield_10y: f64) -> YieldCurveReading {
    let spread = yield_10y - yield_2y;
    let spread_bps = spread * 100.0;

    let signal = if spread < 0.0 {
        YieldCurveSignal::Inverted
    } else if spread < 0.25 {
        YieldCurveSignal::Flattening
    } else if spread < 1.50 {
        YieldCurveSignal::Normal
    } else {
        YieldCurveSignal::Steep
    };

    YieldCurveReading { spread_bps, signal }
}
