// =============================================================================
// Fear & Greed Index Classification
// =============================================================================
//
// The 0-100 investor-psychology index, read contrarian at the extremes:
// extreme fear is a buying opportunity, extreme greed an overheating
// warning.

use serde::{Deserialize, Serialize};

/// Psychology band of the index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FearGreedLevel {
    /// < 25.
    ExtremeFear,
    /// 25-44.
    Fear,
    /// 45-55.
    Neutral,
    /// 56-75.
    Greed,
    /// >= 76.
    ExtremeGreed,
}

/// Contrarian signal derived from the band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FearGreedSignal {
    ContrarianBuy,
    ContrarianSell,
    Neutral,
}

/// Band plus contrarian signal for an index value.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct FearGreedReading {
    pub index: f64,
    pub level: FearGreedLevel,
    pub signal: FearGreedSignal,
}

/// Classify a Fear & Greed index value (0-100).
pub fn classify_fear_greed(index: f64) -> FearGreedReading {
    let (level, signal) = if index < 25.0 {
        (FearGreedLevel::ExtremeFear, FearGreedSignal::ContrarianBuy)
    } else if index < 45.0 {
        (FearGreedLevel::Fear, FearGreedSignal::Neutral)
    } else if index < 56.0 {
        (FearGreedLevel::Neutral, FearGreedSignal::Neutral)
    } else if index < 76.0 {
        (FearGreedLevel::Greed, FearGreedSignal::Neutral)
    } else {
        (FearGreedLevel::ExtremeGreed, FearGreedSignal::ContrarianSell)
    };

    FearGreedReading {
        index,
        level,
        signal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extreme_fear_is_contrarian_buy() {
        let reading = classify_fear_greed(12.0);
        assert_eq!(reading.level, FearGreedLevel::ExtremeFear);
        assert_eq!(reading.signal, FearGreedSignal::ContrarianBuy);
    }

    #[test]
    fn extreme_greed_is_contrarian_sell() {
        let reading = classify_fear_greed(88.0);
        assert_eq!(reading.level, FearGreedLevel::ExtremeGreed);
        assert_eq!(reading.signal, FearGreedSignal::ContrarianSell);
    }

    #[test]
    fn middle_bands_are_neutral_signals() {
        assert_eq!(classify_fear_greed(30.0).level, FearGreedLevel::Fear);
        assert_eq!(classify_fear_greed(30.0).signal, FearGreedSignal::Neutral);
        assert_eq!(classify_fear_greed(50.0).level, FearGreedLevel::Neutral);
        assert_eq!(classify_fear_greed(70.0).level, FearGreedLevel::Greed);
        assert_eq!(classify_fear_greed(70.0).signal, FearGreedSignal::Neutral);
    }

    #[test]
    fn band_boundaries() {
        assert_eq!(classify_fear_greed(24.9).level, FearGreedLevel::ExtremeFear);
        assert_eq!(classify_fear_greed(25.0).level, FearGreedLevel::Fear);
        assert_eq!(classify_fear_greed(45.0).level, FearGreedLevel::Neutral);
        assert_eq!(classify_fear_greed(56.0).level, FearGreedLevel::Greed);
        assert_eq!(classify_fear_greed(76.0).level, FearGreedLevel::ExtremeGreed);
    }
}
