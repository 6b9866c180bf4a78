// =============================================================================
// Commodity & Currency Regimes — oil price and dollar index
// =============================================================================
//
// Coarse regime classification used by the macro scorer for
// sector-conditional confidence adjustments. Thresholds:
//   WTI crude: > $90 HIGH, < $60 LOW, else NORMAL
//   DXY:       > 105 STRONG, < 95 WEAK, else NEUTRAL

use serde::{Deserialize, Serialize};

/// Oil price regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OilSignal {
    /// > $90/bbl — inflation pressure; energy producers benefit.
    High,
    /// < $60/bbl — consumer relief; energy producers suffer.
    Low,
    Normal,
}

/// Dollar strength regime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DollarSignal {
    /// DXY > 105 — headwind for exporters, gold, commodities.
    Strong,
    /// DXY < 95 — tailwind for exporters, gold, commodities.
    Weak,
    Neutral,
}

/// Classify the WTI crude price ($/barrel).
pub fn classify_oil_price(wti_price: f64) -> OilSignal {
    if wti_price > 90.0 {
        OilSignal::High
    } else if wti_price < 60.0 {
        OilSignal::Low
    } else {
        OilSignal::Normal
    }
}

/// Classify the dollar index (DXY, base 100).
pub fn classify_dollar_index(dxy: f64) -> DollarSignal {
    if dxy > 105.0 {
        DollarSignal::Strong
    } else if dxy < 95.0 {
        DollarSignal::Weak
    } else {
        DollarSignal::Neutral
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn oil_bands() {
        assert_eq!(classify_oil_price(95.0), OilSignal::High);
        assert_eq!(classify_oil_price(90.0), OilSignal::Normal);
        assert_eq!(classify_oil_price(75.0), OilSignal::Normal);
        assert_eq!(classify_oil_price(60.0), OilSignal::Normal);
        assert_eq!(classify_oil_price(55.0), OilSignal::Low);
    }

    #[test]
    fn dollar_bands() {
        assert_eq!(classify_dollar_index(108.0), DollarSignal::Strong);
        assert_eq!(classify_dollar_index(105.0), DollarSignal::Neutral);
        assert_eq!(classify_dollar_index(100.0), DollarSignal::Neutral);
        assert_eq!(classify_dollar_index(95.0), DollarSignal::Neutral);
        assert_eq!(classify_dollar_index(92.0), DollarSignal::Weak);
    }
}
