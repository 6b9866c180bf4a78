// =============================================================================
// Ticker Profiles — static sector / exporter / multinational classification
// =============================================================================
//
// Convenience lookup tables for callers building a MetricBundle from a bare
// ticker. The tables are intentionally coarse; a caller with richer company
// data should populate the bundle fields directly.

use crate::bundle::Sector;

/// Sector classification for a US ticker. Unknown tickers map to
/// `Sector::Unknown`.
pub fn sector_for_ticker(ticker: &str) -> Sector {
    match ticker.to_uppercase().as_str() {
        "XOM" | "CVX" | "COP" | "SLB" | "XLE" => Sector::Energy,
        "AAL" | "DAL" | "UAL" | "LUV" | "JETS" => Sector::Airlines,
        "UPS" | "FDX" => Sector::Transportation,
        "AAPL" | "MSFT" | "GOOGL" | "META" | "NVDA" | "AMD" => Sector::Technology,
        "WMT" | "TGT" | "COST" => Sector::Consumer,
        "JPM" | "BAC" | "WFC" => Sector::Financials,
        "GLD" | "GDX" | "GOLD" => Sector::Gold,
        "TSLA" | "F" | "GM" => Sector::Automotive,
        "JNJ" | "PFE" | "UNH" => Sector::Healthcare,
        _ => Sector::Unknown,
    }
}

/// Whether the ticker is a major US exporter (significant overseas sales).
pub fn is_us_exporter(ticker: &str) -> bool {
    matches!(
        ticker.to_uppercase().as_str(),
        "AAPL" | "MSFT" | "GOOGL" | "NVDA" | "AMD" | "INTC" | "BA" | "CAT" | "DE"
    )
}

/// Whether the ticker is a multinational with >= 30 % foreign revenue.
pub fn is_multinational(ticker: &str) -> bool {
    matches!(
        ticker.to_uppercase().as_str(),
        "AAPL"
            | "MSFT"
            | "GOOGL"
            | "META"
            | "AMZN"
            | "NVDA"
            | "AMD"
            | "INTC"
            | "KO"
            | "PEP"
            | "MCD"
            | "SBUX"
            | "JNJ"
            | "PFE"
            | "UNH"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_sectors() {
        assert_eq!(sector_for_ticker("XOM"), Sector::Energy);
        assert_eq!(sector_for_ticker("DAL"), Sector::Airlines);
        assert_eq!(sector_for_ticker("AAPL"), Sector::Technology);
        assert_eq!(sector_for_ticker("GLD"), Sector::Gold);
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(sector_for_ticker("aapl"), Sector::Technology);
        assert!(is_us_exporter("nvda"));
    }

    #[test]
    fn unknown_ticker_defaults() {
        assert_eq!(sector_for_ticker("ZZZZ"), Sector::Unknown);
        assert!(!is_us_exporter("ZZZZ"));
        assert!(!is_multinational("ZZZZ"));
    }

    #[test]
    fn exporters_are_mostly_multinationals() {
        assert!(is_us_exporter("CAT"));
        assert!(is_multinational("KO"));
        assert!(!is_us_exporter("KO"));
    }
}
