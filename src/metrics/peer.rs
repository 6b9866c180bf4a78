// =============================================================================
// Sector Peer Comparison
// =============================================================================
//
// Compares a company's valuation, growth, and margin against fixed sector
// benchmarks and condenses the three comparisons into a -3..3 competitive
// score: LEADER at >= 2, COMPETITIVE at >= 0, LAGGING below.

use serde::{Deserialize, Serialize};

use crate::bundle::Sector;

/// Where a metric sits relative to the sector benchmark.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RelativeStanding {
    /// Better than the benchmark (cheaper P/E, faster growth, fatter margin).
    Above,
    Inline,
    /// Worse than the benchmark.
    Below,
}

/// Overall competitive position within the sector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum CompetitivePosition {
    Leader,
    Competitive,
    Lagging,
}

impl std::fmt::Display for CompetitivePosition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leader => write!(f, "LEADER"),
            Self::Competitive => write!(f, "COMPETITIVE"),
            Self::Lagging => write!(f, "LAGGING"),
        }
    }
}

/// Full peer-comparison result.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PeerComparison {
    pub sector: Sector,
    pub pe_vs_sector: RelativeStanding,
    pub growth_vs_peers: RelativeStanding,
    pub margin_vs_peers: RelativeStanding,
    /// Sum of +1 (above) / -1 (below) across the three comparisons.
    pub score: i32,
    pub position: CompetitivePosition,
}

/// Benchmark (avg P/E, avg growth, avg margin) per sector.
fn sector_benchmark(sector: Sector) -> (f64, f64, f64) {
    match sector {
        Sector::Technology => (28.5, 0.15, 0.25),
        Sector::Financials => (12.0, 0.08, 0.20),
        Sector::Healthcare => (18.0, 0.12, 0.18),
        Sector::Automotive => (15.0, 0.10, 0.08),
        _ => (20.0, 0.10, 0.15),
    }
}

/// Compare a company's fundamentals against its sector benchmark.
///
/// Thresholds: P/E ±15 % of benchmark, growth ±30 %, margin ±20 %.
pub fn compare_with_peers(
    sector: Sector,
    pe_ratio: f64,
    revenue_growth: f64,
    profit_margin: f64,
) -> PeerComparison {
    let (avg_pe, avg_growth, avg_margin) = sector_benchmark(sector);

    // Cheap relative to the sector is "above" (a point in favour).
    let pe_vs_sector = if pe_ratio < avg_pe * 0.85 {
        RelativeStanding::Above
    } else if pe_ratio > avg_pe * 1.15 {
        RelativeStanding::Below
    } else {
        RelativeStanding::Inline
    };

    let growth_vs_peers = if revenue_growth > avg_growth * 1.3 {
        RelativeStanding::Above
    } else if revenue_growth < avg_growth * 0.7 {
        RelativeStanding::Below
    } else {
        RelativeStanding::Inline
    };

    let margin_vs_peers = if profit_margin > avg_margin * 1.2 {
        RelativeStanding::Above
    } else if profit_margin < avg_margin * 0.8 {
        RelativeStanding::Below
    } else {
        RelativeStanding::Inline
    };

    let standing_points = |s: RelativeStanding| match s {
        RelativeStanding::Above => 1,
        RelativeStanding::Inline => 0,
        RelativeStanding::Below => -1,
    };

    let score =
        standing_points(pe_vs_sector) + standing_points(growth_vs_peers) + standing_points(margin_vs_peers);

    let position = if score >= 2 {
        CompetitivePosition::Leader
    } else if score >= 0 {
        CompetitivePosition::Competitive
    } else {
        CompetitivePosition::Lagging
    };

    PeerComparison {
        sector,
        pe_vs_sector,
        growth_vs_peers,
        margin_vs_peers,
        score,
        position,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cheap_fast_fat_is_leader() {
        // Tech benchmark: P/E 28.5, growth 15 %, margin 25 %.
        let cmp = compare_with_peers(Sector::Technology, 20.0, 0.25, 0.32);
        assert_eq!(cmp.pe_vs_sector, RelativeStanding::Above);
        assert_eq!(cmp.growth_vs_peers, RelativeStanding::Above);
        assert_eq!(cmp.margin_vs_peers, RelativeStanding::Above);
        assert_eq!(cmp.score, 3);
        assert_eq!(cmp.position, CompetitivePosition::Leader);
    }

    #[test]
    fn expensive_slow_thin_is_lagging() {
        let cmp = compare_with_peers(Sector::Technology, 40.0, 0.05, 0.10);
        assert_eq!(cmp.score, -3);
        assert_eq!(cmp.position, CompetitivePosition::Lagging);
    }

    #[test]
    fn benchmark_level_is_competitive() {
        let cmp = compare_with_peers(Sector::Technology, 28.5, 0.15, 0.25);
        assert_eq!(cmp.score, 0);
        assert_eq!(cmp.position, CompetitivePosition::Competitive);
    }

    #[test]
    fn unknown_sector_uses_default_benchmark() {
        // Default benchmark: P/E 20, growth 10 %, margin 15 %.
        let cmp = compare_with_peers(Sector::Unknown, 16.0, 0.14, 0.19);
        assert_eq!(cmp.pe_vs_sector, RelativeStanding::Above);
        assert_eq!(cmp.growth_vs_peers, RelativeStanding::Above);
        assert_eq!(cmp.margin_vs_peers, RelativeStanding::Above);
        assert_eq!(cmp.position, CompetitivePosition::Leader);
    }

    #[test]
    fn two_points_suffice_for_leader() {
        let cmp = compare_with_peers(Sector::Financials, 9.0, 0.12, 0.20);
        assert_eq!(cmp.score, 2);
        assert_eq!(cmp.position, CompetitivePosition::Leader);
    }
}
