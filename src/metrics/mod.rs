// =============================================================================
// Metric Calculators Module
// =============================================================================
//
// Pure, side-effect-free implementations of the statistical and financial
// metrics consumed by the domain scorers. Insufficient data always yields a
// documented sentinel or `Option::None` — never an error — so callers are
// forced to handle the degraded case explicitly.

pub mod bollinger;
pub mod commodity;
pub mod credit;
pub mod fear_greed;
pub mod kelly;
pub mod keyword_risk;
pub mod peer;
pub mod peg;
pub mod pivots;
pub mod profile;
pub mod sharpe;
pub mod trend;
pub mod var;
pub mod yield_curve;

pub use bollinger::{
    analyze_bands, calculate_bollinger, BandAnalysis, BandPosition, BandSignal, BollingerResult,
};
pub use commodity::{classify_dollar_index, classify_oil_price, DollarSignal, OilSignal};
pub use credit::{assess_cds_spread, CreditAssessment, CreditRiskLevel};
pub use fear_greed::{classify_fear_greed, FearGreedLevel, FearGreedReading, FearGreedSignal};
pub use kelly::{kelly_position, KellySizing};
pub use keyword_risk::{scan_regulatory_risk, RegulatoryRisk, RiskSeverity};
pub use peer::{compare_with_peers, CompetitivePosition, PeerComparison, RelativeStanding};
pub use peg::{assess_peg, PegAssessment, PegValuation};
pub use pivots::{find_support_resistance, SupportResistance};
pub use profile::{is_multinational, is_us_exporter, sector_for_ticker};
pub use sharpe::annualized_sharpe;
pub use trend::{
    alignment_score, analyze_alignment, classify_trend, AlignmentStatus, Trend, TrendAlignment,
};
pub use var::{historical_var, VarEstimate};
pub use yield_curve::{classify_yield_curve, YieldCurveReading, YieldCurveSignal};
