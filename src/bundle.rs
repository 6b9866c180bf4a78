// =============================================================================
// Metric Bundle — typed per-domain inputs with documented neutral defaults
// =============================================================================
//
// Each domain scorer consumes one sub-struct of the bundle. Every optional
// field carries a serde default equal to the documented neutral value, so a
// partially-populated JSON payload deserialises into a fully-usable bundle.
// Missing data lowers confidence through the scorer cascades; it never fails
// a deliberation.
// =============================================================================

use serde::{Deserialize, Serialize};

use crate::types::Candle;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_rsi() -> f64 {
    50.0
}

fn default_volume_change() -> f64 {
    1.0
}

fn default_pe_ratio() -> f64 {
    20.0
}

fn default_earnings_growth() -> f64 {
    0.10
}

fn default_revenue_growth() -> f64 {
    0.08
}

fn default_profit_margin() -> f64 {
    0.15
}

fn default_debt_to_equity() -> f64 {
    0.50
}

fn default_fed_rate() -> f64 {
    5.0
}

fn default_cpi_yoy() -> f64 {
    3.0
}

fn default_gdp_growth() -> f64 {
    2.0
}

fn default_unemployment() -> f64 {
    4.0
}

fn default_volatility() -> f64 {
    0.20
}

fn default_beta() -> f64 {
    1.0
}

fn default_correlation_spy() -> f64 {
    0.80
}

fn default_position_size() -> f64 {
    0.05
}

fn default_fear_greed() -> f64 {
    50.0
}

fn default_trending_rank() -> u32 {
    100
}

fn default_bullish_ratio() -> f64 {
    0.5
}

fn default_disruption_score() -> f64 {
    100.0
}

// =============================================================================
// Per-domain sub-bundles
// =============================================================================

/// MACD line state relative to its signal line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MacdSignal {
    BullishCross,
    BearishCross,
    Neutral,
}

impl Default for MacdSignal {
    fn default() -> Self {
        Self::Neutral
    }
}

/// Pre-computed Bollinger band levels supplied by a data provider.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BandLevels {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Inputs to the technical scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TechnicalMetrics {
    /// 14-period RSI. Neutral default 50.
    #[serde(default = "default_rsi")]
    pub rsi: f64,

    #[serde(default)]
    pub macd: MacdSignal,

    /// 20-day moving average. 0.0 means "not available".
    #[serde(default)]
    pub ma20: f64,

    /// 50-day moving average. 0.0 means "not available".
    #[serde(default)]
    pub ma50: f64,

    /// Volume relative to the recent average (1.0 = unchanged, 1.5 = +50 %).
    #[serde(default = "default_volume_change")]
    pub volume_change: f64,

    /// Last traded price.
    #[serde(default)]
    pub price: f64,

    /// Daily OHLCV bars, oldest first. Pivot detection needs at least 11.
    #[serde(default)]
    pub daily_bars: Vec<Candle>,

    /// Weekly bars for multi-timeframe alignment.
    #[serde(default)]
    pub weekly_bars: Vec<Candle>,

    /// Monthly bars for multi-timeframe alignment.
    #[serde(default)]
    pub monthly_bars: Vec<Candle>,

    /// Pre-computed Bollinger bands; computed from `daily_bars` when absent.
    #[serde(default)]
    pub bollinger: Option<BandLevels>,
}

impl Default for TechnicalMetrics {
    fn default() -> Self {
        Self {
            rsi: default_rsi(),
            macd: MacdSignal::Neutral,
            ma20: 0.0,
            ma50: 0.0,
            volume_change: default_volume_change(),
            price: 0.0,
            daily_bars: Vec::new(),
            weekly_bars: Vec::new(),
            monthly_bars: Vec::new(),
            bollinger: None,
        }
    }
}

/// Broad sector classification of the subject company.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sector {
    Technology,
    Energy,
    Airlines,
    Transportation,
    Consumer,
    Financials,
    Healthcare,
    Automotive,
    Gold,
    Unknown,
}

impl Default for Sector {
    fn default() -> Self {
        Self::Unknown
    }
}

/// Inputs to the fundamental scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FundamentalMetrics {
    #[serde(default = "default_pe_ratio")]
    pub pe_ratio: f64,

    /// Year-over-year earnings growth as a fraction (0.18 = 18 %).
    #[serde(default = "default_earnings_growth")]
    pub earnings_growth: f64,

    #[serde(default = "default_revenue_growth")]
    pub revenue_growth: f64,

    #[serde(default = "default_profit_margin")]
    pub profit_margin: f64,

    #[serde(default = "default_debt_to_equity")]
    pub debt_to_equity: f64,

    /// Sector used for peer benchmarking.
    #[serde(default)]
    pub sector: Sector,
}

impl Default for FundamentalMetrics {
    fn default() -> Self {
        Self {
            pe_ratio: default_pe_ratio(),
            earnings_growth: default_earnings_growth(),
            revenue_growth: default_revenue_growth(),
            profit_margin: default_profit_margin(),
            debt_to_equity: default_debt_to_equity(),
            sector: Sector::Unknown,
        }
    }
}

/// Direction of the current Fed policy cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum FedDirection {
    Hiking,
    Cutting,
    Holding,
}

impl Default for FedDirection {
    fn default() -> Self {
        Self::Holding
    }
}

/// 2-year / 10-year treasury yields, in percent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TreasuryYields {
    pub two_year: f64,
    pub ten_year: f64,
}

/// Inputs to the macro scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MacroMetrics {
    #[serde(default = "default_fed_rate")]
    pub fed_rate: f64,

    #[serde(default)]
    pub fed_direction: FedDirection,

    /// CPI year-over-year, in percent.
    #[serde(default = "default_cpi_yoy")]
    pub cpi_yoy: f64,

    /// GDP growth, in percent.
    #[serde(default = "default_gdp_growth")]
    pub gdp_growth: f64,

    /// Unemployment rate, in percent.
    #[serde(default = "default_unemployment")]
    pub unemployment: f64,

    /// Treasury yields for the curve analysis; skipped when absent.
    #[serde(default)]
    pub yield_curve: Option<TreasuryYields>,

    /// WTI crude price in $/barrel; oil analysis skipped when absent.
    #[serde(default)]
    pub wti_crude: Option<f64>,

    /// 30-day WTI change, in percent.
    #[serde(default)]
    pub wti_change_30d: f64,

    /// Dollar index (DXY); dollar analysis skipped when absent.
    #[serde(default)]
    pub dxy: Option<f64>,

    /// 30-day DXY change, in percent.
    #[serde(default)]
    pub dxy_change_30d: f64,

    /// Sector of the subject company (oil/dollar impact is sector-specific).
    #[serde(default)]
    pub sector: Sector,

    /// Whether the company derives significant revenue from exports.
    #[serde(default)]
    pub exporter: bool,

    /// Whether the company has significant foreign revenue.
    #[serde(default)]
    pub multinational: bool,
}

impl Default for MacroMetrics {
    fn default() -> Self {
        Self {
            fed_rate: default_fed_rate(),
            fed_direction: FedDirection::Holding,
            cpi_yoy: default_cpi_yoy(),
            gdp_growth: default_gdp_growth(),
            unemployment: default_unemployment(),
            yield_curve: None,
            wti_crude: None,
            wti_change_30d: 0.0,
            dxy: None,
            dxy_change_30d: 0.0,
            sector: Sector::Unknown,
            exporter: false,
            multinational: false,
        }
    }
}

/// Inputs to the risk scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskMetrics {
    /// Annualized volatility as a fraction (0.25 = 25 %).
    #[serde(default = "default_volatility")]
    pub volatility: f64,

    #[serde(default = "default_beta")]
    pub beta: f64,

    /// Maximum drawdown as a negative fraction (-0.08 = -8 %).
    #[serde(default)]
    pub max_drawdown: f64,

    #[serde(default = "default_correlation_spy")]
    pub correlation_spy: f64,

    /// Current position size as a fraction of portfolio.
    #[serde(default = "default_position_size")]
    pub position_size: f64,

    /// Daily returns, most recent last. Sharpe needs >= 20, VaR >= 30.
    #[serde(default)]
    pub returns: Vec<f64>,

    /// CDS spread in basis points; credit analysis skipped when absent.
    #[serde(default)]
    pub cds_spread: Option<f64>,

    /// Historical win rate for Kelly sizing.
    #[serde(default)]
    pub win_rate: Option<f64>,

    /// Average winning-trade return for Kelly sizing.
    #[serde(default)]
    pub avg_win: Option<f64>,

    /// Average losing-trade return for Kelly sizing.
    #[serde(default)]
    pub avg_loss: Option<f64>,
}

impl Default for RiskMetrics {
    fn default() -> Self {
        Self {
            volatility: default_volatility(),
            beta: default_beta(),
            max_drawdown: 0.0,
            correlation_spy: default_correlation_spy(),
            position_size: default_position_size(),
            returns: Vec::new(),
            cds_spread: None,
            win_rate: None,
            avg_win: None,
            avg_loss: None,
        }
    }
}

/// Inputs to the sentiment scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SentimentMetrics {
    /// Aggregate Twitter sentiment in [-1.0, 1.0].
    #[serde(default)]
    pub twitter_sentiment: f64,

    /// Tweet count over the last 24 h.
    #[serde(default)]
    pub twitter_volume: u64,

    /// Aggregate Reddit sentiment in [-1.0, 1.0].
    #[serde(default)]
    pub reddit_sentiment: f64,

    /// Reddit mention count over the last 24 h.
    #[serde(default)]
    pub reddit_mentions: u64,

    /// Fear & Greed index, 0-100. Neutral default 50.
    #[serde(default = "default_fear_greed")]
    pub fear_greed_index: f64,

    /// Social trending rank (1 = most trending). 100 = not trending.
    #[serde(default = "default_trending_rank")]
    pub trending_rank: u32,

    /// 24 h change in aggregate sentiment.
    #[serde(default)]
    pub sentiment_change_24h: f64,

    /// Fraction of bullish posts.
    #[serde(default = "default_bullish_ratio")]
    pub bullish_ratio: f64,
}

impl Default for SentimentMetrics {
    fn default() -> Self {
        Self {
            twitter_sentiment: 0.0,
            twitter_volume: 0,
            reddit_sentiment: 0.0,
            reddit_mentions: 0,
            fear_greed_index: default_fear_greed(),
            trending_rank: default_trending_rank(),
            sentiment_change_24h: 0.0,
            bullish_ratio: default_bullish_ratio(),
        }
    }
}

/// One news item, pre-scored by the upstream sentiment extractor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewsItem {
    pub headline: String,

    /// Body text; keyword scanning falls back to the headline when empty.
    #[serde(default)]
    pub body: String,

    /// Per-item sentiment in [-1.0, 1.0].
    #[serde(default)]
    pub sentiment: f64,

    /// Emergency items come from the breaking-news feed and are always
    /// treated as recent.
    #[serde(default)]
    pub emergency: bool,
}

/// Inputs to the news scorer. Sentiment extraction itself is upstream; this
/// bundle carries its outputs plus the raw items for keyword scanning.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NewsMetrics {
    /// News items, newest first.
    #[serde(default)]
    pub items: Vec<NewsItem>,

    /// Aggregate sentiment score in [-1.0, 1.0] from the upstream extractor.
    #[serde(default)]
    pub sentiment_score: f64,

    #[serde(default)]
    pub positive_count: u32,

    #[serde(default)]
    pub negative_count: u32,

    /// Key phrases surfaced by the extractor.
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// The subject company's role in the sector-competition landscape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitiveRole {
    /// Market leader whose moat is under examination.
    Incumbent,
    /// Primary challenger to the incumbent.
    Challenger,
    /// Co-developer of the challenger platform.
    CoDeveloper,
    /// Supplier with expanding challenger partnerships.
    Supplier,
    /// Alternative vendor benefiting from fragmentation.
    Alternative,
    /// Infrastructure provider serving all sides.
    Infrastructure,
    /// Not part of the competitive landscape under analysis.
    Uninvolved,
}

impl Default for CompetitiveRole {
    fn default() -> Self {
        Self::Uninvolved
    }
}

/// Verdict on how seriously the challenger threatens the incumbent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum DisruptionVerdict {
    Threat,
    Monitoring,
    Safe,
}

impl Default for DisruptionVerdict {
    fn default() -> Self {
        Self::Monitoring
    }
}

/// Inputs to the sector-competition scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectorMetrics {
    #[serde(default)]
    pub role: CompetitiveRole,

    #[serde(default)]
    pub verdict: DisruptionVerdict,

    /// Market disruption score; 100 is the neutral baseline.
    #[serde(default = "default_disruption_score")]
    pub disruption_score: f64,

    /// 3-year total cost of ownership for the incumbent platform.
    #[serde(default)]
    pub incumbent_tco: Option<f64>,

    /// 3-year total cost of ownership for the challenger platform.
    #[serde(default)]
    pub challenger_tco: Option<f64>,
}

impl Default for SectorMetrics {
    fn default() -> Self {
        Self {
            role: CompetitiveRole::Uninvolved,
            verdict: DisruptionVerdict::Monitoring,
            disruption_score: default_disruption_score(),
            incumbent_tco: None,
            challenger_tco: None,
        }
    }
}

// =============================================================================
// MetricBundle
// =============================================================================

/// Immutable per-deliberation input: one sub-bundle per domain.
///
/// Deserialising `{}` yields a fully-neutral bundle; every scorer then votes
/// HOLD at its neutral confidence.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MetricBundle {
    #[serde(default)]
    pub technical: TechnicalMetrics,

    #[serde(default)]
    pub fundamental: FundamentalMetrics,

    #[serde(default)]
    pub macro_data: MacroMetrics,

    #[serde(default)]
    pub risk: RiskMetrics,

    #[serde(default)]
    pub sentiment: SentimentMetrics,

    #[serde(default)]
    pub news: NewsMetrics,

    #[serde(default)]
    pub sector: SectorMetrics,
}
