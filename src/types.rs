// =============================================================================
// Shared types used across the Quorum consensus engine
// =============================================================================
//
// Every domain scorer emits a `Vote`; the arbiter remaps the wide action
// vocabulary down to BUY/SELL/HOLD before aggregation. Actions are modelled
// as enums (not strings) so the remap table is total and checkable at
// compile time.

use serde::{Deserialize, Serialize};

/// One independent analytical perspective on a ticker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Technical,
    Fundamental,
    Macro,
    Risk,
    Sentiment,
    News,
    SectorCompetition,
}

impl Domain {
    /// All domains in deliberation order (most authoritative first), matching
    /// the order votes are collected and logged.
    pub const ALL: [Domain; 7] = [
        Domain::Risk,
        Domain::Macro,
        Domain::Technical,
        Domain::News,
        Domain::Fundamental,
        Domain::Sentiment,
        Domain::SectorCompetition,
    ];
}

impl std::fmt::Display for Domain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Technical => write!(f, "technical"),
            Self::Fundamental => write!(f, "fundamental"),
            Self::Macro => write!(f, "macro"),
            Self::Risk => write!(f, "risk"),
            Self::Sentiment => write!(f, "sentiment"),
            Self::News => write!(f, "news"),
            Self::SectorCompetition => write!(f, "sector_competition"),
        }
    }
}

/// Full action vocabulary a domain scorer may emit.
///
/// The arbiter collapses these to [`ConsensusAction`] via
/// [`Action::to_consensus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Action {
    Buy,
    Sell,
    Hold,
    /// Keep the current position unchanged.
    Maintain,
    /// Partially exit the position.
    Reduce,
    /// Partially exit, taking profits.
    Trim,
    /// Grow an existing position.
    Increase,
    /// Add to an existing position.
    Add,
    /// Dollar-cost average into weakness.
    Dca,
}

impl Action {
    /// Collapse the wide vocabulary to the three consensus actions.
    ///
    /// MAINTAIN maps to HOLD; REDUCE/TRIM to SELL; INCREASE/ADD/DCA to BUY.
    pub fn to_consensus(self) -> ConsensusAction {
        match self {
            Self::Buy | Self::Increase | Self::Add | Self::Dca => ConsensusAction::Buy,
            Self::Sell | Self::Reduce | Self::Trim => ConsensusAction::Sell,
            Self::Hold | Self::Maintain => ConsensusAction::Hold,
        }
    }

    /// Parse an action label from an external record (e.g. a persisted vote).
    ///
    /// Unrecognized labels map to HOLD — the fail-safe default.
    pub fn parse_lenient(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "BUY" => Self::Buy,
            "SELL" => Self::Sell,
            "HOLD" => Self::Hold,
            "MAINTAIN" => Self::Maintain,
            "REDUCE" => Self::Reduce,
            "TRIM" => Self::Trim,
            "INCREASE" => Self::Increase,
            "ADD" => Self::Add,
            "DCA" => Self::Dca,
            _ => Self::Hold,
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
            Self::Maintain => write!(f, "MAINTAIN"),
            Self::Reduce => write!(f, "REDUCE"),
            Self::Trim => write!(f, "TRIM"),
            Self::Increase => write!(f, "INCREASE"),
            Self::Add => write!(f, "ADD"),
            Self::Dca => write!(f, "DCA"),
        }
    }
}

/// The three actions the consensus can resolve to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ConsensusAction {
    Buy,
    Sell,
    Hold,
}

impl From<ConsensusAction> for Action {
    fn from(action: ConsensusAction) -> Self {
        match action {
            ConsensusAction::Buy => Self::Buy,
            ConsensusAction::Sell => Self::Sell,
            ConsensusAction::Hold => Self::Hold,
        }
    }
}

impl std::fmt::Display for ConsensusAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Buy => write!(f, "BUY"),
            Self::Sell => write!(f, "SELL"),
            Self::Hold => write!(f, "HOLD"),
        }
    }
}

/// One domain's opinion on a ticker.
///
/// Created fresh per deliberation, immutable once returned, never mutated by
/// the arbiter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub domain: Domain,
    pub action: Action,
    /// Always within [0.0, 1.0] — clamped at construction.
    pub confidence: f64,
    /// Human-readable explanation of every rule that fired. Never empty.
    pub rationale: String,
    /// Structured supporting factors for persistence and dashboards.
    #[serde(default)]
    pub factors: serde_json::Map<String, serde_json::Value>,
}

impl Vote {
    /// Build a vote, enforcing the confidence-bounds and non-empty-rationale
    /// invariants.
    pub fn new(
        domain: Domain,
        action: Action,
        confidence: f64,
        rationale: impl Into<String>,
    ) -> Self {
        let rationale = rationale.into();
        Self {
            domain,
            action,
            confidence: if confidence.is_finite() {
                confidence.clamp(0.0, 1.0)
            } else {
                0.5
            },
            rationale: if rationale.is_empty() {
                format!("{domain} vote")
            } else {
                rationale
            },
            factors: serde_json::Map::new(),
        }
    }

    /// Attach the structured factor map.
    pub fn with_factors(mut self, factors: serde_json::Map<String, serde_json::Value>) -> Self {
        self.factors = factors;
        self
    }
}

/// A single OHLCV bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
}
