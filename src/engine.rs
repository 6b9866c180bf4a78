// =============================================================================
// Consensus Engine — concurrent deliberation across all domains
// =============================================================================
//
// The engine fans one metric bundle out to the seven domain scorers,
// evaluates them concurrently on tokio tasks (they share no mutable state),
// waits for every vote (no partial-result semantics), and hands the full
// vote list to the arbiter. A panicked scorer task is isolated by the task
// boundary and replaced with the domain's conservative fallback vote, so
// the arbiter always sees one vote per domain.
//
// The resulting Deliberation is the auditable record downstream layers
// persist and act on.

use chrono::Utc;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::bundle::MetricBundle;
use crate::config::EngineConfig;
use crate::consensus::{ConsensusArbiter, ConsensusResult};
use crate::scorers::{
    FundamentalScorer, MacroScorer, NewsScorer, RiskScorer, SectorCompetitionScorer,
    SentimentScorer, TechnicalScorer,
};
use crate::types::{Action, Domain, Vote};

/// Complete auditable record of one deliberation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deliberation {
    /// Unique identifier for this deliberation (UUID v4).
    pub id: String,

    pub ticker: String,

    /// One vote per domain, in deliberation order.
    pub votes: Vec<Vote>,

    pub consensus: ConsensusResult,

    /// Whether the consensus clears the configured execution gate.
    pub actionable: bool,

    /// ISO 8601 timestamp of when this deliberation completed.
    pub created_at: String,
}

/// The engine: seven scorers plus the arbiter under one config.
pub struct ConsensusEngine {
    config: EngineConfig,
    arbiter: ConsensusArbiter,
    last_deliberation: RwLock<Option<Deliberation>>,
}

impl ConsensusEngine {
    pub fn new(config: EngineConfig) -> Self {
        let arbiter = ConsensusArbiter::new(config.weights.clone());
        Self {
            config,
            arbiter,
            last_deliberation: RwLock::new(None),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Run a full deliberation for `ticker` over `bundle`.
    ///
    /// All seven scorers run concurrently; aggregation waits for every vote.
    /// This never fails — scorer errors and panics degrade to fallback HOLD
    /// votes per the scorer contracts.
    pub async fn deliberate(&self, ticker: &str, bundle: MetricBundle) -> Deliberation {
        info!(ticker, "deliberation starting");

        let handles: Vec<(Domain, JoinHandle<Vote>)> = vec![
            (Domain::Risk, {
                let t = ticker.to_string();
                let data = bundle.risk.clone();
                tokio::spawn(async move { RiskScorer.analyze(&t, &data) })
            }),
            (Domain::Macro, {
                let t = ticker.to_string();
                let data = bundle.macro_data.clone();
                tokio::spawn(async move { MacroScorer.analyze(&t, &data) })
            }),
            (Domain::Technical, {
                let t = ticker.to_string();
                let data = bundle.technical.clone();
                tokio::spawn(async move { TechnicalScorer.analyze(&t, &data) })
            }),
            (Domain::News, {
                let t = ticker.to_string();
                let data = bundle.news.clone();
                tokio::spawn(async move { NewsScorer.analyze(&t, &data) })
            }),
            (Domain::Fundamental, {
                let t = ticker.to_string();
                let data = bundle.fundamental.clone();
                tokio::spawn(async move { FundamentalScorer.analyze(&t, &data) })
            }),
            (Domain::Sentiment, {
                let t = ticker.to_string();
                let data = bundle.sentiment.clone();
                tokio::spawn(async move { SentimentScorer.analyze(&t, &data) })
            }),
            (Domain::SectorCompetition, {
                let t = ticker.to_string();
                let data = bundle.sector.clone();
                tokio::spawn(async move { SectorCompetitionScorer.analyze(&t, &data) })
            }),
        ];

        // Barrier: every scorer completes before arbitration. A panicked
        // task yields the domain fallback instead of poisoning the round.
        let mut votes = Vec::with_capacity(handles.len());
        for (domain, handle) in handles {
            let vote = match handle.await {
                Ok(vote) => vote,
                Err(e) => {
                    warn!(%domain, error = %e, "scorer task failed - using fallback vote");
                    panic_fallback_vote(domain)
                }
            };
            info!(
                ticker,
                domain = %vote.domain,
                action = %vote.action,
                confidence = format!("{:.2}", vote.confidence),
                "vote collected"
            );
            votes.push(vote);
        }

        let consensus = self.arbiter.arbitrate(&votes);
        let actionable = consensus.confidence >= self.config.signal_confidence_threshold;

        info!(
            ticker,
            action = %consensus.action,
            confidence = format!("{:.2}", consensus.confidence),
            actionable,
            "deliberation complete"
        );

        let deliberation = Deliberation {
            id: uuid::Uuid::new_v4().to_string(),
            ticker: ticker.to_string(),
            votes,
            consensus,
            actionable,
            created_at: Utc::now().to_rfc3339(),
        };

        *self.last_deliberation.write() = Some(deliberation.clone());
        deliberation
    }

    /// Most recent deliberation, for dashboard-style readers.
    pub fn last_deliberation(&self) -> Option<Deliberation> {
        self.last_deliberation.read().clone()
    }
}

impl Default for ConsensusEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Fallback vote used when a scorer task itself dies (panic or cancel).
fn panic_fallback_vote(domain: Domain) -> Vote {
    let mut factors = serde_json::Map::new();
    factors.insert("error".to_string(), json!(true));
    Vote::new(
        domain,
        Action::Hold,
        0.50,
        format!("{domain} scorer unavailable - holding"),
    )
    .with_factors(factors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{FedDirection, MacroMetrics, RiskMetrics, SentimentMetrics};
    use crate::types::ConsensusAction;

    #[tokio::test]
    async fn neutral_bundle_produces_seven_votes() {
        let engine = ConsensusEngine::default();
        let result = engine.deliberate("AAPL", MetricBundle::default()).await;

        assert_eq!(result.votes.len(), 7);
        assert_eq!(result.votes[0].domain, Domain::Risk);
        assert_eq!(result.votes[6].domain, Domain::SectorCompetition);
        for vote in &result.votes {
            assert!((0.0..=1.0).contains(&vote.confidence));
            assert!(!vote.rationale.is_empty());
        }
        // All-neutral inputs: every scorer holds.
        assert_eq!(result.consensus.action, ConsensusAction::Hold);
    }

    #[tokio::test]
    async fn bearish_bundle_sells_and_gates() {
        let bundle = MetricBundle {
            risk: RiskMetrics {
                volatility: 0.45,
                max_drawdown: -0.12,
                cds_spread: Some(600.0),
                ..Default::default()
            },
            macro_data: MacroMetrics {
                fed_direction: FedDirection::Hiking,
                cpi_yoy: 5.5,
                ..Default::default()
            },
            sentiment: SentimentMetrics {
                twitter_sentiment: -0.8,
                reddit_sentiment: -0.7,
                twitter_volume: 20_000,
                ..Default::default()
            },
            ..Default::default()
        };

        let engine = ConsensusEngine::default();
        let result = engine.deliberate("AAPL", bundle).await;

        assert_eq!(result.consensus.action, ConsensusAction::Sell);
        assert!(result.consensus.score_breakdown.sell > result.consensus.score_breakdown.hold);
    }

    #[tokio::test]
    async fn actionable_flag_follows_threshold() {
        let mut config = EngineConfig::default();
        config.signal_confidence_threshold = 0.99;
        let engine = ConsensusEngine::new(config);
        let result = engine.deliberate("AAPL", MetricBundle::default()).await;
        assert!(!result.actionable);

        let mut config = EngineConfig::default();
        config.signal_confidence_threshold = 0.0;
        let engine = ConsensusEngine::new(config);
        let result = engine.deliberate("AAPL", MetricBundle::default()).await;
        assert!(result.actionable);
    }

    #[tokio::test]
    async fn last_deliberation_is_cached() {
        let engine = ConsensusEngine::default();
        assert!(engine.last_deliberation().is_none());

        let result = engine.deliberate("AAPL", MetricBundle::default()).await;
        let cached = engine.last_deliberation().unwrap();
        assert_eq!(cached.id, result.id);
        assert_eq!(cached.ticker, "AAPL");
    }

    #[tokio::test]
    async fn deliberation_serialises() {
        let engine = ConsensusEngine::default();
        let result = engine.deliberate("AAPL", MetricBundle::default()).await;
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"ticker\":\"AAPL\""));
        assert!(json.contains("score_breakdown"));
    }
}
