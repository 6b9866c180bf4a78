// =============================================================================
// Consensus Arbiter — weighted vote aggregation
// =============================================================================
//
// Each vote contributes weight x confidence to the score of its remapped
// consensus action. The winning action is the argmax with a fixed BUY >
// SELL > HOLD tie-break; consensus confidence is the winning share of the
// total score. Weights need not sum to 1 — the ratio normalizes them.
//
// The arbiter owns no domain logic: it sees only (domain, action,
// confidence) triples and is fully deterministic over them.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::types::{ConsensusAction, Domain, Vote};

/// Weight applied to a domain absent from the table.
pub const DEFAULT_DOMAIN_WEIGHT: f64 = 0.1;

// =============================================================================
// WeightTable
// =============================================================================

/// Per-domain voting weights, fixed at engine construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeightTable {
    weights: HashMap<Domain, f64>,
}

impl Default for WeightTable {
    fn default() -> Self {
        let mut weights = HashMap::new();
        weights.insert(Domain::Technical, 0.15);
        weights.insert(Domain::Risk, 0.15);
        weights.insert(Domain::Macro, 0.14);
        weights.insert(Domain::News, 0.14);
        weights.insert(Domain::SectorCompetition, 0.14);
        weights.insert(Domain::Fundamental, 0.12);
        weights.insert(Domain::Sentiment, 0.08);
        Self { weights }
    }
}

impl WeightTable {
    /// Build a table from explicit weights. Negative weights are clamped to
    /// zero with a warning; the table is not required to sum to 1.0.
    pub fn new(weights: HashMap<Domain, f64>) -> Self {
        let weights = weights
            .into_iter()
            .map(|(domain, w)| {
                if w < 0.0 || !w.is_finite() {
                    warn!(%domain, weight = w, "invalid domain weight clamped to 0");
                    (domain, 0.0)
                } else {
                    (domain, w)
                }
            })
            .collect();
        Self { weights }
    }

    /// Weight for `domain`, defaulting to [`DEFAULT_DOMAIN_WEIGHT`] when the
    /// domain is not configured.
    pub fn get(&self, domain: Domain) -> f64 {
        self.weights
            .get(&domain)
            .copied()
            .unwrap_or(DEFAULT_DOMAIN_WEIGHT)
    }
}

// =============================================================================
// ConsensusResult
// =============================================================================

/// Weighted score per consensus action. A fixed struct (not a map) keeps
/// serialization and iteration order deterministic.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ActionScores {
    pub buy: f64,
    pub sell: f64,
    pub hold: f64,
}

impl ActionScores {
    pub fn get(&self, action: ConsensusAction) -> f64 {
        match action {
            ConsensusAction::Buy => self.buy,
            ConsensusAction::Sell => self.sell,
            ConsensusAction::Hold => self.hold,
        }
    }

    fn add(&mut self, action: ConsensusAction, score: f64) {
        match action {
            ConsensusAction::Buy => self.buy += score,
            ConsensusAction::Sell => self.sell += score,
            ConsensusAction::Hold => self.hold += score,
        }
    }

    fn total(&self) -> f64 {
        self.buy + self.sell + self.hold
    }
}

/// Final arbitration output, derived entirely from the vote list and the
/// weight table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConsensusResult {
    pub action: ConsensusAction,
    /// Winning share of the total score, in [0, 1].
    pub confidence: f64,
    pub score_breakdown: ActionScores,
}

// =============================================================================
// ConsensusArbiter
// =============================================================================

/// Aggregates votes into one decision under a fixed weight table.
#[derive(Debug, Clone)]
pub struct ConsensusArbiter {
    weights: WeightTable,
}

impl ConsensusArbiter {
    pub fn new(weights: WeightTable) -> Self {
        Self { weights }
    }

    pub fn weights(&self) -> &WeightTable {
        &self.weights
    }

    /// Arbitrate a vote list into a [`ConsensusResult`].
    ///
    /// Accepts any subset of domains (including an empty list, which yields
    /// HOLD at confidence 0.5). Votes are never dropped or mutated.
    pub fn arbitrate(&self, votes: &[Vote]) -> ConsensusResult {
        let mut scores = ActionScores::default();

        for vote in votes {
            let weight = self.weights.get(vote.domain);
            scores.add(vote.action.to_consensus(), weight * vote.confidence);
        }

        let total = scores.total();
        if total <= 0.0 {
            debug!("no scoreable votes - defaulting to HOLD 0.5");
            return ConsensusResult {
                action: ConsensusAction::Hold,
                confidence: 0.5,
                score_breakdown: scores,
            };
        }

        // Fixed-priority argmax: BUY > SELL > HOLD on ties.
        let mut action = ConsensusAction::Buy;
        for candidate in [ConsensusAction::Sell, ConsensusAction::Hold] {
            if scores.get(candidate) > scores.get(action) {
                action = candidate;
            }
        }

        let confidence = scores.get(action) / total;

        debug!(
            action = %action,
            confidence = format!("{:.3}", confidence),
            buy = format!("{:.3}", scores.buy),
            sell = format!("{:.3}", scores.sell),
            hold = format!("{:.3}", scores.hold),
            "consensus resolved"
        );

        ConsensusResult {
            action,
            confidence,
            score_breakdown: scores,
        }
    }
}

impl Default for ConsensusArbiter {
    fn default() -> Self {
        Self::new(WeightTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Action;

    fn vote(domain: Domain, action: Action, confidence: f64) -> Vote {
        Vote::new(domain, action, confidence, "test vote")
    }

    #[test]
    fn empty_vote_list_defaults_to_hold() {
        let result = ConsensusArbiter::default().arbitrate(&[]);
        assert_eq!(result.action, ConsensusAction::Hold);
        assert!((result.confidence - 0.5).abs() < f64::EPSILON);
        assert!((result.score_breakdown.total() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn all_zero_confidence_defaults_to_hold() {
        let votes = vec![
            vote(Domain::Technical, Action::Buy, 0.0),
            vote(Domain::Risk, Action::Sell, 0.0),
        ];
        let result = ConsensusArbiter::default().arbitrate(&votes);
        assert_eq!(result.action, ConsensusAction::Hold);
        assert!((result.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn weighted_majority_wins() {
        let votes = vec![
            vote(Domain::Technical, Action::Buy, 0.9), // 0.15 * 0.9 = 0.135
            vote(Domain::Risk, Action::Buy, 0.8),      // 0.15 * 0.8 = 0.120
            vote(Domain::Macro, Action::Sell, 0.9),    // 0.14 * 0.9 = 0.126
        ];
        let result = ConsensusArbiter::default().arbitrate(&votes);
        assert_eq!(result.action, ConsensusAction::Buy);
        let expected = 0.255 / (0.255 + 0.126);
        assert!((result.confidence - expected).abs() < 1e-9);
    }

    #[test]
    fn wide_vocabulary_remaps_before_scoring() {
        let votes = vec![
            vote(Domain::Technical, Action::Add, 0.8),     // -> BUY
            vote(Domain::Fundamental, Action::Dca, 0.7),   // -> BUY
            vote(Domain::Risk, Action::Trim, 0.6),         // -> SELL
            vote(Domain::Sentiment, Action::Maintain, 0.9), // -> HOLD
        ];
        let result = ConsensusArbiter::default().arbitrate(&votes);
        // BUY: 0.15*0.8 + 0.12*0.7 = 0.204; SELL: 0.15*0.6 = 0.09;
        // HOLD: 0.08*0.9 = 0.072.
        assert_eq!(result.action, ConsensusAction::Buy);
        assert!((result.score_breakdown.buy - 0.204).abs() < 1e-9);
        assert!((result.score_breakdown.sell - 0.09).abs() < 1e-9);
        assert!((result.score_breakdown.hold - 0.072).abs() < 1e-9);
    }

    #[test]
    fn tie_breaks_buy_over_sell_over_hold() {
        // Equal weight x confidence across all three actions.
        let mut weights = HashMap::new();
        weights.insert(Domain::Technical, 0.2);
        weights.insert(Domain::Risk, 0.2);
        weights.insert(Domain::Macro, 0.2);
        let arbiter = ConsensusArbiter::new(WeightTable::new(weights));

        let votes = vec![
            vote(Domain::Technical, Action::Buy, 0.5),
            vote(Domain::Risk, Action::Sell, 0.5),
            vote(Domain::Macro, Action::Hold, 0.5),
        ];
        let result = arbiter.arbitrate(&votes);
        assert_eq!(result.action, ConsensusAction::Buy);
        assert!((result.confidence - 1.0 / 3.0).abs() < 1e-9);

        // SELL vs HOLD tie (no BUY score) resolves to SELL.
        let votes = vec![
            vote(Domain::Risk, Action::Sell, 0.5),
            vote(Domain::Macro, Action::Hold, 0.5),
        ];
        let result = arbiter.arbitrate(&votes);
        assert_eq!(result.action, ConsensusAction::Sell);
    }

    #[test]
    fn unknown_domain_gets_default_weight() {
        let arbiter = ConsensusArbiter::new(WeightTable::new(HashMap::new()));
        let votes = vec![vote(Domain::News, Action::Buy, 1.0)];
        let result = arbiter.arbitrate(&votes);
        assert!((result.score_breakdown.buy - DEFAULT_DOMAIN_WEIGHT).abs() < 1e-12);
    }

    #[test]
    fn partial_domain_coverage_is_valid() {
        let votes = vec![
            vote(Domain::Risk, Action::Sell, 0.9),
            vote(Domain::News, Action::Sell, 0.6),
        ];
        let result = ConsensusArbiter::default().arbitrate(&votes);
        assert_eq!(result.action, ConsensusAction::Sell);
        assert!((result.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn arbitration_is_deterministic() {
        let votes = vec![
            vote(Domain::Technical, Action::Buy, 0.82),
            vote(Domain::Risk, Action::Hold, 0.64),
            vote(Domain::Macro, Action::Sell, 0.71),
            vote(Domain::News, Action::Buy, 0.55),
        ];
        let arbiter = ConsensusArbiter::default();
        let a = arbiter.arbitrate(&votes);
        let b = arbiter.arbitrate(&votes);
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn negative_weights_clamp_to_zero() {
        let mut weights = HashMap::new();
        weights.insert(Domain::Technical, -0.5);
        let table = WeightTable::new(weights);
        assert!((table.get(Domain::Technical) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn weights_need_not_sum_to_one() {
        let mut weights = HashMap::new();
        weights.insert(Domain::Technical, 3.0);
        weights.insert(Domain::Risk, 1.0);
        let arbiter = ConsensusArbiter::new(WeightTable::new(weights));
        let votes = vec![
            vote(Domain::Technical, Action::Buy, 0.5), // 1.5
            vote(Domain::Risk, Action::Sell, 0.5),     // 0.5
        ];
        let result = arbiter.arbitrate(&votes);
        assert_eq!(result.action, ConsensusAction::Buy);
        assert!((result.confidence - 0.75).abs() < 1e-9);
    }
}
