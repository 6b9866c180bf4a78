// =============================================================================
// Sector-Competition Scorer — platform wars and moat erosion
// =============================================================================
//
// Votes by the subject company's role in the competitive landscape crossed
// with the disruption verdict. The decision matrix (role x verdict):
//
//   Incumbent:      THREAT -> SELL   MONITORING -> HOLD   SAFE -> BUY
//   Challenger:     THREAT -> BUY    MONITORING -> HOLD   SAFE -> SELL
//   CoDeveloper:    THREAT -> BUY    MONITORING -> HOLD   SAFE -> HOLD
//   Supplier:       THREAT -> BUY    otherwise  -> HOLD
//   Alternative:    THREAT -> BUY    otherwise  -> HOLD
//   Infrastructure: THREAT -> BUY    otherwise  -> HOLD
//
// Confidence scales with the disruption score for the incumbent and the
// challenger. A ticker outside the landscape abstains with a zero-weight
// HOLD.

use anyhow::{bail, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::bundle::{CompetitiveRole, DisruptionVerdict, SectorMetrics};
use crate::types::{Action, Domain, Vote};

pub struct SectorCompetitionScorer;

impl SectorCompetitionScorer {
    /// Assess competitive-landscape impact for `ticker`.
    ///
    /// Never fails: malformed input degrades to a conservative HOLD vote.
    pub fn analyze(&self, ticker: &str, data: &SectorMetrics) -> Vote {
        match evaluate(ticker, data) {
            Ok(vote) => vote,
            Err(e) => {
                warn!(ticker, error = %e, "sector-competition scorer fell back to HOLD");
                fallback_vote(ticker)
            }
        }
    }
}

fn fallback_vote(ticker: &str) -> Vote {
    let mut factors = serde_json::Map::new();
    factors.insert("error".to_string(), json!(true));
    Vote::new(
        Domain::SectorCompetition,
        Action::Hold,
        0.30,
        format!("Sector-competition analysis unavailable for {ticker}"),
    )
    .with_factors(factors)
}

fn evaluate(ticker: &str, data: &SectorMetrics) -> Result<Vote> {
    if !data.disruption_score.is_finite() {
        bail!("non-finite disruption score");
    }

    // Abstain on tickers outside the landscape: a zero-confidence HOLD
    // carries no weight in the consensus.
    if data.role == CompetitiveRole::Uninvolved {
        debug!(ticker, "outside the competitive landscape, abstaining");
        return Ok(Vote::new(
            Domain::SectorCompetition,
            Action::Hold,
            0.0,
            format!("{ticker} is outside the analyzed competitive landscape"),
        ));
    }

    let score = data.disruption_score;
    let cost_advantage = cost_advantage_pct(data);

    let (action, confidence, rationale) = match (data.role, data.verdict) {
        // Incumbent: inverse of the threat level.
        (CompetitiveRole::Incumbent, DisruptionVerdict::Threat) => (
            Action::Sell,
            ((score - 100.0) / 100.0).min(0.75),
            format!(
                "Incumbent moat under threat (disruption {score:.0}): challenger gaining share{} - reduce exposure",
                advantage_note(cost_advantage)
            ),
        ),
        (CompetitiveRole::Incumbent, DisruptionVerdict::Monitoring) => (
            Action::Hold,
            0.60,
            format!(
                "Incumbent moat needs monitoring (disruption {score:.0}) - challenger progress uncertain"
            ),
        ),
        (CompetitiveRole::Incumbent, DisruptionVerdict::Safe) => (
            Action::Buy,
            (1.0 - score / 200.0).min(0.85),
            format!(
                "Incumbent moat intact (disruption {score:.0}) - ecosystem advantage holding"
            ),
        ),

        // Challenger: aligned with the threat level.
        (CompetitiveRole::Challenger, DisruptionVerdict::Threat) => (
            Action::Buy,
            ((score - 100.0) / 120.0).min(0.80),
            format!(
                "Challenger platform disrupting (score {score:.0}){} - positioned to take share",
                advantage_note(cost_advantage)
            ),
        ),
        (CompetitiveRole::Challenger, DisruptionVerdict::Monitoring) => (
            Action::Hold,
            0.55,
            format!(
                "Challenger showing moderate potential (disruption {score:.0}) - adoption unconfirmed"
            ),
        ),
        (CompetitiveRole::Challenger, DisruptionVerdict::Safe) => (
            Action::Sell,
            0.65,
            format!(
                "Challenger failing to disrupt (score {score:.0}) - incumbent moat intact"
            ),
        ),

        // Co-developer of the challenger platform.
        (CompetitiveRole::CoDeveloper, DisruptionVerdict::Threat) => (
            Action::Buy,
            0.65,
            format!(
                "Platform co-development paying off (disruption {score:.0}){} - infrastructure costs falling",
                advantage_note(cost_advantage)
            ),
        ),
        (CompetitiveRole::CoDeveloper, DisruptionVerdict::Monitoring) => (
            Action::Hold,
            0.50,
            format!("Co-developed platform outcome uncertain (disruption {score:.0})"),
        ),
        (CompetitiveRole::CoDeveloper, DisruptionVerdict::Safe) => (
            Action::Hold,
            0.40,
            format!(
                "Co-developed platform not materializing (disruption {score:.0}) - cost pressure persists"
            ),
        ),

        // Supplier with challenger partnerships.
        (CompetitiveRole::Supplier, DisruptionVerdict::Threat) => (
            Action::Buy,
            0.70,
            format!(
                "Supplier positioned for challenger growth (disruption {score:.0}) - partnerships expanding"
            ),
        ),
        (CompetitiveRole::Supplier, _) => (
            Action::Hold,
            0.50,
            format!("Supplier exposure neutral (disruption {score:.0}) - diversified revenue"),
        ),

        // Alternative vendors gain from fragmentation.
        (CompetitiveRole::Alternative, DisruptionVerdict::Threat) => (
            Action::Buy,
            0.60,
            format!(
                "Alternative vendor benefits from competition (disruption {score:.0}) - pricing pressure on the leader"
            ),
        ),
        (CompetitiveRole::Alternative, _) => (
            Action::Hold,
            0.45,
            format!(
                "Alternative vendor impact neutral (disruption {score:.0}) - leader dominance intact"
            ),
        ),

        // Infrastructure wins whoever wins, more so in an arms race.
        (CompetitiveRole::Infrastructure, DisruptionVerdict::Threat) => (
            Action::Buy,
            0.65,
            format!(
                "Infrastructure play (disruption {score:.0}): competition drives sector-wide spending"
            ),
        ),
        (CompetitiveRole::Infrastructure, _) => (
            Action::Hold,
            0.55,
            format!(
                "Infrastructure play (disruption {score:.0}): stable demand from the incumbent"
            ),
        ),

        (CompetitiveRole::Uninvolved, _) => unreachable!("handled above"),
    };

    debug!(
        ticker,
        role = ?data.role,
        verdict = ?data.verdict,
        action = %action,
        confidence = format!("{:.2}", confidence),
        "sector-competition matrix resolved"
    );

    let mut factors = serde_json::Map::new();
    factors.insert("role".to_string(), json!(data.role));
    factors.insert("verdict".to_string(), json!(data.verdict));
    factors.insert("disruption_score".to_string(), json!(score));
    if let Some(adv) = cost_advantage {
        factors.insert(
            "cost_advantage_pct".to_string(),
            json!((adv * 10.0).round() / 10.0),
        );
    }
    if let Some(tco) = data.incumbent_tco {
        factors.insert("incumbent_tco".to_string(), json!(tco));
    }
    if let Some(tco) = data.challenger_tco {
        factors.insert("challenger_tco".to_string(), json!(tco));
    }

    Ok(Vote::new(Domain::SectorCompetition, action, confidence, rationale).with_factors(factors))
}

/// Challenger cost advantage over the incumbent, in percent of the
/// incumbent's TCO.
fn cost_advantage_pct(data: &SectorMetrics) -> Option<f64> {
    match (data.incumbent_tco, data.challenger_tco) {
        (Some(incumbent), Some(challenger)) if incumbent > 0.0 => {
            Some((incumbent - challenger) / incumbent * 100.0)
        }
        _ => None,
    }
}

fn advantage_note(cost_advantage: Option<f64>) -> String {
    cost_advantage
        .map(|adv| format!(", cost advantage {adv:.1}%"))
        .unwrap_or_default()
}
