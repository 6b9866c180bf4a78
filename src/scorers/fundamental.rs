// =============================================================================
// Fundamental Scorer — valuation, growth, and peer positioning
// =============================================================================
//
// Cascade order:
//   1. A PEG below 0.5 (deeply undervalued growth) decides BUY ahead of the
//      traditional tiers.
//   2. Traditional tiers: strong fundamentals, steady growth with low debt,
//      deteriorating fundamentals, overvaluation.
//   3. PEG band adjustments (undervalued boost on a standing BUY,
//      overvalued penalty).
//   4. Peer-comparison effects: a sector LEADER upgrades HOLD to BUY; a
//      LAGGING name strengthens SELL and weakens BUY.

use anyhow::{bail, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::bundle::FundamentalMetrics;
use crate::metrics::peer::{compare_with_peers, CompetitivePosition, PeerComparison};
use crate::metrics::peg::{assess_peg, PegAssessment, PegValuation};
use crate::scorers::cascade::{run_cascade, Effect, Rule};
use crate::types::{Action, Domain, Vote};

const CONFIDENCE_FLOOR: f64 = 0.40;
const CONFIDENCE_CEILING: f64 = 0.95;
const NEUTRAL_CONFIDENCE: f64 = 0.65;

struct FundamentalContext {
    pe_ratio: f64,
    earnings_growth: f64,
    profit_margin: f64,
    debt_to_equity: f64,
    peg: PegAssessment,
    peers: PeerComparison,
}

impl FundamentalContext {
    fn peg_meaningful(&self) -> bool {
        self.peg.valuation != PegValuation::NotMeaningful
    }
}

pub struct FundamentalScorer;

impl FundamentalScorer {
    /// Assess fundamentals for `ticker`.
    ///
    /// Never fails: malformed input degrades to a conservative HOLD vote.
    pub fn analyze(&self, ticker: &str, data: &FundamentalMetrics) -> Vote {
        match evaluate(ticker, data) {
            Ok(vote) => vote,
            Err(e) => {
                warn!(ticker, error = %e, "fundamental scorer fell back to HOLD");
                fallback_vote(ticker)
            }
        }
    }
}

fn fallback_vote(ticker: &str) -> Vote {
    let mut factors = serde_json::Map::new();
    factors.insert("error".to_string(), json!(true));
    Vote::new(
        Domain::Fundamental,
        Action::Hold,
        0.55,
        format!("Fundamental data unavailable for {ticker} - further research needed"),
    )
    .with_factors(factors)
}

fn evaluate(ticker: &str, data: &FundamentalMetrics) -> Result<Vote> {
    for (name, value) in [
        ("pe_ratio", data.pe_ratio),
        ("earnings_growth", data.earnings_growth),
        ("revenue_growth", data.revenue_growth),
        ("profit_margin", data.profit_margin),
        ("debt_to_equity", data.debt_to_equity),
    ] {
        if !value.is_finite() {
            bail!("non-finite fundamental input: {name}");
        }
    }

    let peg = assess_peg(data.pe_ratio, data.earnings_growth);
    let peers = compare_with_peers(
        data.sector,
        data.pe_ratio,
        data.revenue_growth,
        data.profit_margin,
    );

    let ctx = FundamentalContext {
        pe_ratio: data.pe_ratio,
        earnings_growth: data.earnings_growth,
        profit_margin: data.profit_margin,
        debt_to_equity: data.debt_to_equity,
        peg,
        peers,
    };

    let neutral_rationale = format!(
        "Neutral fundamentals (P/E {:.1}, earnings growth {:+.1}%) - more evidence needed",
        ctx.pe_ratio,
        ctx.earnings_growth * 100.0
    );

    let outcome = run_cascade(
        &rules(),
        &ctx,
        NEUTRAL_CONFIDENCE,
        &neutral_rationale,
        CONFIDENCE_FLOOR,
        CONFIDENCE_CEILING,
    );

    debug!(
        ticker,
        action = %outcome.action,
        confidence = format!("{:.2}", outcome.confidence),
        fired = ?outcome.fired,
        "fundamental cascade complete"
    );

    Ok(
        Vote::new(Domain::Fundamental, outcome.action, outcome.confidence, outcome.rationale)
            .with_factors(build_factors(data, &ctx)),
    )
}

fn rules() -> Vec<Rule<FundamentalContext>> {
    vec![
        Rule {
            name: "peg-deep-value",
            eval: |ctx, _| {
                (ctx.peg_meaningful() && ctx.peg.ratio < 0.5).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: 0.90,
                        },
                        format!(
                            "Deeply undervalued growth (PEG {:.2}, P/E {:.1}, growth {:.1}%)",
                            ctx.peg.ratio,
                            ctx.pe_ratio,
                            ctx.earnings_growth * 100.0
                        ),
                    )
                })
            },
        },
        Rule {
            name: "strong-fundamentals",
            eval: |ctx, _| {
                (ctx.earnings_growth > 0.15 && ctx.pe_ratio < 25.0 && ctx.profit_margin > 0.20)
                    .then(|| {
                        (
                            Effect::Set {
                                action: Action::Buy,
                                confidence: 0.88,
                            },
                            format!(
                                "Strong fundamentals (earnings +{:.1}%, P/E {:.1}, margin {:.1}%)",
                                ctx.earnings_growth * 100.0,
                                ctx.pe_ratio,
                                ctx.profit_margin * 100.0
                            ),
                        )
                    })
            },
        },
        Rule {
            name: "steady-growth-low-debt",
            eval: |ctx, _| {
                (ctx.earnings_growth > 0.10 && ctx.debt_to_equity < 0.40).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: 0.80,
                        },
                        format!(
                            "Steady growth (earnings +{:.1}%) with low leverage (D/E {:.2})",
                            ctx.earnings_growth * 100.0,
                            ctx.debt_to_equity
                        ),
                    )
                })
            },
        },
        Rule {
            name: "deteriorating-fundamentals",
            eval: |ctx, _| {
                (ctx.earnings_growth < -0.05 || ctx.profit_margin < 0.05).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.78,
                        },
                        format!(
                            "Deteriorating fundamentals (earnings {:+.1}%, margin {:.1}%)",
                            ctx.earnings_growth * 100.0,
                            ctx.profit_margin * 100.0
                        ),
                    )
                })
            },
        },
        Rule {
            name: "overvaluation",
            eval: |ctx, _| {
                (ctx.pe_ratio > 40.0 && ctx.earnings_growth < 0.10).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.72,
                        },
                        format!(
                            "Overvaluation concern (P/E {:.1} against {:.1}% growth)",
                            ctx.pe_ratio,
                            ctx.earnings_growth * 100.0
                        ),
                    )
                })
            },
        },
        // --- PEG band adjustments ------------------------------------------
        Rule {
            name: "peg-undervalued-boost",
            eval: |ctx, state| {
                (ctx.peg_meaningful()
                    && ctx.peg.ratio >= 0.5
                    && ctx.peg.ratio < 1.0
                    && state.action == Action::Buy)
                    .then(|| {
                        (
                            Effect::Adjust(0.20),
                            format!("PEG {:.2} (cheap for its growth)", ctx.peg.ratio),
                        )
                    })
            },
        },
        Rule {
            name: "peg-overvalued-penalty",
            eval: |ctx, _| {
                (ctx.peg_meaningful() && ctx.peg.ratio > 2.0).then(|| {
                    (
                        Effect::Adjust(-0.15),
                        format!("PEG {:.2} (expensive for its growth)", ctx.peg.ratio),
                    )
                })
            },
        },
        // --- Peer comparison ------------------------------------------------
        Rule {
            name: "peer-leader",
            eval: |ctx, state| {
                if ctx.peers.position != CompetitivePosition::Leader {
                    return None;
                }
                match state.action {
                    Action::Buy => Some((
                        Effect::Adjust(0.15),
                        format!("{:?} sector leader", ctx.peers.sector),
                    )),
                    Action::Hold => Some((
                        Effect::Override {
                            action: Action::Buy,
                            confidence: 0.75,
                        },
                        format!(
                            "Competitive edge within the {:?} sector - upgrade to buy",
                            ctx.peers.sector
                        ),
                    )),
                    _ => None,
                }
            },
        },
        Rule {
            name: "peer-lagging",
            eval: |ctx, state| {
                if ctx.peers.position != CompetitivePosition::Lagging {
                    return None;
                }
                match state.action {
                    Action::Sell => Some((
                        Effect::Adjust(0.10),
                        format!("Lagging the {:?} sector", ctx.peers.sector),
                    )),
                    Action::Buy => Some((
                        Effect::Adjust(-0.15),
                        format!("Lagging the {:?} sector (caution)", ctx.peers.sector),
                    )),
                    _ => None,
                }
            },
        },
    ]
}

fn build_factors(
    data: &FundamentalMetrics,
    ctx: &FundamentalContext,
) -> serde_json::Map<String, serde_json::Value> {
    let mut factors = serde_json::Map::new();
    factors.insert("pe_ratio".to_string(), json!(ctx.pe_ratio));
    factors.insert(
        "earnings_growth".to_string(),
        json!(format!("{:+.1}%", ctx.earnings_growth * 100.0)),
    );
    factors.insert(
        "revenue_growth".to_string(),
        json!(format!("{:+.1}%", data.revenue_growth * 100.0)),
    );
    factors.insert(
        "profit_margin".to_string(),
        json!(format!("{:.1}%", ctx.profit_margin * 100.0)),
    );
    factors.insert("debt_to_equity".to_string(), json!(ctx.debt_to_equity));
    factors.insert(
        "valuation".to_string(),
        json!(if ctx.pe_ratio < 20.0 {
            "UNDERVALUED"
        } else if ctx.pe_ratio > 30.0 {
            "OVERVALUED"
        } else {
            "FAIR"
        }),
    );

    if ctx.peg_meaningful() {
        factors.insert(
            "peg_ratio".to_string(),
            json!((ctx.peg.ratio * 100.0).round() / 100.0),
        );
        factors.insert("peg_valuation".to_string(), json!(ctx.peg.valuation));
    }

    factors.insert(
        "peer_comparison".to_string(),
        json!({
            "sector": ctx.peers.sector,
            "competitive_position": ctx.peers.position,
            "competitive_score": ctx.peers.score,
        }),
    );

    factors
}
