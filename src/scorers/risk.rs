// =============================================================================
// Risk Scorer — credit, tail risk, and volatility protection
// =============================================================================
//
// Cascade order (credit outranks everything):
//   1. CDS CRITICAL locks SELL; CDS HIGH sets SELL.
//   2. Sharpe and VaR/CVaR tiers — evaluated only while credit risk is
//      below HIGH, matching the credit override's authority.
//   3. Volatility / drawdown tiers.
//   4. Confidence adjustments: low credit risk, excellent Sharpe, benign
//      VaR, medium-risk Sharpe bonus.
//
// Kelly sizing is computed for the factor map when win/loss statistics are
// supplied; it informs position sizing downstream, never the action.

use anyhow::{bail, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::bundle::RiskMetrics;
use crate::metrics::credit::{assess_cds_spread, CreditAssessment, CreditRiskLevel};
use crate::metrics::kelly::{kelly_position, KellySizing};
use crate::metrics::sharpe::{annualized_sharpe, SHARPE_MIN_OBSERVATIONS};
use crate::metrics::var::{historical_var, VarEstimate, VAR_MIN_OBSERVATIONS};
use crate::scorers::cascade::{run_cascade, Effect, Rule};
use crate::types::{Action, Domain, Vote};

const CONFIDENCE_FLOOR: f64 = 0.40;
const CONFIDENCE_CEILING: f64 = 0.95;
const NEUTRAL_CONFIDENCE: f64 = 0.65;

/// Annual risk-free rate used for the Sharpe calculation.
const RISK_FREE_RATE: f64 = 0.04;

struct RiskContext {
    volatility: f64,
    beta: f64,
    max_drawdown: f64,
    cds: Option<CreditAssessment>,
    sharpe: Option<f64>,
    var: Option<VarEstimate>,
}

impl RiskContext {
    /// HIGH or CRITICAL credit risk suppresses the statistical tiers.
    fn credit_dominates(&self) -> bool {
        self.cds
            .map(|c| c.level >= CreditRiskLevel::High)
            .unwrap_or(false)
    }
}

pub struct RiskScorer;

impl RiskScorer {
    /// Assess risk posture for `ticker`.
    ///
    /// Never fails: malformed input degrades to a conservative HOLD vote.
    pub fn analyze(&self, ticker: &str, data: &RiskMetrics) -> Vote {
        match evaluate(ticker, data) {
            Ok(vote) => vote,
            Err(e) => {
                warn!(ticker, error = %e, "risk scorer fell back to HOLD");
                fallback_vote(ticker)
            }
        }
    }
}

fn fallback_vote(ticker: &str) -> Vote {
    let mut factors = serde_json::Map::new();
    factors.insert("error".to_string(), json!(true));
    factors.insert("risk_level".to_string(), json!("UNKNOWN"));
    Vote::new(
        Domain::Risk,
        Action::Hold,
        0.60,
        format!("Risk data unavailable for {ticker} - holding for safety"),
    )
    .with_factors(factors)
}

fn evaluate(ticker: &str, data: &RiskMetrics) -> Result<Vote> {
    for (name, value) in [
        ("volatility", data.volatility),
        ("beta", data.beta),
        ("max_drawdown", data.max_drawdown),
    ] {
        if !value.is_finite() {
            bail!("non-finite risk input: {name}");
        }
    }
    if data.returns.iter().any(|r| !r.is_finite()) {
        bail!("non-finite entry in returns series");
    }
    if let Some(spread) = data.cds_spread {
        if !spread.is_finite() || spread < 0.0 {
            bail!("invalid cds_spread: {spread}");
        }
    }

    let cds = data.cds_spread.map(assess_cds_spread);

    let sharpe = (data.returns.len() >= SHARPE_MIN_OBSERVATIONS)
        .then(|| annualized_sharpe(&data.returns, RISK_FREE_RATE));

    let var = (data.returns.len() >= VAR_MIN_OBSERVATIONS)
        .then(|| historical_var(&data.returns, 0.95));

    let kelly = match (data.win_rate, data.avg_win, data.avg_loss) {
        (Some(p), Some(w), Some(l)) => Some(kelly_position(p, w, l)),
        _ => None,
    };

    let ctx = RiskContext {
        volatility: data.volatility,
        beta: data.beta,
        max_drawdown: data.max_drawdown,
        cds,
        sharpe,
        var,
    };

    let neutral_rationale = format!(
        "{} risk (volatility {:.0}%, beta {:.2}) - size positions accordingly",
        if ctx.volatility < 0.30 { "Moderate" } else { "Elevated" },
        ctx.volatility * 100.0,
        ctx.beta
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
        "risk cascade complete"
    );

    Ok(
        Vote::new(Domain::Risk, outcome.action, outcome.confidence, outcome.rationale)
            .with_factors(build_factors(data, &ctx, kelly)),
    )
}

fn rules() -> Vec<Rule<RiskContext>> {
    vec![
        // --- Credit (highest authority) ------------------------------------
        Rule {
            name: "cds-critical",
            eval: |ctx, _| {
                ctx.cds
                    .filter(|c| c.level == CreditRiskLevel::Critical)
                    .map(|c| {
                        (
                            Effect::Lock {
                                action: Action::Sell,
                                confidence: 0.90,
                            },
                            format!(
                                "Critical credit risk (CDS {:.0}bps) - immediate exit recommended",
                                c.spread_bps
                            ),
                        )
                    })
            },
        },
        Rule {
            name: "cds-high",
            eval: |ctx, _| {
                ctx.cds
                    .filter(|c| c.level == CreditRiskLevel::High)
                    .map(|c| {
                        (
                            Effect::Set {
                                action: Action::Sell,
                                confidence: 0.80,
                            },
                            format!(
                                "High credit risk (CDS {:.0}bps) - speculative grade, default risk rising",
                                c.spread_bps
                            ),
                        )
                    })
            },
        },
        Rule {
            name: "cds-low-boost",
            eval: |ctx, _| {
                ctx.cds
                    .filter(|c| c.level == CreditRiskLevel::Low)
                    .map(|c| {
                        (
                            Effect::Adjust(c.confidence_modifier),
                            format!("Low credit risk (CDS {:.0}bps)", c.spread_bps),
                        )
                    })
            },
        },
        // --- Sharpe tiers (suppressed under credit dominance) --------------
        Rule {
            name: "sharpe-poor",
            eval: |ctx, _| {
                if ctx.credit_dominates() {
                    return None;
                }
                ctx.sharpe.filter(|s| *s < 0.5).map(|s| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.85,
                        },
                        format!("Poor Sharpe ratio ({s:.2} < 0.5) - return does not pay for the risk"),
                    )
                })
            },
        },
        Rule {
            name: "sharpe-excellent",
            eval: |ctx, _| {
                if ctx.credit_dominates() {
                    return None;
                }
                ctx.sharpe.filter(|s| *s > 1.5).map(|s| {
                    (
                        Effect::Adjust(0.15),
                        format!("Excellent Sharpe ratio ({s:.2})"),
                    )
                })
            },
        },
        // --- VaR tiers (mutually exclusive, after the Sharpe tiers) --------
        Rule {
            name: "var-breach",
            eval: |ctx, _| {
                if ctx.credit_dominates() {
                    return None;
                }
                ctx.var
                    .filter(|v| v.sufficient_data && v.var_1day < -0.05)
                    .map(|v| {
                        (
                            Effect::Set {
                                action: Action::Sell,
                                confidence: 0.88,
                            },
                            format!(
                                "1-day VaR breach ({:.2}%), CVaR {:.2}% - loss limit at risk",
                                v.var_1day * 100.0,
                                v.cvar * 100.0
                            ),
                        )
                    })
            },
        },
        Rule {
            name: "cvar-tail-risk",
            eval: |ctx, _| {
                if ctx.credit_dominates() {
                    return None;
                }
                ctx.var
                    .filter(|v| v.sufficient_data && v.var_1day >= -0.05 && v.cvar < -0.10)
                    .map(|v| {
                        (
                            Effect::Adjust(-0.10),
                            format!("Extreme tail risk (CVaR {:.2}%)", v.cvar * 100.0),
                        )
                    })
            },
        },
        Rule {
            name: "var-benign",
            eval: |ctx, _| {
                if ctx.credit_dominates() {
                    return None;
                }
                ctx.var
                    .filter(|v| {
                        v.sufficient_data
                            && v.var_1day >= -0.05
                            && v.cvar >= -0.10
                            && v.var_1day > -0.02
                    })
                    .map(|v| {
                        (
                            Effect::Adjust(0.05),
                            format!("Contained downside (1-day VaR {:.2}%)", v.var_1day * 100.0),
                        )
                    })
            },
        },
        // --- Volatility / drawdown tiers ------------------------------------
        Rule {
            name: "high-volatility-or-drawdown",
            eval: |ctx, _| {
                if ctx.credit_dominates() {
                    return None;
                }
                (ctx.volatility > 0.40 || ctx.max_drawdown < -0.10).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.85,
                        },
                        format!(
                            "High risk state (volatility {:.0}%, max drawdown {:.1}%) - capital protection first",
                            ctx.volatility * 100.0,
                            ctx.max_drawdown * 100.0
                        ),
                    )
                })
            },
        },
        Rule {
            name: "elevated-volatility-high-beta",
            eval: |ctx, _| {
                if ctx.credit_dominates() {
                    return None;
                }
                (ctx.volatility > 0.30 && ctx.beta > 1.5).then(|| {
                    (
                        Effect::Set {
                            action: Action::Hold,
                            confidence: 0.75,
                        },
                        format!(
                            "Elevated volatility ({:.0}%) with high beta ({:.2}) - stand aside",
                            ctx.volatility * 100.0,
                            ctx.beta
                        ),
                    )
                })
            },
        },
        Rule {
            name: "low-risk-entry",
            eval: |ctx, _| {
                if ctx.credit_dominates() {
                    return None;
                }
                (ctx.volatility < 0.20 && ctx.max_drawdown > -0.05).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: 0.87,
                        },
                        format!(
                            "Low risk (volatility {:.0}%, drawdown {:.1}%) - safe entry window",
                            ctx.volatility * 100.0,
                            ctx.max_drawdown * 100.0
                        ),
                    )
                })
            },
        },
        Rule {
            name: "low-risk-sharpe-bonus",
            eval: |ctx, state| {
                (state.action == Action::Buy && ctx.sharpe.map(|s| s > 1.5).unwrap_or(false))
                    .then(|| {
                        (
                            Effect::Adjust(0.10),
                            "Sharpe confirms the entry".to_string(),
                        )
                    })
            },
        },
        Rule {
            name: "medium-risk-sharpe",
            eval: |ctx, state| {
                if state.decided || ctx.credit_dominates() {
                    return None;
                }
                ctx.sharpe.filter(|s| *s > 1.0).map(|s| {
                    (
                        Effect::Adjust(0.10),
                        format!("Healthy Sharpe ratio ({s:.2})"),
                    )
                })
            },
        },
    ]
}

fn build_factors(
    data: &RiskMetrics,
    ctx: &RiskContext,
    kelly: Option<KellySizing>,
) -> serde_json::Map<String, serde_json::Value> {
    let mut factors = serde_json::Map::new();
    factors.insert(
        "volatility".to_string(),
        json!(format!("{:.1}%", ctx.volatility * 100.0)),
    );
    factors.insert("beta".to_string(), json!(ctx.beta));
    factors.insert(
        "max_drawdown".to_string(),
        json!(format!("{:.1}%", ctx.max_drawdown * 100.0)),
    );
    factors.insert("correlation_spy".to_string(), json!(data.correlation_spy));
    factors.insert(
        "position_size".to_string(),
        json!(format!("{:.1}%", data.position_size * 100.0)),
    );
    factors.insert(
        "risk_level".to_string(),
        json!(if ctx.volatility > 0.30 {
            "HIGH"
        } else if ctx.volatility > 0.20 {
            "MEDIUM"
        } else {
            "LOW"
        }),
    );

    if let Some(cds) = ctx.cds {
        factors.insert(
            "cds_premium".to_string(),
            json!({
                "spread_bps": cds.spread_bps,
                "credit_risk": cds.level,
                "risk_score": format!("{:.1}/10", cds.risk_score),
            }),
        );
    }

    if let Some(sharpe) = ctx.sharpe {
        factors.insert("sharpe_ratio".to_string(), json!(format!("{sharpe:.2}")));
    }

    if let Some(var) = ctx.var {
        factors.insert(
            "var_1day".to_string(),
            json!(format!("{:.2}%", var.var_1day * 100.0)),
        );
        factors.insert("cvar".to_string(), json!(format!("{:.2}%", var.cvar * 100.0)));
    }

    if let Some(kelly) = kelly {
        factors.insert(
            "kelly".to_string(),
            json!({
                "kelly_fraction": kelly.kelly_fraction,
                "half_kelly": kelly.half_kelly,
                "recommended_fraction": kelly.recommended_fraction,
            }),
        );
    }

    factors
}
