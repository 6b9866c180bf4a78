// =============================================================================
// Macro Scorer — rates, inflation, growth, and cross-asset regimes
// =============================================================================
//
// Cascade order:
//   1. Yield-curve inversion locks SELL (recession signal, highest
//      priority). STEEP/FLATTENING only adjust confidence.
//   2. Fed-cycle and growth tiers: easing + disinflation, goldilocks,
//      tightening + hot inflation, slowdown.
//   3. Oil-price and dollar-index adjustments, conditioned on the subject
//      company's sector and export profile. These never re-decide the
//      action — once the inversion lock has fired they can only move
//      confidence, which is then clamped.

use anyhow::{bail, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::bundle::{FedDirection, MacroMetrics, Sector};
use crate::metrics::commodity::{classify_dollar_index, classify_oil_price, DollarSignal, OilSignal};
use crate::metrics::yield_curve::{classify_yield_curve, YieldCurveReading, YieldCurveSignal};
use crate::scorers::cascade::{run_cascade, Effect, Rule};
use crate::types::{Action, Domain, Vote};

const CONFIDENCE_FLOOR: f64 = 0.40;
const CONFIDENCE_CEILING: f64 = 0.95;
const NEUTRAL_CONFIDENCE: f64 = 0.65;

struct MacroContext {
    fed_direction: FedDirection,
    cpi_yoy: f64,
    gdp_growth: f64,
    unemployment: f64,
    curve: Option<YieldCurveReading>,
    oil: Option<(OilSignal, f64, f64)>,
    dollar: Option<(DollarSignal, f64, f64)>,
    sector: Sector,
    export_exposed: bool,
}

pub struct MacroScorer;

impl MacroScorer {
    /// Assess the macro environment's impact on `ticker`.
    ///
    /// Never fails: malformed input degrades to a conservative HOLD vote.
    pub fn analyze(&self, ticker: &str, data: &MacroMetrics) -> Vote {
        match evaluate(ticker, data) {
            Ok(vote) => vote,
            Err(e) => {
                warn!(ticker, error = %e, "macro scorer fell back to HOLD");
                fallback_vote(ticker)
            }
        }
    }
}

fn fallback_vote(ticker: &str) -> Vote {
    let mut factors = serde_json::Map::new();
    factors.insert("error".to_string(), json!(true));
    Vote::new(
        Domain::Macro,
        Action::Hold,
        0.60,
        format!("Macro data unavailable - {ticker} environment unclear"),
    )
    .with_factors(factors)
}

fn evaluate(ticker: &str, data: &MacroMetrics) -> Result<Vote> {
    for (name, value) in [
        ("fed_rate", data.fed_rate),
        ("cpi_yoy", data.cpi_yoy),
        ("gdp_growth", data.gdp_growth),
        ("unemployment", data.unemployment),
        ("wti_change_30d", data.wti_change_30d),
        ("dxy_change_30d", data.dxy_change_30d),
    ] {
        if !value.is_finite() {
            bail!("non-finite macro input: {name}");
        }
    }

    let curve = data
        .yield_curve
        .map(|y| classify_yield_curve(y.two_year, y.ten_year));

    let oil = data
        .wti_crude
        .filter(|p| p.is_finite())
        .map(|p| (classify_oil_price(p), p, data.wti_change_30d));

    let dollar = data
        .dxy
        .filter(|d| d.is_finite())
        .map(|d| (classify_dollar_index(d), d, data.dxy_change_30d));

    let ctx = MacroContext {
        fed_direction: data.fed_direction,
        cpi_yoy: data.cpi_yoy,
        gdp_growth: data.gdp_growth,
        unemployment: data.unemployment,
        curve,
        oil,
        dollar,
        sector: data.sector,
        export_exposed: data.exporter || data.multinational,
    };

    let neutral_rationale = format!(
        "Mixed macro picture (Fed {:?}, GDP {:.1}%, CPI {:.1}%)",
        ctx.fed_direction, ctx.gdp_growth, ctx.cpi_yoy
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
        "macro cascade complete"
    );

    Ok(
        Vote::new(Domain::Macro, outcome.action, outcome.confidence, outcome.rationale)
            .with_factors(build_factors(data, &ctx)),
    )
}

fn rules() -> Vec<Rule<MacroContext>> {
    vec![
        // --- Yield curve (highest priority) --------------------------------
        Rule {
            name: "yield-curve-inversion",
            eval: |ctx, _| {
                ctx.curve
                    .filter(|c| c.signal == YieldCurveSignal::Inverted)
                    .map(|c| {
                        (
                            Effect::Lock {
                                action: Action::Sell,
                                confidence: 0.85,
                            },
                            format!(
                                "Yield curve inverted (10Y-2Y = {:.0}bps) - recession risk",
                                c.spread_bps
                            ),
                        )
                    })
            },
        },
        Rule {
            name: "yield-curve-steep",
            eval: |ctx, _| {
                ctx.curve
                    .filter(|c| c.signal == YieldCurveSignal::Steep)
                    .map(|c| {
                        (
                            Effect::Adjust(0.15),
                            format!("Steep yield curve ({:.0}bps) - expansion expected", c.spread_bps),
                        )
                    })
            },
        },
        Rule {
            name: "yield-curve-flattening",
            eval: |ctx, _| {
                ctx.curve
                    .filter(|c| c.signal == YieldCurveSignal::Flattening)
                    .map(|c| {
                        (
                            Effect::Adjust(-0.10),
                            format!("Flattening yield curve ({:.0}bps) - slowdown warning", c.spread_bps),
                        )
                    })
            },
        },
        // --- Fed cycle and growth tiers ------------------------------------
        Rule {
            name: "easing-disinflation",
            eval: |ctx, _| {
                (ctx.fed_direction == FedDirection::Cutting && ctx.cpi_yoy < 3.0).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: 0.84,
                        },
                        format!(
                            "Rate-cut cycle with inflation cooling (CPI {:.1}%) - risk-on regime",
                            ctx.cpi_yoy
                        ),
                    )
                })
            },
        },
        Rule {
            name: "goldilocks",
            eval: |ctx, _| {
                (ctx.gdp_growth > 2.5 && ctx.unemployment < 4.0 && ctx.cpi_yoy < 3.5).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: 0.78,
                        },
                        format!(
                            "Goldilocks economy (GDP +{:.1}%, unemployment {:.1}%, inflation contained)",
                            ctx.gdp_growth, ctx.unemployment
                        ),
                    )
                })
            },
        },
        Rule {
            name: "tightening-hot-inflation",
            eval: |ctx, _| {
                (ctx.fed_direction == FedDirection::Hiking && ctx.cpi_yoy > 4.5).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.76,
                        },
                        format!(
                            "Tightening cycle with hot inflation (CPI {:.1}%) - risk-off regime",
                            ctx.cpi_yoy
                        ),
                    )
                })
            },
        },
        Rule {
            name: "slowdown",
            eval: |ctx, _| {
                (ctx.gdp_growth < 1.0 || ctx.unemployment > 5.0).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.72,
                        },
                        format!(
                            "Slowdown risk (GDP {:.1}%, unemployment {:.1}%)",
                            ctx.gdp_growth, ctx.unemployment
                        ),
                    )
                })
            },
        },
        // --- Oil price (sector-conditional, confidence-only) ---------------
        Rule {
            name: "oil-high-energy",
            eval: |ctx, _| {
                ctx.oil
                    .filter(|(s, _, _)| *s == OilSignal::High && ctx.sector == Sector::Energy)
                    .map(|(_, price, _)| {
                        (
                            Effect::Adjust(0.10),
                            format!("High oil (${price:.1}) benefits the energy sector"),
                        )
                    })
            },
        },
        Rule {
            name: "oil-high-transport",
            eval: |ctx, _| {
                ctx.oil
                    .filter(|(s, _, _)| {
                        *s == OilSignal::High
                            && matches!(ctx.sector, Sector::Airlines | Sector::Transportation)
                    })
                    .map(|(_, price, _)| {
                        (
                            Effect::Adjust(-0.08),
                            format!("High oil (${price:.1}) raises transport costs"),
                        )
                    })
            },
        },
        Rule {
            name: "oil-low-energy",
            eval: |ctx, _| {
                ctx.oil
                    .filter(|(s, _, _)| *s == OilSignal::Low && ctx.sector == Sector::Energy)
                    .map(|(_, price, _)| {
                        (
                            Effect::Adjust(-0.08),
                            format!("Low oil (${price:.1}) hits the energy sector"),
                        )
                    })
            },
        },
        Rule {
            name: "oil-low-consumer",
            eval: |ctx, _| {
                ctx.oil
                    .filter(|(s, _, _)| {
                        *s == OilSignal::Low
                            && matches!(
                                ctx.sector,
                                Sector::Airlines | Sector::Transportation | Sector::Consumer
                            )
                    })
                    .map(|(_, price, _)| {
                        (
                            Effect::Adjust(0.08),
                            format!("Low oil (${price:.1}) cuts input costs"),
                        )
                    })
            },
        },
        Rule {
            name: "oil-move-extreme",
            eval: |ctx, _| {
                ctx.oil.filter(|(_, _, chg)| chg.abs() > 20.0).map(|(_, _, chg)| {
                    (
                        Effect::Adjust(-0.05),
                        format!("Oil moved {chg:+.1}% in 30 days - uncertainty"),
                    )
                })
            },
        },
        // --- Dollar index (sector-conditional, confidence-only) ------------
        Rule {
            name: "dollar-strong-exporter",
            eval: |ctx, _| {
                ctx.dollar
                    .filter(|(s, _, _)| *s == DollarSignal::Strong && ctx.export_exposed)
                    .map(|(_, dxy, _)| {
                        (
                            Effect::Adjust(-0.10),
                            format!("Strong dollar (DXY {dxy:.1}) hurts exporters"),
                        )
                    })
            },
        },
        Rule {
            name: "dollar-strong-gold",
            eval: |ctx, _| {
                ctx.dollar
                    .filter(|(s, _, _)| {
                        *s == DollarSignal::Strong
                            && !ctx.export_exposed
                            && ctx.sector == Sector::Gold
                    })
                    .map(|(_, dxy, _)| {
                        (
                            Effect::Adjust(-0.08),
                            format!("Strong dollar (DXY {dxy:.1}) pressures gold"),
                        )
                    })
            },
        },
        Rule {
            name: "dollar-weak-exporter",
            eval: |ctx, _| {
                ctx.dollar
                    .filter(|(s, _, _)| *s == DollarSignal::Weak && ctx.export_exposed)
                    .map(|(_, dxy, _)| {
                        (
                            Effect::Adjust(0.10),
                            format!("Weak dollar (DXY {dxy:.1}) favours exporters"),
                        )
                    })
            },
        },
        Rule {
            name: "dollar-weak-gold",
            eval: |ctx, _| {
                ctx.dollar
                    .filter(|(s, _, _)| {
                        *s == DollarSignal::Weak
                            && !ctx.export_exposed
                            && ctx.sector == Sector::Gold
                    })
                    .map(|(_, dxy, _)| {
                        (
                            Effect::Adjust(0.08),
                            format!("Weak dollar (DXY {dxy:.1}) lifts gold"),
                        )
                    })
            },
        },
        Rule {
            name: "dollar-move-extreme",
            eval: |ctx, _| {
                ctx.dollar.filter(|(_, _, chg)| chg.abs() > 5.0).map(|(_, _, chg)| {
                    (
                        Effect::Adjust(-0.05),
                        format!("Dollar moved {chg:+.1}% in 30 days - uncertainty"),
                    )
                })
            },
        },
    ]
}

fn build_factors(
    data: &MacroMetrics,
    ctx: &MacroContext,
) -> serde_json::Map<String, serde_json::Value> {
    let mut factors = serde_json::Map::new();
    factors.insert(
        "fed_rate".to_string(),
        json!(format!("{:.2}%", data.fed_rate)),
    );
    factors.insert("fed_direction".to_string(), json!(data.fed_direction));
    factors.insert("cpi_yoy".to_string(), json!(format!("{:.1}%", ctx.cpi_yoy)));
    factors.insert(
        "gdp_growth".to_string(),
        json!(format!("{:.1}%", ctx.gdp_growth)),
    );
    factors.insert(
        "unemployment".to_string(),
        json!(format!("{:.1}%", ctx.unemployment)),
    );

    if let Some(curve) = ctx.curve {
        factors.insert(
            "yield_curve".to_string(),
            json!({
                "spread_2y_10y": format!("{:.0}bps", curve.spread_bps),
                "signal": curve.signal,
            }),
        );
    }

    if let Some((signal, price, change)) = ctx.oil {
        factors.insert(
            "oil_price".to_string(),
            json!({
                "wti_crude": format!("${price:.2}/bbl"),
                "change_30d": format!("{change:+.1}%"),
                "signal": signal,
            }),
        );
    }

    if let Some((signal, dxy, change)) = ctx.dollar {
        factors.insert(
            "dollar_index".to_string(),
            json!({
                "dxy": format!("{dxy:.2}"),
                "change_30d": format!("{change:+.1}%"),
                "signal": signal,
            }),
        );
    }

    factors
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::TreasuryYields;

    fn scorer() -> MacroScorer {
        MacroScorer
    }

    #[test]
    fn inversion_locks_sell_over_goldilocks() {
        // Goldilocks inputs would be a BUY, but the inverted curve wins.
        let data = MacroMetrics {
            gdp_growth: 3.0,
            unemployment: 3.5,
            cpi_yoy: 2.8,
            yield_curve: Some(TreasuryYields {
                two_year: 4.5,
                ten_year: 4.2,
            }),
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Sell);
        assert!((vote.confidence - 0.85).abs() < 1e-9);
        assert!(vote.rationale.contains("inverted"));
    }

    #[test]
    fn inversion_keeps_action_under_secondary_boosts() {
        // Weak dollar would add +0.10 for an exporter; the action stays SELL
        // and only the confidence moves (then clamps).
        let data = MacroMetrics {
            yield_curve: Some(TreasuryYields {
                two_year: 4.5,
                ten_year: 4.2,
            }),
            dxy: Some(92.0),
            exporter: true,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Sell);
        // Lock 0.85 + weak-dollar exporter boost 0.10.
        assert!((vote.confidence - 0.95).abs() < 1e-9);
        assert!(vote.rationale.contains("Weak dollar"));
    }

    #[test]
    fn easing_disinflation_buys() {
        let data = MacroMetrics {
            fed_direction: FedDirection::Cutting,
            cpi_yoy: 2.8,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Buy);
        assert!((vote.confidence - 0.84).abs() < 1e-9);
        assert!(vote.rationale.contains("Rate-cut cycle"));
    }

    #[test]
    fn goldilocks_buys_with_steep_curve_boost() {
        let data = MacroMetrics {
            gdp_growth: 3.0,
            unemployment: 3.5,
            cpi_yoy: 2.8,
            yield_curve: Some(TreasuryYields {
                two_year: 3.0,
                ten_year: 4.8,
            }),
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Buy);
        // 0.78 + 0.15 steep boost.
        assert!((vote.confidence - 0.93).abs() < 1e-9);
    }

    #[test]
    fn tightening_hot_inflation_sells() {
        let data = MacroMetrics {
            fed_direction: FedDirection::Hiking,
            cpi_yoy: 5.2,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Sell);
        assert!((vote.confidence - 0.76).abs() < 1e-9);
    }

    #[test]
    fn slowdown_sells() {
        let data = MacroMetrics {
            gdp_growth: 0.5,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Sell);
        assert!((vote.confidence - 0.72).abs() < 1e-9);
    }

    #[test]
    fn neutral_macro_holds() {
        let vote = scorer().analyze("AAPL", &MacroMetrics::default());
        assert_eq!(vote.action, Action::Hold);
        assert!((vote.confidence - 0.65).abs() < 1e-9);
        assert!(vote.rationale.contains("Mixed macro picture"));
    }

    #[test]
    fn high_oil_boosts_energy_names() {
        let data = MacroMetrics {
            fed_direction: FedDirection::Cutting,
            cpi_yoy: 2.8,
            wti_crude: Some(95.0),
            sector: Sector::Energy,
            ..Default::default()
        };
        let vote = scorer().analyze("XOM", &data);
        assert_eq!(vote.action, Action::Buy);
        // 0.84 + 0.10 oil boost.
        assert!((vote.confidence - 0.94).abs() < 1e-9);
        assert!(vote.rationale.contains("energy sector"));
    }

    #[test]
    fn strong_dollar_penalizes_exporters() {
        let data = MacroMetrics {
            fed_direction: FedDirection::Cutting,
            cpi_yoy: 2.8,
            dxy: Some(108.0),
            exporter: true,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Buy);
        assert!((vote.confidence - 0.74).abs() < 1e-9);
        assert!(vote.rationale.contains("Strong dollar"));
    }

    #[test]
    fn extreme_oil_move_penalizes() {
        let data = MacroMetrics {
            wti_crude: Some(75.0),
            wti_change_30d: 25.0,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Hold);
        // Neutral 0.65 - 0.05.
        assert!((vote.confidence - 0.60).abs() < 1e-9);
    }

    #[test]
    fn non_finite_input_falls_back() {
        let data = MacroMetrics {
            cpi_yoy: f64::NAN,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Hold);
        assert!((vote.confidence - 0.60).abs() < 1e-9);
        assert_eq!(vote.factors.get("error"), Some(&json!(true)));
    }
}
