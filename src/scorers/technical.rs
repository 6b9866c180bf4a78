// =============================================================================
// Technical Scorer — price action, momentum, and volume
// =============================================================================
//
// Cascade order:
//   1. Primary tiers: golden cross, oversold rebound, death cross, fading
//      overbought.
//   2. Multi-timeframe alignment adjustments, then the all-timeframe
//      HOLD overrides.
//   3. Support/resistance proximity and breakout rules.
//   4. Bollinger band-break overrides and volatility-width adjustments.

use anyhow::{bail, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::bundle::TechnicalMetrics;
use crate::metrics::bollinger::{analyze_bands, calculate_bollinger, BandAnalysis, BandSignal};
use crate::metrics::pivots::{find_support_resistance, SupportResistance, PIVOT_MIN_BARS};
use crate::metrics::trend::{analyze_alignment, Trend, TrendAlignment};
use crate::scorers::cascade::{run_cascade, Effect, Rule};
use crate::types::{Action, Domain, Vote};

const CONFIDENCE_FLOOR: f64 = 0.40;
const CONFIDENCE_CEILING: f64 = 0.95;
const NEUTRAL_CONFIDENCE: f64 = 0.60;

/// Derived view of the technical bundle consumed by the rule cascade.
struct TechnicalContext {
    rsi: f64,
    ma20: f64,
    ma50: f64,
    volume_change: f64,
    price: f64,
    alignment: Option<TrendAlignment>,
    sr: Option<SupportResistance>,
    bands: Option<BandAnalysis>,
}

pub struct TechnicalScorer;

impl TechnicalScorer {
    /// Analyze the technical picture for `ticker`.
    ///
    /// Never fails: malformed input degrades to a conservative HOLD vote.
    pub fn analyze(&self, ticker: &str, data: &TechnicalMetrics) -> Vote {
        match evaluate(ticker, data) {
            Ok(vote) => vote,
            Err(e) => {
                warn!(ticker, error = %e, "technical scorer fell back to HOLD");
                fallback_vote(ticker)
            }
        }
    }
}

fn fallback_vote(ticker: &str) -> Vote {
    let mut factors = serde_json::Map::new();
    factors.insert("error".to_string(), json!(true));
    Vote::new(
        Domain::Technical,
        Action::Hold,
        0.50,
        format!("Technical analysis unavailable for {ticker} - holding pending clean data"),
    )
    .with_factors(factors)
}

fn evaluate(ticker: &str, data: &TechnicalMetrics) -> Result<Vote> {
    for (name, value) in [
        ("rsi", data.rsi),
        ("ma20", data.ma20),
        ("ma50", data.ma50),
        ("volume_change", data.volume_change),
        ("price", data.price),
    ] {
        if !value.is_finite() {
            bail!("non-finite technical input: {name}");
        }
    }

    let alignment = (!data.daily_bars.is_empty()
        && !data.weekly_bars.is_empty()
        && !data.monthly_bars.is_empty())
    .then(|| analyze_alignment(&data.daily_bars, &data.weekly_bars, &data.monthly_bars));

    let sr = (data.daily_bars.len() >= PIVOT_MIN_BARS)
        .then(|| find_support_resistance(&data.daily_bars));

    let bands = band_analysis(data);

    let ctx = TechnicalContext {
        rsi: data.rsi,
        ma20: data.ma20,
        ma50: data.ma50,
        volume_change: data.volume_change,
        price: data.price,
        alignment,
        sr,
        bands,
    };

    let neutral_rationale = format!(
        "Watching (trend: {}, RSI {:.0}, volume change {:+.0}%)",
        trend_label(&ctx),
        ctx.rsi,
        (ctx.volume_change - 1.0) * 100.0
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
        "technical cascade complete"
    );

    Ok(
        Vote::new(Domain::Technical, outcome.action, outcome.confidence, outcome.rationale)
            .with_factors(build_factors(data, &ctx)),
    )
}

fn band_analysis(data: &TechnicalMetrics) -> Option<BandAnalysis> {
    if let Some(levels) = &data.bollinger {
        return Some(analyze_bands(
            data.price,
            levels.upper,
            levels.middle,
            levels.lower,
        ));
    }
    if data.daily_bars.len() >= 20 {
        let closes: Vec<f64> = data.daily_bars.iter().map(|b| b.close).collect();
        let bb = calculate_bollinger(&closes, 20, 2.0)?;
        return Some(analyze_bands(data.price, bb.upper, bb.middle, bb.lower));
    }
    None
}

fn trend_label(ctx: &TechnicalContext) -> &'static str {
    if ctx.ma20 > ctx.ma50 {
        "up"
    } else if ctx.ma20 < ctx.ma50 {
        "down"
    } else {
        "sideways"
    }
}

fn all_timeframes(alignment: &Option<TrendAlignment>, trend: Trend) -> bool {
    alignment
        .as_ref()
        .map(|a| a.daily == trend && a.weekly == trend && a.monthly == trend)
        .unwrap_or(false)
}

fn rules() -> Vec<Rule<TechnicalContext>> {
    vec![
        // --- Primary tiers -------------------------------------------------
        Rule {
            name: "golden-cross-momentum",
            eval: |ctx, _| {
                (ctx.ma20 > ctx.ma50 && ctx.rsi < 50.0 && ctx.volume_change > 1.3).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: (0.7 + (ctx.volume_change - 1.0) * 0.2).min(0.90),
                        },
                        format!(
                            "Golden cross (MA20 > MA50) with volume up {:+.0}% and neutral RSI {:.0}",
                            (ctx.volume_change - 1.0) * 100.0,
                            ctx.rsi
                        ),
                    )
                })
            },
        },
        Rule {
            name: "oversold-rebound",
            eval: |ctx, _| {
                (ctx.rsi < 30.0 && ctx.volume_change > 1.2).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: 0.85,
                        },
                        format!(
                            "Oversold (RSI {:.0}) with rising volume - rebound setup",
                            ctx.rsi
                        ),
                    )
                })
            },
        },
        Rule {
            name: "death-cross",
            eval: |ctx, _| {
                (ctx.ma20 < ctx.ma50 && ctx.rsi > 70.0).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.80,
                        },
                        format!("Death cross (MA20 < MA50) in overbought zone (RSI {:.0})", ctx.rsi),
                    )
                })
            },
        },
        Rule {
            name: "overbought-fading-volume",
            eval: |ctx, _| {
                (ctx.rsi > 75.0 && ctx.volume_change < 0.8).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.75,
                        },
                        format!(
                            "Overbought (RSI {:.0}) on fading volume ({:+.0}%)",
                            ctx.rsi,
                            (ctx.volume_change - 1.0) * 100.0
                        ),
                    )
                })
            },
        },
        // --- Multi-timeframe alignment ------------------------------------
        Rule {
            name: "mtf-strong-alignment",
            eval: |ctx, _| {
                ctx.alignment
                    .as_ref()
                    .filter(|a| a.score >= 0.8)
                    .map(|a| {
                        (
                            Effect::Adjust(0.2),
                            format!("Timeframes aligned ({:?}, {:.2})", a.status, a.score),
                        )
                    })
            },
        },
        Rule {
            name: "mtf-moderate-alignment",
            eval: |ctx, _| {
                ctx.alignment
                    .as_ref()
                    .filter(|a| a.score >= 0.6 && a.score < 0.8)
                    .map(|a| {
                        (
                            Effect::Adjust(0.1),
                            format!("Timeframes aligned ({:?}, {:.2})", a.status, a.score),
                        )
                    })
            },
        },
        Rule {
            name: "mtf-conflict",
            eval: |ctx, _| {
                ctx.alignment
                    .as_ref()
                    .filter(|a| a.score <= 0.3)
                    .map(|a| {
                        (
                            Effect::Adjust(-0.3),
                            format!("Timeframe conflict warning ({:?}, {:.2})", a.status, a.score),
                        )
                    })
            },
        },
        Rule {
            name: "mtf-all-bullish",
            eval: |ctx, state| {
                (state.action == Action::Hold && all_timeframes(&ctx.alignment, Trend::Uptrend))
                    .then(|| {
                        (
                            Effect::Override {
                                action: Action::Buy,
                                confidence: 0.75,
                            },
                            "All timeframes trending up (monthly/weekly/daily aligned) - buy window"
                                .to_string(),
                        )
                    })
            },
        },
        Rule {
            name: "mtf-all-bearish",
            eval: |ctx, state| {
                (state.action == Action::Hold && all_timeframes(&ctx.alignment, Trend::Downtrend))
                    .then(|| {
                        (
                            Effect::Override {
                                action: Action::Sell,
                                confidence: 0.75,
                            },
                            "All timeframes trending down (monthly/weekly/daily aligned) - exit signal"
                                .to_string(),
                        )
                    })
            },
        },
        // --- Support / resistance ------------------------------------------
        Rule {
            name: "support-proximity",
            eval: |ctx, state| {
                let sr = ctx.sr.as_ref()?;
                let dist = sr.support_distance_pct?;
                let support = sr.nearest_support?;
                (matches!(state.action, Action::Buy | Action::Hold) && dist < 2.0).then(|| {
                    (
                        Effect::Adjust(0.15),
                        format!("Buy zone near support ({support:.2}, -{dist:.1}%)"),
                    )
                })
            },
        },
        Rule {
            name: "resistance-breakout",
            eval: |ctx, state| {
                let sr = ctx.sr.as_ref()?;
                let resistance = sr.nearest_resistance?;
                (state.action == Action::Buy && ctx.price > resistance).then(|| {
                    (
                        Effect::Adjust(0.2),
                        format!("Resistance breakout ({resistance:.2})"),
                    )
                })
            },
        },
        Rule {
            name: "resistance-pressure",
            eval: |ctx, state| {
                let sr = ctx.sr.as_ref()?;
                let dist = sr.resistance_distance_pct?;
                let resistance = sr.nearest_resistance?;
                if !matches!(state.action, Action::Sell | Action::Hold) || dist >= 2.0 {
                    return None;
                }
                let note =
                    format!("Sell pressure near resistance ({resistance:.2}, +{dist:.1}%)");
                if state.action == Action::Hold {
                    Some((
                        Effect::Override {
                            action: Action::Sell,
                            confidence: 0.65,
                        },
                        note,
                    ))
                } else {
                    Some((Effect::Adjust(0.1), note))
                }
            },
        },
        // --- Bollinger bands ------------------------------------------------
        Rule {
            name: "bollinger-oversold",
            eval: |ctx, state| {
                let bands = ctx.bands.as_ref()?;
                if bands.signal != BandSignal::Oversold
                    || !matches!(state.action, Action::Buy | Action::Hold)
                {
                    return None;
                }
                if state.action == Action::Hold {
                    Some((
                        Effect::Override {
                            action: Action::Buy,
                            confidence: 0.75,
                        },
                        "Lower Bollinger band break (oversold) - rebound buy".to_string(),
                    ))
                } else {
                    Some((
                        Effect::Adjust(0.15),
                        format!("Lower Bollinger band ({:?})", bands.position),
                    ))
                }
            },
        },
        Rule {
            name: "bollinger-overbought",
            eval: |ctx, state| {
                let bands = ctx.bands.as_ref()?;
                if bands.signal != BandSignal::Overbought
                    || !matches!(state.action, Action::Sell | Action::Hold)
                {
                    return None;
                }
                if state.action == Action::Hold {
                    Some((
                        Effect::Override {
                            action: Action::Sell,
                            confidence: 0.70,
                        },
                        "Upper Bollinger band break (overbought) - correction sell".to_string(),
                    ))
                } else {
                    Some((
                        Effect::Adjust(0.1),
                        format!("Upper Bollinger band ({:?})", bands.position),
                    ))
                }
            },
        },
        Rule {
            name: "bollinger-squeeze",
            eval: |ctx, state| {
                let bands = ctx.bands.as_ref()?;
                (bands.signal == BandSignal::Squeeze
                    && bands.band_width_pct < 5.0
                    && matches!(state.action, Action::Buy | Action::Sell))
                .then(|| {
                    (
                        Effect::Adjust(-0.1),
                        "Bollinger squeeze (volatility compressed, breakout pending)".to_string(),
                    )
                })
            },
        },
        Rule {
            name: "bollinger-expansion",
            eval: |ctx, state| {
                let bands = ctx.bands.as_ref()?;
                (bands.signal == BandSignal::Expansion
                    && bands.band_width_pct > 15.0
                    && matches!(state.action, Action::Buy | Action::Sell))
                .then(|| {
                    (
                        Effect::Adjust(0.1),
                        "Bollinger expansion (strong trend)".to_string(),
                    )
                })
            },
        },
    ]
}

fn build_factors(
    data: &TechnicalMetrics,
    ctx: &TechnicalContext,
) -> serde_json::Map<String, serde_json::Value> {
    let mut factors = serde_json::Map::new();
    factors.insert(
        "trend".to_string(),
        json!(match trend_label(ctx) {
            "up" => "UPTREND",
            "down" => "DOWNTREND",
            _ => "SIDEWAYS",
        }),
    );
    factors.insert("rsi".to_string(), json!(ctx.rsi));
    factors.insert("macd".to_string(), json!(data.macd));
    factors.insert(
        "volume_change".to_string(),
        json!(format!("{:+.0}%", (ctx.volume_change - 1.0) * 100.0)),
    );
    factors.insert("ma20".to_string(), json!(ctx.ma20));
    factors.insert("ma50".to_string(), json!(ctx.ma50));

    if let Some(a) = &ctx.alignment {
        factors.insert(
            "multi_timeframe".to_string(),
            json!({
                "daily_trend": a.daily,
                "weekly_trend": a.weekly,
                "monthly_trend": a.monthly,
                "alignment_score": format!("{:.2}", a.score),
                "alignment_status": a.status,
            }),
        );
    }

    if let Some(sr) = &ctx.sr {
        factors.insert(
            "support_resistance".to_string(),
            json!({
                "nearest_support": sr.nearest_support,
                "nearest_resistance": sr.nearest_resistance,
                "support_distance_pct": sr.support_distance_pct,
                "resistance_distance_pct": sr.resistance_distance_pct,
            }),
        );
    }

    if let Some(bands) = &ctx.bands {
        factors.insert(
            "bollinger".to_string(),
            json!({
                "position": bands.position,
                "signal": bands.signal,
                "band_width_pct": format!("{:.2}%", bands.band_width_pct),
            }),
        );
    }

    factors
}
