// =============================================================================
// Sentiment Scorer — social mood and investor psychology
// =============================================================================
//
// Aggregate sentiment = Twitter * 0.6 + Reddit * 0.4.
//
// Cascade order:
//   1. Primary tiers: volume-confirmed bullishness, extreme-fear contrarian
//      buy, trending surge, heavy bearishness, extreme-greed euphoria,
//      sentiment collapse.
//   2. Fear & Greed contrarian overrides on a standing HOLD, or a boost on
//      an agreeing action.
//   3. Trending boost and the low-volume penalty.

use anyhow::{bail, Result};
use serde_json::json;
use tracing::{debug, warn};

use crate::bundle::SentimentMetrics;
use crate::metrics::fear_greed::{classify_fear_greed, FearGreedReading, FearGreedSignal};
use crate::scorers::cascade::{run_cascade, Effect, Rule};
use crate::types::{Action, Domain, Vote};

const CONFIDENCE_FLOOR: f64 = 0.40;
const CONFIDENCE_CEILING: f64 = 0.90;
const NEUTRAL_CONFIDENCE: f64 = 0.60;

/// Tweet / mention volumes above these counts confirm a sentiment signal.
const HIGH_TWITTER_VOLUME: u64 = 10_000;
const HIGH_REDDIT_MENTIONS: u64 = 500;

/// Trending-rank cut-off.
const TRENDING_RANK: u32 = 20;

struct SentimentContext {
    overall: f64,
    fear_greed: FearGreedReading,
    trending: bool,
    trending_rank: u32,
    high_volume: bool,
    twitter_volume: u64,
    reddit_mentions: u64,
    change_24h: f64,
    bullish_ratio: f64,
}

pub struct SentimentScorer;

impl SentimentScorer {
    /// Assess social sentiment for `ticker`.
    ///
    /// Never fails: malformed input degrades to a conservative HOLD vote.
    pub fn analyze(&self, ticker: &str, data: &SentimentMetrics) -> Vote {
        match evaluate(ticker, data) {
            Ok(vote) => vote,
            Err(e) => {
                warn!(ticker, error = %e, "sentiment scorer fell back to HOLD");
                fallback_vote(ticker)
            }
        }
    }
}

fn fallback_vote(ticker: &str) -> Vote {
    let mut factors = serde_json::Map::new();
    factors.insert("error".to_string(), json!(true));
    Vote::new(
        Domain::Sentiment,
        Action::Hold,
        0.50,
        format!("Social sentiment feed unavailable for {ticker} - watching"),
    )
    .with_factors(factors)
}

fn evaluate(ticker: &str, data: &SentimentMetrics) -> Result<Vote> {
    for (name, value) in [
        ("twitter_sentiment", data.twitter_sentiment),
        ("reddit_sentiment", data.reddit_sentiment),
        ("fear_greed_index", data.fear_greed_index),
        ("sentiment_change_24h", data.sentiment_change_24h),
        ("bullish_ratio", data.bullish_ratio),
    ] {
        if !value.is_finite() {
            bail!("non-finite sentiment input: {name}");
        }
    }

    let overall = data.twitter_sentiment * 0.6 + data.reddit_sentiment * 0.4;
    let fear_greed = classify_fear_greed(data.fear_greed_index);

    let ctx = SentimentContext {
        overall,
        fear_greed,
        trending: data.trending_rank <= TRENDING_RANK,
        trending_rank: data.trending_rank,
        high_volume: data.twitter_volume > HIGH_TWITTER_VOLUME
            || data.reddit_mentions > HIGH_REDDIT_MENTIONS,
        twitter_volume: data.twitter_volume,
        reddit_mentions: data.reddit_mentions,
        change_24h: data.sentiment_change_24h,
        bullish_ratio: data.bullish_ratio,
    };

    let mood = if overall > 0.3 {
        "positive"
    } else if overall < -0.3 {
        "negative"
    } else {
        "neutral"
    };
    let neutral_rationale = format!(
        "Social sentiment {mood} ({overall:.2}), Fear & Greed {:.0} - watching",
        fear_greed.index
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
        "sentiment cascade complete"
    );

    Ok(
        Vote::new(Domain::Sentiment, outcome.action, outcome.confidence, outcome.rationale)
            .with_factors(build_factors(data, &ctx)),
    )
}

fn rules() -> Vec<Rule<SentimentContext>> {
    vec![
        // --- Primary tiers -------------------------------------------------
        Rule {
            name: "bullish-with-volume",
            eval: |ctx, _| {
                (ctx.overall > 0.6 && ctx.high_volume).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: (0.70 + (ctx.overall - 0.6) * 0.5).min(0.85),
                        },
                        format!(
                            "Strong positive social sentiment ({:.2}) on heavy volume (Twitter {}, Reddit {})",
                            ctx.overall, ctx.twitter_volume, ctx.reddit_mentions
                        ),
                    )
                })
            },
        },
        Rule {
            name: "extreme-fear-contrarian",
            eval: |ctx, _| {
                (ctx.fear_greed.index < 25.0 && ctx.overall > 0.0).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: 0.78,
                        },
                        format!(
                            "Extreme fear ({:.0}) with positive sentiment ({:.2}) - contrarian entry",
                            ctx.fear_greed.index, ctx.overall
                        ),
                    )
                })
            },
        },
        Rule {
            name: "trending-surge",
            eval: |ctx, _| {
                (ctx.trending && ctx.change_24h > 0.3).then(|| {
                    (
                        Effect::Set {
                            action: Action::Buy,
                            confidence: 0.75,
                        },
                        format!(
                            "Trending surge (rank {}, 24h sentiment {:+.2})",
                            ctx.trending_rank, ctx.change_24h
                        ),
                    )
                })
            },
        },
        Rule {
            name: "heavy-bearish-sentiment",
            eval: |ctx, _| {
                (ctx.overall < -0.5).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.80,
                        },
                        format!(
                            "Strong negative social sentiment ({:.2}) - mood deteriorating",
                            ctx.overall
                        ),
                    )
                })
            },
        },
        Rule {
            name: "extreme-greed-euphoria",
            eval: |ctx, _| {
                (ctx.fear_greed.index > 85.0 && ctx.bullish_ratio > 0.90).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.82,
                        },
                        format!(
                            "Extreme greed ({:.0}) with {:.0}% bullish posts - overheated",
                            ctx.fear_greed.index,
                            ctx.bullish_ratio * 100.0
                        ),
                    )
                })
            },
        },
        Rule {
            name: "sentiment-collapse",
            eval: |ctx, _| {
                (ctx.change_24h < -0.4).then(|| {
                    (
                        Effect::Set {
                            action: Action::Sell,
                            confidence: 0.75,
                        },
                        format!("Sentiment collapse (24h change {:+.2})", ctx.change_24h),
                    )
                })
            },
        },
        // --- Fear & Greed contrarian integration ---------------------------
        Rule {
            name: "fear-greed-contrarian-buy",
            eval: |ctx, state| {
                if ctx.fear_greed.signal != FearGreedSignal::ContrarianBuy {
                    return None;
                }
                match state.action {
                    Action::Hold => Some((
                        Effect::Override {
                            action: Action::Buy,
                            confidence: 0.72,
                        },
                        format!(
                            "Extreme fear ({:.0}) - contrarian buy window",
                            ctx.fear_greed.index
                        ),
                    )),
                    Action::Buy => Some((
                        Effect::Adjust(0.1),
                        format!("Fear & Greed contrarian ({:.0})", ctx.fear_greed.index),
                    )),
                    _ => None,
                }
            },
        },
        Rule {
            name: "fear-greed-contrarian-sell",
            eval: |ctx, state| {
                if ctx.fear_greed.signal != FearGreedSignal::ContrarianSell {
                    return None;
                }
                match state.action {
                    Action::Hold => Some((
                        Effect::Override {
                            action: Action::Sell,
                            confidence: 0.70,
                        },
                        format!(
                            "Extreme greed ({:.0}) - overheating warning",
                            ctx.fear_greed.index
                        ),
                    )),
                    Action::Sell => Some((
                        Effect::Adjust(0.1),
                        format!("Fear & Greed overheated ({:.0})", ctx.fear_greed.index),
                    )),
                    _ => None,
                }
            },
        },
        // --- Trailing adjustments -------------------------------------------
        Rule {
            name: "trending-boost",
            eval: |ctx, state| {
                (ctx.trending && state.action == Action::Buy).then(|| {
                    (
                        Effect::Adjust(0.05),
                        format!("Trending #{}", ctx.trending_rank),
                    )
                })
            },
        },
        Rule {
            name: "low-volume-penalty",
            eval: |ctx, state| {
                (!ctx.high_volume && matches!(state.action, Action::Buy | Action::Sell)).then(|| {
                    (
                        Effect::Adjust(-0.1),
                        "Low social volume (signal caution)".to_string(),
                    )
                })
            },
        },
    ]
}

fn build_factors(
    data: &SentimentMetrics,
    ctx: &SentimentContext,
) -> serde_json::Map<String, serde_json::Value> {
    let mut factors = serde_json::Map::new();
    factors.insert(
        "overall_sentiment".to_string(),
        json!(format!("{:.2}", ctx.overall)),
    );
    factors.insert(
        "twitter_sentiment".to_string(),
        json!(format!("{:.2}", data.twitter_sentiment)),
    );
    factors.insert(
        "reddit_sentiment".to_string(),
        json!(format!("{:.2}", data.reddit_sentiment)),
    );
    factors.insert(
        "sentiment_change_24h".to_string(),
        json!(format!("{:+.2}", ctx.change_24h)),
    );
    factors.insert(
        "bullish_ratio".to_string(),
        json!(format!("{:.1}%", ctx.bullish_ratio * 100.0)),
    );
    factors.insert(
        "fear_greed".to_string(),
        json!({
            "index": ctx.fear_greed.index,
            "level": ctx.fear_greed.level,
            "signal": ctx.fear_greed.signal,
        }),
    );
    factors.insert(
        "trending".to_string(),
        json!({
            "rank": ctx.trending_rank,
            "is_trending": ctx.trending,
            "twitter_volume": ctx.twitter_volume,
            "reddit_mentions": ctx.reddit_mentions,
        }),
    );
    factors
}
