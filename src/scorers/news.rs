// =============================================================================
// News Scorer — headline flow, temporal trend, and regulatory exposure
// =============================================================================
//
// Sentiment extraction happens upstream; this scorer consumes per-item
// scores plus the aggregate. Evaluation order (significant):
//
//   1. No items at all -> neutral HOLD 0.5.
//   2. Keyword scan for litigation/regulatory exposure. CRITICAL severity
//      forces SELL 0.90 before any score arithmetic.
//   3. Temporal trend: recent items (emergency items plus the newest half)
//      vs the older half; a swing beyond +/-0.2 shifts the score by +/-0.1.
//   4. Adjusted score = aggregate sentiment + trend shift + severity
//      penalty, thresholded at +/-0.6. Emergency coverage adds a +0.2
//      urgency term to the confidence of a decided action.

use anyhow::{bail, Result};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, warn};

use crate::bundle::{NewsItem, NewsMetrics};
use crate::metrics::keyword_risk::{scan_regulatory_risk, RegulatoryRisk, RiskSeverity};
use crate::types::{Action, Domain, Vote};

const CONFIDENCE_FLOOR: f64 = 0.40;
const CONFIDENCE_CEILING: f64 = 0.95;

/// Decision threshold on the adjusted score.
const SCORE_THRESHOLD: f64 = 0.6;

/// Confidence bonus when emergency coverage is present.
const URGENCY_BOOST: f64 = 0.2;

/// Direction of the recent news flow relative to the older flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
enum NewsTrend {
    Improving,
    Deteriorating,
    Stable,
}

struct TrendAnalysis {
    trend: NewsTrend,
    recent_sentiment: f64,
    older_sentiment: f64,
    change: f64,
}

pub struct NewsScorer;

impl NewsScorer {
    /// Assess the news flow for `ticker`.
    ///
    /// Never fails: malformed input degrades to a conservative HOLD vote.
    pub fn analyze(&self, ticker: &str, data: &NewsMetrics) -> Vote {
        match evaluate(ticker, data) {
            Ok(vote) => vote,
            Err(e) => {
                warn!(ticker, error = %e, "news scorer fell back to HOLD");
                fallback_vote(ticker)
            }
        }
    }
}

fn fallback_vote(ticker: &str) -> Vote {
    let mut factors = serde_json::Map::new();
    factors.insert("error".to_string(), json!(true));
    Vote::new(
        Domain::News,
        Action::Hold,
        0.50,
        format!("News analysis unavailable for {ticker} - neutral stance"),
    )
    .with_factors(factors)
}

fn evaluate(ticker: &str, data: &NewsMetrics) -> Result<Vote> {
    if !data.sentiment_score.is_finite() {
        bail!("non-finite aggregate sentiment score");
    }
    if data.items.iter().any(|i| !i.sentiment.is_finite()) {
        bail!("non-finite item sentiment");
    }

    let emergency_count = data.items.iter().filter(|i| i.emergency).count();
    let regular_count = data.items.len() - emergency_count;

    // 1. No news: neutral stance, explicitly not an error.
    if data.items.is_empty() {
        let mut factors = serde_json::Map::new();
        factors.insert("news_count".to_string(), json!(0));
        factors.insert("emergency_count".to_string(), json!(0));
        factors.insert("sentiment_score".to_string(), json!(0.0));
        return Ok(Vote::new(
            Domain::News,
            Action::Hold,
            0.50,
            format!("No recent news for {ticker} - staying neutral"),
        )
        .with_factors(factors));
    }

    // 2. Regulatory / litigation scan. Emergency items are scanned on their
    //    body text, regular items on the headline.
    let texts: Vec<&str> = data
        .items
        .iter()
        .map(|item| scan_text(item))
        .collect();
    let regulatory = scan_regulatory_risk(&texts);

    // 3. Temporal trend.
    let trend = analyze_trend(&data.items);
    let trend_shift = match trend.trend {
        NewsTrend::Improving => 0.1,
        NewsTrend::Deteriorating => -0.1,
        NewsTrend::Stable => 0.0,
    };

    // 4. Severity penalty and decision.
    let (penalty, force_sell) = match regulatory.severity {
        RiskSeverity::Critical => (-0.5, true),
        RiskSeverity::High => (-0.3, false),
        RiskSeverity::Moderate => (-0.2, false),
        RiskSeverity::Low => (-0.1, false),
        RiskSeverity::None => (0.0, false),
    };

    let adjusted = data.sentiment_score + trend_shift + penalty;
    let urgency = if emergency_count > 0 { URGENCY_BOOST } else { 0.0 };

    let (action, confidence) = if force_sell {
        (Action::Sell, 0.90)
    } else if adjusted > SCORE_THRESHOLD {
        (Action::Buy, (adjusted.abs() + urgency).min(0.95))
    } else if adjusted < -SCORE_THRESHOLD {
        (Action::Sell, (adjusted.abs() + urgency).min(0.95))
    } else {
        (Action::Hold, 0.5 + adjusted.abs() * 0.3)
    };

    let mut rationale_parts = vec![format!(
        "News flow ({emergency_count} emergency + {regular_count} regular): sentiment {:.2}, adjusted {:.2}",
        data.sentiment_score, adjusted
    )];
    if trend.trend != NewsTrend::Stable {
        rationale_parts.push(format!(
            "trend {:?} ({:+.2})",
            trend.trend, trend.change
        ));
    }
    if regulatory.has_risk() {
        rationale_parts.push(format!(
            "regulatory {} ({} litigation, {} regulatory)",
            regulatory.severity, regulatory.litigation_count, regulatory.regulatory_count
        ));
    }
    if !data.keywords.is_empty() {
        rationale_parts.push(format!(
            "keywords: {}",
            data.keywords
                .iter()
                .take(5)
                .cloned()
                .collect::<Vec<_>>()
                .join(", ")
        ));
    }

    let confidence = confidence.clamp(CONFIDENCE_FLOOR, CONFIDENCE_CEILING);

    debug!(
        ticker,
        action = %action,
        confidence = format!("{:.2}", confidence),
        adjusted = format!("{:.2}", adjusted),
        severity = %regulatory.severity,
        "news analysis complete"
    );

    Ok(Vote::new(
        Domain::News,
        action,
        confidence,
        rationale_parts.join(" | "),
    )
    .with_factors(build_factors(data, emergency_count, &trend, &regulatory)))
}

/// Emergency items are scanned on their body (falling back to the
/// headline); regular items on the headline only.
fn scan_text(item: &NewsItem) -> &str {
    if item.emergency && !item.body.is_empty() {
        &item.body
    } else {
        &item.headline
    }
}

/// Split items (newest first) into a recent and an older cohort and compare
/// average sentiment. Emergency items always count as recent.
fn analyze_trend(items: &[NewsItem]) -> TrendAnalysis {
    let mut recent: Vec<f64> = Vec::new();
    let mut older: Vec<f64> = Vec::new();
    let half = items.len() as f64 / 2.0;

    for item in items {
        if item.emergency {
            recent.push(item.sentiment);
        } else if (recent.len() as f64) < half {
            recent.push(item.sentiment);
        } else {
            older.push(item.sentiment);
        }
    }

    let avg = |xs: &[f64]| {
        if xs.is_empty() {
            0.0
        } else {
            xs.iter().sum::<f64>() / xs.len() as f64
        }
    };

    let recent_sentiment = avg(&recent);
    let older_sentiment = avg(&older);
    let change = recent_sentiment - older_sentiment;

    let trend = if change > 0.2 {
        NewsTrend::Improving
    } else if change < -0.2 {
        NewsTrend::Deteriorating
    } else {
        NewsTrend::Stable
    };

    TrendAnalysis {
        trend,
        recent_sentiment,
        older_sentiment,
        change,
    }
}

fn build_factors(
    data: &NewsMetrics,
    emergency_count: usize,
    trend: &TrendAnalysis,
    regulatory: &RegulatoryRisk,
) -> serde_json::Map<String, serde_json::Value> {
    let mut factors = serde_json::Map::new();
    factors.insert("news_count".to_string(), json!(data.items.len()));
    factors.insert("emergency_count".to_string(), json!(emergency_count));
    factors.insert("sentiment_score".to_string(), json!(data.sentiment_score));
    factors.insert("positive_count".to_string(), json!(data.positive_count));
    factors.insert("negative_count".to_string(), json!(data.negative_count));
    factors.insert(
        "trend".to_string(),
        json!({
            "direction": trend.trend,
            "recent_sentiment": format!("{:.2}", trend.recent_sentiment),
            "older_sentiment": format!("{:.2}", trend.older_sentiment),
            "change": format!("{:+.2}", trend.change),
        }),
    );
    factors.insert(
        "regulatory".to_string(),
        json!({
            "severity": format!("{}", regulatory.severity),
            "litigation_count": regulatory.litigation_count,
            "regulatory_count": regulatory.regulatory_count,
            "keywords_found": regulatory.keywords_found,
        }),
    );
    factors
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scorer() -> NewsScorer {
        NewsScorer
    }

    fn item(headline: &str, sentiment: f64) -> NewsItem {
        NewsItem {
            headline: headline.to_string(),
            body: String::new(),
            sentiment,
            emergency: false,
        }
    }

    #[test]
    fn no_news_is_neutral_hold() {
        let vote = scorer().analyze("AAPL", &NewsMetrics::default());
        assert_eq!(vote.action, Action::Hold);
        assert!((vote.confidence - 0.50).abs() < 1e-9);
        assert!(vote.rationale.contains("No recent news"));
        assert_eq!(vote.factors.get("news_count"), Some(&json!(0)));
    }

    #[test]
    fn strongly_positive_news_buys() {
        let data = NewsMetrics {
            items: vec![
                item("Record earnings beat", 0.8),
                item("Major product launch", 0.7),
            ],
            sentiment_score: 0.75,
            positive_count: 2,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Buy);
        // adjusted 0.75, no urgency.
        assert!((vote.confidence - 0.75).abs() < 1e-9);
    }

    #[test]
    fn emergency_coverage_adds_urgency() {
        let data = NewsMetrics {
            items: vec![
                NewsItem {
                    headline: "Breaking: surprise guidance raise".to_string(),
                    body: "Guidance raised sharply on record demand".to_string(),
                    sentiment: 0.9,
                    emergency: true,
                },
                item("Analysts lift targets", 0.6),
            ],
            sentiment_score: 0.7,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Buy);
        // adjusted 0.7 + improving 0.1, plus 0.2 urgency, capped at 0.95.
        assert!((vote.confidence - 0.95).abs() < 1e-9);
        assert!(vote.rationale.contains("Improving"));
    }

    #[test]
    fn critical_regulatory_exposure_forces_sell() {
        // Positive aggregate sentiment cannot save three litigation items.
        let data = NewsMetrics {
            items: vec![
                item("Class action filed against the company", 0.1),
                item("Company sued by former partners", -0.2),
                item("New lawsuit expands claims", -0.1),
            ],
            sentiment_score: 0.8,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Sell);
        assert!((vote.confidence - 0.90).abs() < 1e-9);
        assert!(vote.rationale.contains("regulatory CRITICAL"));
    }

    #[test]
    fn moderate_exposure_only_penalizes() {
        let data = NewsMetrics {
            items: vec![
                item("SEC opens inquiry", -0.3),
                item("Settlement reached in old dispute", 0.0),
                item("Product demand strong", 0.6),
                item("Store openings accelerate", 0.5),
            ],
            sentiment_score: 0.3,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        // adjusted = 0.3 - 0.2 (moderate) + trend shift.
        assert_eq!(vote.action, Action::Hold);
        assert!(vote.rationale.contains("regulatory MODERATE"));
    }

    #[test]
    fn deteriorating_trend_shifts_score_down() {
        // Newest-first: recent half strongly negative, older half positive.
        let data = NewsMetrics {
            items: vec![
                item("Guidance withdrawn", -0.8),
                item("Key customer walks away", -0.7),
                item("Solid quarter reported", 0.6),
                item("Expansion on track", 0.5),
            ],
            sentiment_score: -0.55,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        // adjusted = -0.55 - 0.1 = -0.65 -> SELL.
        assert_eq!(vote.action, Action::Sell);
        assert!((vote.confidence - 0.65).abs() < 1e-9);
        assert!(vote.rationale.contains("Deteriorating"));
    }

    #[test]
    fn mild_news_holds_with_scaled_confidence() {
        let data = NewsMetrics {
            items: vec![item("Quiet week for the stock", 0.2)],
            sentiment_score: 0.2,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Hold);
        // 0.5 + 0.2*0.3 = 0.56.
        assert!((vote.confidence - 0.56).abs() < 1e-9);
    }

    #[test]
    fn non_finite_sentiment_falls_back() {
        let data = NewsMetrics {
            items: vec![item("ok", 0.1)],
            sentiment_score: f64::NAN,
            ..Default::default()
        };
        let vote = scorer().analyze("AAPL", &data);
        assert_eq!(vote.action, Action::Hold);
        assert_eq!(vote.factors.get("error"), Some(&json!(true)));
    }
}
