// =============================================================================
// Regulatory / Litigation Keyword Risk
// =============================================================================
//
// Case-insensitive substring matching of litigation and regulatory
// vocabularies across news items. Each item counts at most once per
// vocabulary, however many keywords it contains. CRITICAL severity forces a
// SELL at the news-domain level.

use serde::{Deserialize, Serialize};

const LITIGATION_KEYWORDS: [&str; 5] =
    ["lawsuit", "litigation", "sued", "settlement", "class action"];

const REGULATORY_KEYWORDS: [&str; 10] = [
    "sec",
    "ftc",
    "doj",
    "antitrust",
    "investigation",
    "probe",
    "fine",
    "penalty",
    "violation",
    "compliance",
];

/// Maximum matched keywords reported back.
const MAX_REPORTED_KEYWORDS: usize = 5;

/// Severity of detected regulatory/litigation exposure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskSeverity {
    None,
    Low,
    Moderate,
    High,
    /// >= 5 total issues or >= 3 litigation items; forces SELL.
    Critical,
}

impl std::fmt::Display for RiskSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::None => write!(f, "NONE"),
            Self::Low => write!(f, "LOW"),
            Self::Moderate => write!(f, "MODERATE"),
            Self::High => write!(f, "HIGH"),
            Self::Critical => write!(f, "CRITICAL"),
        }
    }
}

/// Keyword-risk scan result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegulatoryRisk {
    /// Items that matched a litigation keyword.
    pub litigation_count: u32,
    /// Items that matched a regulatory keyword.
    pub regulatory_count: u32,
    pub severity: RiskSeverity,
    /// Up to 5 distinct keywords that matched.
    pub keywords_found: Vec<String>,
}

impl RegulatoryRisk {
    pub fn has_risk(&self) -> bool {
        self.severity != RiskSeverity::None
    }
}

/// Scan news item texts for litigation and regulatory exposure.
///
/// Each text is one news item; matching is lowercase substring.
pub fn scan_regulatory_risk<S: AsRef<str>>(texts: &[S]) -> RegulatoryRisk {
    let mut litigation_count = 0u32;
    let mut regulatory_count = 0u32;
    let mut keywords_found: Vec<String> = Vec::new();

    for text in texts {
        let content = text.as_ref().to_lowercase();

        // One count per item per vocabulary, regardless of multiple hits.
        for keyword in LITIGATION_KEYWORDS {
            if content.contains(keyword) {
                litigation_count += 1;
                if !keywords_found.iter().any(|k| k == keyword) {
                    keywords_found.push(keyword.to_string());
                }
                break;
            }
        }

        for keyword in REGULATORY_KEYWORDS {
            if content.contains(keyword) {
                regulatory_count += 1;
                if !keywords_found.iter().any(|k| k == keyword) {
                    keywords_found.push(keyword.to_string());
                }
                break;
            }
        }
    }

    let total = litigation_count + regulatory_count;

    let severity = if total == 0 {
        RiskSeverity::None
    } else if total >= 5 || litigation_count >= 3 {
        RiskSeverity::Critical
    } else if total >= 3 || litigation_count >= 2 {
        RiskSeverity::High
    } else if total >= 2 {
        RiskSeverity::Moderate
    } else {
        RiskSeverity::Low
    };

    keywords_found.truncate(MAX_REPORTED_KEYWORDS);

    RegulatoryRisk {
        litigation_count,
        regulatory_count,
        severity,
        keywords_found,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clean_news_has_no_risk() {
        let texts = ["Quarterly earnings beat expectations", "New product launch"];
        let risk = scan_regulatory_risk(&texts);
        assert_eq!(risk.severity, RiskSeverity::None);
        assert!(!risk.has_risk());
        assert!(risk.keywords_found.is_empty());
    }

    #[test]
    fn single_issue_is_low() {
        let texts = ["Company faces antitrust scrutiny"];
        let risk = scan_regulatory_risk(&texts);
        assert_eq!(risk.regulatory_count, 1);
        assert_eq!(risk.severity, RiskSeverity::Low);
    }

    #[test]
    fn one_item_counts_once_per_vocabulary() {
        // Multiple litigation keywords in one item still count once.
        let texts = ["Lawsuit and litigation over settlement terms"];
        let risk = scan_regulatory_risk(&texts);
        assert_eq!(risk.litigation_count, 1);
    }

    #[test]
    fn item_can_hit_both_vocabularies() {
        let texts = ["Lawsuit follows SEC investigation"];
        let risk = scan_regulatory_risk(&texts);
        assert_eq!(risk.litigation_count, 1);
        assert_eq!(risk.regulatory_count, 1);
        assert_eq!(risk.severity, RiskSeverity::Moderate);
    }

    #[test]
    fn three_litigation_items_are_critical() {
        let texts = [
            "Class action filed",
            "Company sued by investors",
            "New lawsuit over patents",
        ];
        let risk = scan_regulatory_risk(&texts);
        assert_eq!(risk.litigation_count, 3);
        assert_eq!(risk.severity, RiskSeverity::Critical);
    }

    #[test]
    fn five_total_issues_are_critical() {
        let texts = [
            "SEC probe widens",
            "FTC opens investigation",
            "DOJ antitrust case",
            "Record fine expected",
            "Compliance failures cited",
        ];
        let risk = scan_regulatory_risk(&texts);
        assert_eq!(risk.severity, RiskSeverity::Critical);
    }

    #[test]
    fn matching_is_case_insensitive() {
        let texts = ["LAWSUIT Filed In Federal Court"];
        let risk = scan_regulatory_risk(&texts);
        assert_eq!(risk.litigation_count, 1);
    }

    #[test]
    fn two_litigation_items_are_high() {
        let texts = ["Sued over data breach", "Settlement talks stall"];
        let risk = scan_regulatory_risk(&texts);
        assert_eq!(risk.severity, RiskSeverity::High);
    }

    #[test]
    fn keyword_report_caps_at_five() {
        let texts = [
            "lawsuit news",
            "litigation news",
            "sued again",
            "settlement reached",
            "class action looms",
            "sec probe",
            "ftc fine",
        ];
        let risk = scan_regulatory_risk(&texts);
        assert!(risk.keywords_found.len() <= 5);
    }
}
