//! Indemnification matcher

use shared_types::RiskType;

use super::{contains_any, MatchDetails, MatchSignal, RiskMatcher};
use crate::config::ConfidenceTable;

const INDEMNITY_KEYWORDS: &[&str] = &[
    "indemnify",
    "indemnifies",
    "indemnification",
    "indemnity",
    "hold harmless",
];

/// Phrasings that make the obligation sweep in everything.
const BROAD_KEYWORDS: &[&str] = &[
    "any and all claims",
    "any and all losses",
    "any and all liabilities",
    "defend, indemnify",
];

const MUTUAL_KEYWORDS: &[&str] = &["mutual", "each party", "both parties", "reciprocal"];

pub struct IndemnificationMatcher;

impl RiskMatcher for IndemnificationMatcher {
    fn risk_type(&self) -> RiskType {
        RiskType::Indemnification
    }

    fn evaluate(&self, text: &str, confidence: &ConfidenceTable) -> Option<MatchSignal> {
        if !contains_any(text, INDEMNITY_KEYWORDS) {
            return None;
        }

        let one_sided = contains_any(text, BROAD_KEYWORDS) && !contains_any(text, MUTUAL_KEYWORDS);
        let details = MatchDetails {
            one_sided,
            ..MatchDetails::default()
        };

        Some(MatchSignal {
            confidence: if one_sided {
                confidence.indemnification_broad
            } else {
                confidence.indemnification_base
            },
            details,
        })
    }
}
