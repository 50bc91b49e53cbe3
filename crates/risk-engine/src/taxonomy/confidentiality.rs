//! Confidentiality / non-disclosure matcher

use shared_types::RiskType;

use super::{contains_any, MatchDetails, MatchSignal, RiskMatcher};
use crate::config::ConfidenceTable;
use crate::extractors::numeric::extract_duration_months;

const CONFIDENTIALITY_KEYWORDS: &[&str] = &[
    "confidential information",
    "confidentiality",
    "non-disclosure",
    "nondisclosure",
    "shall not disclose",
    "trade secret",
    "proprietary information",
];

/// No-time-bound phrasings.
const PERPETUAL_KEYWORDS: &[&str] = &[
    "in perpetuity",
    "perpetual",
    "indefinitely",
    "at all times thereafter",
    "survive the termination of this agreement without limit",
];

pub struct ConfidentialityMatcher;

impl RiskMatcher for ConfidentialityMatcher {
    fn risk_type(&self) -> RiskType {
        RiskType::Confidentiality
    }

    fn evaluate(&self, text: &str, confidence: &ConfidenceTable) -> Option<MatchSignal> {
        if !contains_any(text, CONFIDENTIALITY_KEYWORDS) {
            return None;
        }

        let perpetual = contains_any(text, PERPETUAL_KEYWORDS);
        let details = MatchDetails {
            duration_months: extract_duration_months(text),
            perpetual,
            ..MatchDetails::default()
        };

        Some(MatchSignal {
            confidence: if perpetual {
                confidence.confidentiality_perpetual
            } else {
                confidence.confidentiality_base
            },
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(text: &str) -> Option<MatchSignal> {
        ConfidentialityMatcher.evaluate(&text.to_lowercase(), &ConfidenceTable::default())
    }

    #[test]
    fn bounded_nda_is_base_confidence() {
        let s = signal(
            "The Receiving Party shall not disclose Confidential Information for a period of \
             three (3) years from the date of disclosure.",
        )
        .expect("should fire");
        assert_eq!(
            s.confidence,
            ConfidenceTable::default().confidentiality_base
        );
        assert_eq!(s.details.duration_months, Some(36.0));
    }

    #[test]
    fn perpetual_obligation_is_elevated() {
        let s = signal(
            "The obligations of confidentiality set out herein shall continue in perpetuity.",
        )
        .expect("should fire");
        assert_eq!(
            s.confidence,
            ConfidenceTable::default().confidentiality_perpetual
        );
        assert!(s.details.perpetual);
    }

    #[test]
    fn ignores_unrelated_clauses() {
        assert!(signal("The purchase price shall be paid in two installments.").is_none());
    }
}
