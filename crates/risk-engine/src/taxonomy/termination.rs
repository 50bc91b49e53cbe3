//! Termination-clause matcher

use shared_types::RiskType;

use super::{contains_all_groups, contains_any, MatchDetails, MatchSignal, RiskMatcher};
use crate::config::ConfidenceTable;
use crate::extractors::numeric::extract_notice_days;

const TERMINATION_KEYWORDS: &[&str] = &["terminate", "termination", "terminating"];

/// Contract-context words that keep this from firing on stray verbs.
const CONTEXT_KEYWORDS: &[&str] = &[
    "agreement",
    "contract",
    "employment",
    "engagement",
    "services",
];

/// At-will style discretion.
const NO_CAUSE_KEYWORDS: &[&str] = &[
    "without cause",
    "for any reason",
    "for no reason",
    "at its sole discretion",
    "at any time",
];

const NO_NOTICE_KEYWORDS: &[&str] = &["without notice", "without prior notice", "immediately"];

pub struct TerminationMatcher;

impl RiskMatcher for TerminationMatcher {
    fn risk_type(&self) -> RiskType {
        RiskType::Termination
    }

    fn evaluate(&self, text: &str, confidence: &ConfidenceTable) -> Option<MatchSignal> {
        if !contains_all_groups(text, &[TERMINATION_KEYWORDS, CONTEXT_KEYWORDS]) {
            return None;
        }

        let unilateral =
            contains_any(text, NO_CAUSE_KEYWORDS) && contains_any(text, NO_NOTICE_KEYWORDS);
        let details = MatchDetails {
            notice_days: extract_notice_days(text),
            unilateral,
            ..MatchDetails::default()
        };

        Some(MatchSignal {
            confidence: if unilateral {
                confidence.termination_unilateral
            } else {
                confidence.termination_base
            },
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(text: &str) -> Option<MatchSignal> {
        TerminationMatcher.evaluate(&text.to_lowercase(), &ConfidenceTable::default())
    }

    #[test]
    fn unilateral_termination_is_elevated() {
        let s = signal(
            "The Company may terminate this Agreement at any time without cause and without \
             prior notice.",
        )
        .expect("should fire");
        assert_eq!(
            s.confidence,
            ConfidenceTable::default().termination_unilateral
        );
        assert!(s.details.unilateral);
    }

    #[test]
    fn termination_with_notice_is_base() {
        let s = signal(
            "Either party may terminate this Agreement by giving thirty (30) days' written \
             notice to the other party.",
        )
        .expect("should fire");
        assert_eq!(s.confidence, ConfidenceTable::default().termination_base);
        assert_eq!(s.details.notice_days, Some(30.0));
    }

    #[test]
    fn ignores_text_without_contract_context() {
        assert!(signal("The lease terminates the tenancy of the premises.").is_none());
    }
}
