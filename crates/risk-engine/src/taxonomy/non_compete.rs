//! Non-compete / restraint-of-trade matcher
//!
//! Confidence climbs when the restraint is concrete: a duration plus a
//! geographic radius is the classic over-broad non-compete.

use shared_types::RiskType;

use super::{contains_all_groups, contains_any, MatchDetails, MatchSignal, RiskMatcher};
use crate::config::ConfidenceTable;
use crate::extractors::numeric::{extract_distance_miles, extract_duration_months};

/// Direct references to a non-compete obligation.
const DIRECT_KEYWORDS: &[&str] = &[
    "non-compete",
    "noncompete",
    "non compete",
    "covenant not to compete",
    "restraint of trade",
];

/// Restraint phrasings.
const RESTRAINT_KEYWORDS: &[&str] = &[
    "shall not",
    "agrees not to",
    "will not",
    "must not",
    "is prohibited from",
];

/// Competitive-activity references.
const COMPETITION_KEYWORDS: &[&str] = &[
    "compete",
    "competing",
    "competes",
    "competitor",
    "competitive business",
    "similar business",
    "solicit any customer",
    "solicit any employee",
];

pub struct NonCompeteMatcher;

impl RiskMatcher for NonCompeteMatcher {
    fn risk_type(&self) -> RiskType {
        RiskType::NonCompete
    }

    fn evaluate(&self, text: &str, confidence: &ConfidenceTable) -> Option<MatchSignal> {
        let direct = contains_any(text, DIRECT_KEYWORDS);
        let clustered = contains_all_groups(text, &[RESTRAINT_KEYWORDS, COMPETITION_KEYWORDS]);
        if !direct && !clustered {
            return None;
        }

        let details = MatchDetails {
            duration_months: extract_duration_months(text),
            distance_miles: extract_distance_miles(text),
            ..MatchDetails::default()
        };

        let confidence = match (details.duration_months, details.distance_miles) {
            (Some(_), Some(_)) => confidence.non_compete_full,
            (Some(_), None) | (None, Some(_)) => confidence.non_compete_scoped,
            (None, None) => confidence.non_compete_base,
        };

        Some(MatchSignal {
            confidence,
            details,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn signal(text: &str) -> Option<MatchSignal> {
        NonCompeteMatcher.evaluate(&text.to_lowercase(), &ConfidenceTable::default())
    }

    #[test]
    fn duration_plus_geography_is_high_confidence() {
        let s = signal(
            "The Employee shall not, for a period of two (2) years after the termination of \
             this Agreement, engage in any business that competes with the Company within a \
             100-mile radius.",
        )
        .expect("should fire");
        assert_eq!(s.confidence, ConfidenceTable::default().non_compete_full);
        assert_eq!(s.details.duration_months, Some(24.0));
        assert_eq!(s.details.distance_miles, Some(100.0));
    }

    #[test]
    fn duration_alone_is_mid_confidence() {
        let s = signal(
            "Employee agrees not to work for any competitor of the Company for a period of \
             two years after leaving.",
        )
        .expect("should fire");
        assert_eq!(s.confidence, ConfidenceTable::default().non_compete_scoped);
    }

    #[test]
    fn bare_restraint_is_base_confidence() {
        let s = signal("The Contractor shall not solicit any customer of the Client.")
            .expect("should fire");
        assert_eq!(s.confidence, ConfidenceTable::default().non_compete_base);
    }

    #[test]
    fn ignores_unrelated_clauses() {
        assert!(signal("Rent is due on the first day of each month.").is_none());
    }
}
