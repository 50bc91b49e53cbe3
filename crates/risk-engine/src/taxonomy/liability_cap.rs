//! Limitation-of-liability matcher

use shared_types::RiskType;

use super::{contains_any, MatchDetails, MatchSignal, RiskMatcher};
use crate::config::ConfidenceTable;

const CAP_KEYWORDS: &[&str] = &[
    "limitation of liability",
    "liability shall not exceed",
    "liability is limited to",
    "aggregate liability",
    "total liability",
    "in no event shall",
];

const LIABILITY_KEYWORDS: &[&str] = &["liability", "liable", "damages"];

/// Waivers of whole damage categories.
const WAIVER_KEYWORDS: &[&str] = &[
    "consequential damages",
    "indirect damages",
    "incidental damages",
    "special damages",
    "punitive damages",
    "loss of profits",
];

pub struct LiabilityCapMatcher;

impl RiskMatcher for LiabilityCapMatcher {
    fn risk_type(&self) -> RiskType {
        RiskType::LiabilityCap
    }

    fn evaluate(&self, text: &str, confidence: &ConfidenceTable) -> Option<MatchSignal> {
        if !(contains_any(text, CAP_KEYWORDS) && contains_any(text, LIABILITY_KEYWORDS)) {
            return None;
        }

        let damages_waiver = contains_any(text, WAIVER_KEYWORDS);
        let details = MatchDetails {
            damages_waiver,
            ..MatchDetails::default()
        };

        Some(MatchSignal {
            confidence: if damages_waiver {
                confidence.liability_cap_waiver
            } else {
                confidence.liability_cap_base
            },
            details,
        })
    }
}
