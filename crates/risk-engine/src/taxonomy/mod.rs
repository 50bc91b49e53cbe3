//! Built-in risk taxonomy
//!
//! One matcher per risk category. Declaration order in `builtin_taxonomy`
//! is the classifier's tie-break order; new matchers go at the end.

pub mod confidentiality;
pub mod indemnification;
pub mod liability_cap;
pub mod non_compete;
pub mod termination;

use shared_types::RiskType;

use crate::config::ConfidenceTable;

/// Values a matcher pulled out of the clause, carried through to the
/// explanation generator and the custom-rule predicates.
#[derive(Debug, Clone, Default)]
pub struct MatchDetails {
    pub duration_months: Option<f64>,
    pub distance_miles: Option<f64>,
    pub notice_days: Option<f64>,
    /// Termination exercisable without cause and without notice.
    pub unilateral: bool,
    /// Confidentiality obligation with no time bound.
    pub perpetual: bool,
    /// Indemnity covering "any and all claims", one-way.
    pub one_sided: bool,
    /// Liability cap paired with a consequential-damages waiver.
    pub damages_waiver: bool,
}

/// A fired matcher: confidence plus what it saw.
#[derive(Debug, Clone)]
pub struct MatchSignal {
    pub confidence: f64,
    pub details: MatchDetails,
}

/// One built-in risk pattern.
pub trait RiskMatcher: Send + Sync {
    fn risk_type(&self) -> RiskType;

    /// Run the matcher against lowercased clause text. `None` means the
    /// pattern did not fire.
    fn evaluate(&self, text: &str, confidence: &ConfidenceTable) -> Option<MatchSignal>;
}

/// The fixed taxonomy, in tie-break order.
pub fn builtin_taxonomy() -> Vec<Box<dyn RiskMatcher>> {
    vec![
        Box::new(non_compete::NonCompeteMatcher),
        Box::new(termination::TerminationMatcher),
        Box::new(indemnification::IndemnificationMatcher),
        Box::new(confidentiality::ConfidentialityMatcher),
        Box::new(liability_cap::LiabilityCapMatcher),
    ]
}

/// True if `text` contains at least one keyword from every group.
pub(crate) fn contains_all_groups(text: &str, keyword_groups: &[&[&str]]) -> bool {
    keyword_groups
        .iter()
        .all(|group| group.iter().any(|keyword| text.contains(keyword)))
}

/// True if `text` contains any of the keywords.
pub(crate) fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| text.contains(keyword))
}
