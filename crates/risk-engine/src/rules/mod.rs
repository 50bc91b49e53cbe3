//! Custom rule compilation
//!
//! Turns the request's optional free-text rule into a small set of matching
//! predicates. Natural language is ambiguous, so the recognized patterns
//! are a bounded, enumerable set; anything else degrades to a no-op rule.
//! Compilation NEVER fails a request.

use std::collections::HashSet;

use lazy_static::lazy_static;
use regex::Regex;
use shared_types::RiskType;
use tracing::warn;

use crate::extractors::numeric::parse_number_word;

lazy_static! {
    /// "longer than 1 year", "more than ninety days", "over 50 miles"
    static ref ABOVE: Regex = Regex::new(
        r"(?i)\b(?:longer|more|greater|over|above|beyond|exceed(?:s|ing)?)\s*(?:than)?\s+(\d+(?:\.\d+)?|[a-z]+)[-\s]*(year|month|week|day|mile|kilometer|km)s?\b"
    )
    .unwrap();

    /// "shorter than 6 months", "less than 30 days", "under 10 miles"
    static ref BELOW: Regex = Regex::new(
        r"(?i)\b(?:shorter|less|fewer|under|below|within)\s*(?:than)?\s+(\d+(?:\.\d+)?|[a-z]+)[-\s]*(year|month|week|day|mile|kilometer|km)s?\b"
    )
    .unwrap();

    /// "only flag X", "just show X", "ignore everything except X"
    static ref SCOPE_INTENT: Regex =
        Regex::new(r"(?i)\b(?:only|just|except|nothing but|solely)\b").unwrap();
}

/// Risk-type aliases recognized in rule text. Stems, matched by substring.
const ALIASES: &[(&str, RiskType)] = &[
    ("non-compet", RiskType::NonCompete),
    ("noncompet", RiskType::NonCompete),
    ("non compet", RiskType::NonCompete),
    ("compet", RiskType::NonCompete),
    ("terminat", RiskType::Termination),
    ("indemni", RiskType::Indemnification),
    ("hold harmless", RiskType::Indemnification),
    ("confidential", RiskType::Confidentiality),
    ("non-disclosure", RiskType::Confidentiality),
    ("nondisclosure", RiskType::Confidentiality),
    ("nda", RiskType::Confidentiality),
    ("liabilit", RiskType::LiabilityCap),
    ("damages cap", RiskType::LiabilityCap),
];

/// Field a numeric predicate compares against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    DurationMonths,
    DistanceMiles,
    NoticeDays,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    GreaterThan,
    LessThan,
}

impl ComparisonOp {
    /// True when `value` is on the flagged side of `threshold`.
    pub fn holds(self, value: f64, threshold: f64) -> bool {
        match self {
            ComparisonOp::GreaterThan => value > threshold,
            ComparisonOp::LessThan => value < threshold,
        }
    }
}

/// One compiled numeric predicate, tagged to a risk category.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericPredicate {
    pub risk_type: RiskType,
    pub field: NumericField,
    pub op: ComparisonOp,
    pub threshold: f64,
}

impl NumericPredicate {
    /// Human description of the threshold, used in explanations.
    pub fn describe(&self) -> String {
        let (amount, unit) = match self.field {
            NumericField::DurationMonths => (self.threshold, "month"),
            NumericField::DistanceMiles => (self.threshold, "mile"),
            NumericField::NoticeDays => (self.threshold, "day"),
        };
        let direction = match self.op {
            ComparisonOp::GreaterThan => "more than",
            ComparisonOp::LessThan => "less than",
        };
        if (amount - amount.round()).abs() < f64::EPSILON && amount != 1.0 {
            format!("{} {} {}s", direction, amount as i64, unit)
        } else {
            format!("{} {} {}", direction, amount, unit)
        }
    }
}

/// A compiled custom rule. An empty rule is valid and means "no override".
#[derive(Debug, Clone, Default)]
pub struct CustomRule {
    pub raw_text: Option<String>,
    /// When set, classification is limited to these risk types; everything
    /// else reports as Safe.
    pub scope: Option<HashSet<RiskType>>,
    pub predicates: Vec<NumericPredicate>,
}

impl CustomRule {
    pub fn noop() -> Self {
        Self::default()
    }

    pub fn is_noop(&self) -> bool {
        self.scope.is_none() && self.predicates.is_empty()
    }

    /// Whether `risk_type` survives the scope restriction.
    pub fn in_scope(&self, risk_type: RiskType) -> bool {
        match &self.scope {
            Some(scope) => scope.contains(&risk_type),
            None => true,
        }
    }

    /// The predicate pinned to `risk_type`, if any.
    pub fn predicate_for(&self, risk_type: RiskType) -> Option<&NumericPredicate> {
        self.predicates.iter().find(|p| p.risk_type == risk_type)
    }
}

/// Compiles free-text rules. Stateless.
pub struct RuleCompiler;

impl RuleCompiler {
    /// Compile user rule text. Unrecognized input yields a no-op rule and
    /// an advisory log line, never an error.
    pub fn compile(raw: Option<&str>) -> CustomRule {
        let Some(raw) = raw else {
            return CustomRule::noop();
        };
        let trimmed = raw.trim();
        // The dashboard sends empty strings for the untouched field; very
        // short fragments carry no parseable intent either.
        if trimmed.len() <= 5 {
            return CustomRule::noop();
        }

        let lowered = trimmed.to_lowercase();
        let mentioned = mentioned_types(&lowered);

        let scope = if SCOPE_INTENT.is_match(&lowered) && !mentioned.is_empty() {
            Some(mentioned.iter().copied().collect::<HashSet<_>>())
        } else {
            None
        };

        let mut predicates = Vec::new();
        for (regex, op) in [
            (&*ABOVE, ComparisonOp::GreaterThan),
            (&*BELOW, ComparisonOp::LessThan),
        ] {
            for cap in regex.captures_iter(&lowered) {
                let quantity = cap.get(1).unwrap().as_str();
                let Some(quantity) = quantity
                    .parse::<f64>()
                    .ok()
                    .or_else(|| parse_number_word(quantity))
                else {
                    continue;
                };
                let unit = cap.get(2).unwrap().as_str();
                let (field, threshold) = match unit {
                    "year" => (NumericField::DurationMonths, quantity * 12.0),
                    "month" => (NumericField::DurationMonths, quantity),
                    "week" => (NumericField::DurationMonths, quantity / 4.0),
                    "day" => (NumericField::NoticeDays, quantity),
                    "mile" => (NumericField::DistanceMiles, quantity),
                    "kilometer" | "km" => (NumericField::DistanceMiles, quantity * 0.621371),
                    _ => continue,
                };
                let risk_type = mentioned
                    .first()
                    .copied()
                    .unwrap_or_else(|| default_type_for(field));
                predicates.push(NumericPredicate {
                    risk_type,
                    field,
                    op,
                    threshold,
                });
            }
        }

        let rule = CustomRule {
            raw_text: Some(trimmed.to_string()),
            scope,
            predicates,
        };
        if rule.is_noop() {
            warn!(rule = trimmed, "custom rule not recognized, ignoring");
        }
        rule
    }
}

/// All risk types whose alias stems appear in the rule text, in alias
/// table order.
fn mentioned_types(lowered: &str) -> Vec<RiskType> {
    let mut found = Vec::new();
    for (stem, risk_type) in ALIASES {
        if lowered.contains(stem) && !found.contains(risk_type) {
            found.push(*risk_type);
        }
    }
    found
}

/// Fallback category for a predicate whose rule text names no risk type.
fn default_type_for(field: NumericField) -> RiskType {
    match field {
        NumericField::DurationMonths => RiskType::NonCompete,
        NumericField::DistanceMiles => RiskType::NonCompete,
        NumericField::NoticeDays => RiskType::Termination,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_and_trivial_rules_are_noops() {
        assert!(RuleCompiler::compile(None).is_noop());
        assert!(RuleCompiler::compile(Some("")).is_noop());
        assert!(RuleCompiler::compile(Some("  ok ")).is_noop());
    }

    #[test]
    fn unrecognized_text_degrades_to_noop() {
        let rule = RuleCompiler::compile(Some("please be extra careful with this one"));
        assert!(rule.is_noop());
        assert!(rule.raw_text.is_some());
    }

    #[test]
    fn only_flag_scope_restriction() {
        let rule = RuleCompiler::compile(Some("only flag indemnification clauses"));
        let scope = rule.scope.as_ref().expect("scope");
        assert_eq!(scope.len(), 1);
        assert!(rule.in_scope(RiskType::Indemnification));
        assert!(!rule.in_scope(RiskType::NonCompete));
        // Safe is never in a restricted scope; unmatched clauses stay Safe
        // through the classifier's fallback path instead.
    }

    #[test]
    fn except_phrasing_also_scopes() {
        let rule = RuleCompiler::compile(Some("ignore everything except termination"));
        assert!(rule.in_scope(RiskType::Termination));
        assert!(!rule.in_scope(RiskType::LiabilityCap));
    }

    #[test]
    fn duration_threshold_predicate() {
        let rule = RuleCompiler::compile(Some("flag non-competes longer than 1 year"));
        assert!(rule.scope.is_none());
        let p = rule.predicate_for(RiskType::NonCompete).expect("predicate");
        assert_eq!(p.field, NumericField::DurationMonths);
        assert_eq!(p.op, ComparisonOp::GreaterThan);
        assert_eq!(p.threshold, 12.0);
        assert!(p.op.holds(24.0, p.threshold));
        assert!(!p.op.holds(6.0, p.threshold));
    }

    #[test]
    fn spelled_numbers_and_days() {
        let rule = RuleCompiler::compile(Some("termination notice under thirty days"));
        let p = rule.predicate_for(RiskType::Termination).expect("predicate");
        assert_eq!(p.field, NumericField::NoticeDays);
        assert_eq!(p.op, ComparisonOp::LessThan);
        assert_eq!(p.threshold, 30.0);
    }

    #[test]
    fn predicate_without_named_type_uses_field_default() {
        let rule = RuleCompiler::compile(Some("anything over 50 miles is a problem"));
        let p = rule.predicate_for(RiskType::NonCompete).expect("predicate");
        assert_eq!(p.field, NumericField::DistanceMiles);
        assert_eq!(p.threshold, 50.0);
    }

    #[test]
    fn describe_is_stable() {
        let p = NumericPredicate {
            risk_type: RiskType::NonCompete,
            field: NumericField::DurationMonths,
            op: ComparisonOp::GreaterThan,
            threshold: 12.0,
        };
        assert_eq!(p.describe(), "more than 12 months");
    }
}
