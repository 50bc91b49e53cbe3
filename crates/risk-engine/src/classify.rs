//! Per-clause risk classification
//!
//! Runs every built-in matcher against a clause, applies the compiled
//! custom rule, and picks one `(risk_type, confidence)`. This stage never
//! fails: no signal is a valid result (`Safe`).

use shared_types::RiskType;

use crate::config::{ConfidenceTable, EngineConfig};
use crate::extractors::numeric;
use crate::rules::{CustomRule, NumericField, NumericPredicate};
use crate::taxonomy::{builtin_taxonomy, MatchDetails, RiskMatcher};

/// How a custom-rule predicate landed on this clause.
#[derive(Debug, Clone)]
pub struct RuleOutcome {
    pub description: String,
    pub value: f64,
    pub violated: bool,
}

/// Classification result for one clause, before explanation rendering.
#[derive(Debug, Clone)]
pub struct ClassifiedClause {
    pub risk_type: RiskType,
    pub confidence: f64,
    pub details: MatchDetails,
    /// Set when the clause matched a risk type the custom rule scoped out.
    pub scoped_out: Option<RiskType>,
    /// Set when a custom-rule numeric predicate applied to this clause.
    pub rule_outcome: Option<RuleOutcome>,
}

impl ClassifiedClause {
    fn safe(confidence: &ConfidenceTable, scoped_out: Option<RiskType>) -> Self {
        Self {
            risk_type: RiskType::Safe,
            confidence: confidence.safe,
            details: MatchDetails::default(),
            scoped_out,
            rule_outcome: None,
        }
    }
}

/// Stateless per-clause classifier. Shared across the worker pool.
pub struct ClauseClassifier {
    taxonomy: Vec<Box<dyn RiskMatcher>>,
    confidence: ConfidenceTable,
}

impl ClauseClassifier {
    pub fn new(config: &EngineConfig) -> Self {
        Self::with_taxonomy(builtin_taxonomy(), config.confidence.clone())
    }

    /// Build a classifier over a custom matcher set. Matcher order is the
    /// tie-break order.
    pub fn with_taxonomy(taxonomy: Vec<Box<dyn RiskMatcher>>, confidence: ConfidenceTable) -> Self {
        Self {
            taxonomy,
            confidence,
        }
    }

    /// Classify one clause under the compiled custom rule. Deterministic:
    /// same text and rule always produce the same result.
    pub fn classify(&self, clause_text: &str, rule: &CustomRule) -> ClassifiedClause {
        let lowered = clause_text.to_lowercase();

        // Highest confidence wins. The strict `>` while walking the
        // taxonomy in declaration order makes ties deterministic: the
        // earlier-declared risk type keeps the slot.
        let mut winner: Option<(RiskType, f64, MatchDetails)> = None;
        let mut scoped_out = None;
        for matcher in &self.taxonomy {
            let Some(signal) = matcher.evaluate(&lowered, &self.confidence) else {
                continue;
            };
            if !rule.in_scope(matcher.risk_type()) {
                scoped_out.get_or_insert(matcher.risk_type());
                continue;
            }
            if winner
                .as_ref()
                .map_or(true, |(_, best, _)| signal.confidence > *best)
            {
                winner = Some((matcher.risk_type(), signal.confidence, signal.details));
            }
        }

        let Some((risk_type, confidence, details)) = winner else {
            return ClassifiedClause::safe(&self.confidence, scoped_out);
        };

        let (confidence, rule_outcome) =
            self.apply_predicate(rule.predicate_for(risk_type), confidence, &details, &lowered);

        ClassifiedClause {
            risk_type,
            confidence: confidence.clamp(0.0, 1.0),
            details,
            scoped_out: None,
            rule_outcome,
        }
    }

    /// Adjust confidence by the custom-rule predicate for the winning risk
    /// type, when the clause carries a comparable value.
    fn apply_predicate(
        &self,
        predicate: Option<&NumericPredicate>,
        confidence: f64,
        details: &MatchDetails,
        lowered: &str,
    ) -> (f64, Option<RuleOutcome>) {
        let Some(predicate) = predicate else {
            return (confidence, None);
        };

        let value = match predicate.field {
            NumericField::DurationMonths => details
                .duration_months
                .or_else(|| numeric::extract_duration_months(lowered)),
            NumericField::DistanceMiles => details
                .distance_miles
                .or_else(|| numeric::extract_distance_miles(lowered)),
            NumericField::NoticeDays => details
                .notice_days
                .or_else(|| numeric::extract_notice_days(lowered)),
        };
        let Some(value) = value else {
            return (confidence, None);
        };

        let violated = predicate.op.holds(value, predicate.threshold);
        let adjusted = if violated {
            confidence + self.confidence.rule_violation_bonus
        } else {
            confidence - self.confidence.rule_satisfied_penalty
        };
        (
            adjusted,
            Some(RuleOutcome {
                description: predicate.describe(),
                value,
                violated,
            }),
        )
    }
}
