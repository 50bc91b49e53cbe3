//! Explanation generation
//!
//! Renders one markdown rationale per assessment: a severity-qualified
//! risk statement, then a remediation recommendation. Deterministic for a
//! given (risk type, matched values) pair so reports are reproducible.

use shared_types::{RiskType, Severity};

use crate::classify::ClassifiedClause;
use crate::config::ConfidenceTable;
use crate::taxonomy::MatchDetails;

/// Renders clause explanations. Stateless; templates are keyed by risk
/// type and interpolate the matcher's extracted values.
pub struct ExplanationGenerator {
    high_band: f64,
    medium_band: f64,
}

impl ExplanationGenerator {
    pub fn new(confidence: &ConfidenceTable) -> Self {
        Self {
            high_band: confidence.high_band,
            medium_band: confidence.medium_band,
        }
    }

    pub fn severity(&self, confidence: f64) -> Severity {
        if confidence >= self.high_band {
            Severity::High
        } else if confidence >= self.medium_band {
            Severity::Medium
        } else {
            Severity::Low
        }
    }

    /// Render the markdown explanation for a classified clause.
    pub fn render(&self, classified: &ClassifiedClause) -> String {
        let mut explanation = match classified.risk_type {
            RiskType::Safe => self.render_safe(classified),
            risk_type => {
                let statement = self.statement(risk_type, &classified.details);
                let recommendation = recommendation(risk_type, &classified.details);
                format!(
                    "{} {}\n\n**Recommendation:** {}",
                    self.severity_prefix(classified.confidence),
                    statement,
                    recommendation
                )
            }
        };

        if let Some(outcome) = &classified.rule_outcome {
            let verdict = if outcome.violated {
                "violates"
            } else {
                "stays within"
            };
            explanation.push_str(&format!(
                "\n\n**Custom Rule:** the extracted value of {} {} your threshold of {}.",
                format_quantity(outcome.value),
                verdict,
                outcome.description
            ));
        }

        explanation
    }

    fn severity_prefix(&self, confidence: f64) -> &'static str {
        match self.severity(confidence) {
            Severity::High => "**High Risk Detected:**",
            Severity::Medium => "**Medium Risk:**",
            Severity::Low => "**Low Risk:**",
        }
    }

    fn render_safe(&self, classified: &ClassifiedClause) -> String {
        match classified.scoped_out {
            Some(suppressed) => format!(
                "**Looks Standard:** this clause matched the {} pattern, which is outside \
                 the scope of your custom rule, so it is reported as safe.",
                suppressed
            ),
            None => "**Looks Standard:** no known risk pattern matched this clause; it reads \
                     as routine contract language."
                .to_string(),
        }
    }

    fn statement(&self, risk_type: RiskType, details: &MatchDetails) -> String {
        match risk_type {
            RiskType::NonCompete => {
                let duration = details
                    .duration_months
                    .map(|m| format!(" for {}", format_duration(m)))
                    .unwrap_or_default();
                let radius = details
                    .distance_miles
                    .map(|miles| format!(" within a {}-mile radius", format_quantity(miles)))
                    .unwrap_or_default();
                format!(
                    "this clause restrains competitive activity{}{}. Restraints of this \
                     breadth may be unenforceable in some jurisdictions (e.g. California, \
                     where non-competes are generally void).",
                    duration, radius
                )
            }
            RiskType::Termination => {
                if details.unilateral {
                    "the counterparty may terminate at any time without cause or prior \
                     notice, which can support wrongful-termination claims unless the \
                     engagement is strictly at-will."
                        .to_string()
                } else if let Some(days) = details.notice_days {
                    format!(
                        "this clause permits termination on {} days' notice; confirm the \
                         period is workable for transition and cure.",
                        format_quantity(days)
                    )
                } else {
                    "this clause governs termination of the agreement; the grounds and \
                     notice mechanics deserve review."
                        .to_string()
                }
            }
            RiskType::Indemnification => {
                if details.one_sided {
                    "this indemnity sweeps in any and all claims and runs one way, leaving \
                     the indemnifying party exposed well beyond its own fault."
                        .to_string()
                } else {
                    "standard indemnification clause, but the allocation of risk is one to \
                     confirm.".to_string()
                }
            }
            RiskType::Confidentiality => {
                if details.perpetual {
                    "this confidentiality obligation has no time bound, which courts may \
                     read as an unreasonable restraint for anything short of a trade secret."
                        .to_string()
                } else {
                    "this clause imposes confidentiality obligations; check the definition \
                     of confidential information for overbreadth."
                        .to_string()
                }
            }
            RiskType::LiabilityCap => {
                if details.damages_waiver {
                    "this clause caps liability and waives whole damage categories \
                     (consequential, indirect), which can leave real losses unrecoverable."
                        .to_string()
                } else {
                    "this clause limits liability; verify the cap is proportionate to the \
                     value at risk under the agreement."
                        .to_string()
                }
            }
            RiskType::Safe => unreachable!("safe clauses render via render_safe"),
        }
    }
}

fn recommendation(risk_type: RiskType, details: &MatchDetails) -> &'static str {
    match risk_type {
        RiskType::NonCompete => {
            "limit the duration to 6-12 months and narrow the geographic scope to the \
             markets where the employee actually worked."
        }
        RiskType::Termination => {
            if details.unilateral {
                "add a notice period (e.g. 30 days) or payment in lieu of notice."
            } else {
                "pair the termination right with a cure period for remediable breaches."
            }
        }
        RiskType::Indemnification => {
            "make the indemnity mutual and carve out claims caused by the other party's \
             own negligence."
        }
        RiskType::Confidentiality => {
            "bound the obligation to 3-5 years and exclude information that is public or \
             independently developed."
        }
        RiskType::LiabilityCap => {
            "cap liability at 12 months of fees and preserve carve-outs for gross \
             negligence and willful misconduct."
        }
        RiskType::Safe => unreachable!("safe clauses carry no recommendation"),
    }
}

/// "24 months" → "2 years", "18 months" → "18 months".
fn format_duration(months: f64) -> String {
    let years = months / 12.0;
    if months >= 12.0 && (years - years.round()).abs() < 1e-9 {
        let years = years.round() as i64;
        if years == 1 {
            "1 year".to_string()
        } else {
            format!("{} years", years)
        }
    } else {
        format!("{} months", format_quantity(months))
    }
}

/// Render a numeric value without a trailing ".0" for whole numbers.
fn format_quantity(value: f64) -> String {
    if (value - value.round()).abs() < 1e-9 {
        format!("{}", value.round() as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Placeholder text for a clause whose classification faulted. The report
/// still covers the clause; the fault is visible instead of fatal.
pub fn fault_note() -> String {
    "**Analysis Unavailable:** an internal error interrupted classification of this \
     clause, so it is reported as safe with low confidence. Re-run the analysis to retry."
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::ClauseClassifier;
    use crate::config::EngineConfig;
    use crate::rules::{CustomRule, RuleCompiler};

    fn generator() -> ExplanationGenerator {
        ExplanationGenerator::new(&ConfidenceTable::default())
    }

    fn classify(text: &str, rule: &CustomRule) -> ClassifiedClause {
        ClauseClassifier::new(&EngineConfig::default()).classify(text, rule)
    }

    const NON_COMPETE: &str = "The Employee shall not, for a period of two (2) years after \
        the termination of this Agreement, engage in any business that competes with the \
        Company within a 100-mile radius.";

    #[test]
    fn non_compete_explanation_carries_values_and_caveat() {
        let classified = classify(NON_COMPETE, &CustomRule::noop());
        let markdown = generator().render(&classified);
        assert!(markdown.starts_with("**High Risk Detected:**"));
        assert!(markdown.contains("2 years"));
        assert!(markdown.contains("100-mile radius"));
        assert!(markdown.contains("jurisdictions"));
        assert!(markdown.contains("**Recommendation:** limit the duration to 6-12 months"));
    }

    #[test]
    fn safe_clause_gets_affirming_note() {
        let classified = classify("Notices shall be sent to the addresses below.", &CustomRule::noop());
        let markdown = generator().render(&classified);
        assert!(markdown.starts_with("**Looks Standard:**"));
        assert!(!markdown.is_empty());
    }

    #[test]
    fn scoped_out_clause_names_the_suppressed_pattern() {
        let rule = RuleCompiler::compile(Some("only flag indemnification clauses"));
        let classified = classify(NON_COMPETE, &rule);
        let markdown = generator().render(&classified);
        assert!(markdown.contains("Non-Compete"));
        assert!(markdown.contains("outside the scope"));
    }

    #[test]
    fn rule_outcome_appends_custom_rule_line() {
        let rule = RuleCompiler::compile(Some("flag non-competes longer than 1 year"));
        let classified = classify(NON_COMPETE, &rule);
        let markdown = generator().render(&classified);
        assert!(markdown.contains("**Custom Rule:**"));
        assert!(markdown.contains("violates"));
    }

    #[test]
    fn rendering_is_deterministic() {
        let classified = classify(NON_COMPETE, &CustomRule::noop());
        let generator = generator();
        assert_eq!(generator.render(&classified), generator.render(&classified));
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(24.0), "2 years");
        assert_eq!(format_duration(12.0), "1 year");
        assert_eq!(format_duration(18.0), "18 months");
        assert_eq!(format_duration(6.0), "6 months");
    }
}
