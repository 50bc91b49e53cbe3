//! Report assembly
//!
//! Fan-in side of the per-clause pipeline: an index-addressed buffer sized
//! to the clause count. Workers finish in any order; the report comes out
//! in `sequence_id` order, with no entry dropped.

use shared_types::{AnalysisReport, Clause, ClauseFinding, RiskType};
use tracing::warn;

use crate::explain;

/// Collects per-clause findings into the final `AnalysisReport`.
pub struct ReportAssembler {
    filename: String,
    /// Clause texts, kept so a missing slot can still be reported.
    clause_texts: Vec<String>,
    slots: Vec<Option<ClauseFinding>>,
    fault_confidence: f64,
}

impl ReportAssembler {
    pub fn new(filename: &str, clauses: &[Clause], fault_confidence: f64) -> Self {
        Self {
            filename: filename.to_string(),
            clause_texts: clauses.iter().map(|c| c.text.clone()).collect(),
            slots: vec![None; clauses.len()],
            fault_confidence,
        }
    }

    /// Record one finding. The slot index is the clause's 1-based id.
    pub fn insert(&mut self, finding: ClauseFinding) {
        let index = finding.id.saturating_sub(1);
        match self.slots.get_mut(index) {
            Some(slot) => *slot = Some(finding),
            None => warn!(id = finding.id, "finding for unknown clause id, dropping"),
        }
    }

    /// Build the report. Any slot a worker never filled (task failure)
    /// becomes a low-confidence placeholder so the report still covers
    /// every clause.
    pub fn finish(self) -> AnalysisReport {
        let fault_confidence = self.fault_confidence;
        let results: Vec<ClauseFinding> = self
            .slots
            .into_iter()
            .enumerate()
            .map(|(index, slot)| {
                slot.unwrap_or_else(|| {
                    warn!(id = index + 1, "clause finding missing, substituting placeholder");
                    ClauseFinding {
                        id: index + 1,
                        text: self.clause_texts[index].clone(),
                        risk_type: RiskType::Safe,
                        confidence: fault_confidence,
                        explanation: explain::fault_note(),
                    }
                })
            })
            .map(|mut finding| {
                finding.confidence = round_confidence(finding.confidence);
                finding
            })
            .collect();

        let risks_found = results.iter().filter(|r| r.risk_type.is_risky()).count();
        AnalysisReport {
            filename: self.filename,
            total_clauses_scanned: results.len(),
            risks_found,
            results,
        }
    }
}

/// The wire format carries 4 decimal places.
fn round_confidence(confidence: f64) -> f64 {
    (confidence * 10_000.0).round() / 10_000.0
}
