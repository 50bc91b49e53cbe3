//! Contract risk-analysis engine
//!
//! Takes an uploaded contract (PDF or plain text) plus an optional
//! free-text custom rule and produces an ordered per-clause risk report:
//!
//! - Ingestor: text extraction and cleanup
//! - Segmenter: lazy clause segmentation
//! - Rule compiler: free text to matching predicates, compiled once
//! - Classifier: built-in taxonomy plus the custom rule, per clause
//! - Explanation generator: markdown rationale per clause
//! - Assembler: order-preserving fan-in with summary counts
//!
//! Clause-level work fans out over a bounded worker pool and is collected
//! back in `sequence_id` order; one faulting clause never fails the
//! document.

pub mod classify;
pub mod config;
pub mod error;
pub mod explain;
pub mod extractors;
pub mod ingest;
pub mod report;
pub mod rules;
pub mod segmenter;
pub mod taxonomy;

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{info, warn};
use uuid::Uuid;

use shared_types::{AnalysisReport, Clause, ClauseFinding, RiskType};

use classify::ClauseClassifier;
use explain::ExplanationGenerator;
use ingest::DocumentIngestor;
use report::ReportAssembler;
use rules::{CustomRule, RuleCompiler};
use segmenter::ClauseSegmenter;

pub use config::{ConfidenceTable, EngineConfig};
pub use error::EngineError;

/// The analysis engine. Cheap to clone behind an `Arc`; holds no
/// per-request state, so one instance serves concurrent requests.
pub struct RiskEngine {
    config: EngineConfig,
    ingestor: DocumentIngestor,
    segmenter: ClauseSegmenter,
    classifier: Arc<ClauseClassifier>,
    explainer: Arc<ExplanationGenerator>,
}

impl RiskEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            ingestor: DocumentIngestor::new(&config),
            segmenter: ClauseSegmenter::new(&config),
            classifier: Arc::new(ClauseClassifier::new(&config)),
            explainer: Arc::new(ExplanationGenerator::new(&config.confidence)),
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Analyze one uploaded document under an optional custom rule.
    ///
    /// Ingestion and segmentation run first; clause-level classification
    /// and explanation then fan out over the worker pool, bounded by the
    /// configured timeout.
    pub async fn analyze(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: &[u8],
        user_rule: Option<&str>,
    ) -> Result<AnalysisReport, EngineError> {
        let request_id = Uuid::new_v4();
        info!(%request_id, filename, size = bytes.len(), "analyzing document");

        let document = self.ingestor.extract(filename, content_type, bytes)?;
        let clauses: Vec<Clause> = self.segmenter.segment(&document.text).collect();
        let rule = Arc::new(RuleCompiler::compile(user_rule));
        info!(
            %request_id,
            clauses = clauses.len(),
            custom_rule = !rule.is_noop(),
            "document segmented"
        );

        let timeout_ms = self.config.classification_timeout_ms;
        let phase = self.classify_all(&document.filename, clauses, rule);
        match tokio::time::timeout(Duration::from_millis(timeout_ms), phase).await {
            Ok(report) => {
                info!(
                    %request_id,
                    risks = report.risks_found,
                    scanned = report.total_clauses_scanned,
                    "analysis complete"
                );
                Ok(report)
            }
            Err(_) => Err(EngineError::ClassificationTimeout(timeout_ms)),
        }
    }

    /// Synchronous path over already-extracted text. Shares the exact
    /// per-clause semantics with `analyze`; used by tests and callers that
    /// have no file to ingest.
    pub fn analyze_text(
        &self,
        filename: &str,
        text: &str,
        user_rule: Option<&str>,
    ) -> AnalysisReport {
        let normalized = ingest::normalize_text(text);
        let clauses: Vec<Clause> = self.segmenter.segment(&normalized).collect();
        let rule = RuleCompiler::compile(user_rule);
        let mut assembler = ReportAssembler::new(
            filename,
            &clauses,
            self.config.confidence.fault_placeholder,
        );
        for clause in &clauses {
            assembler.insert(assess_clause(
                &self.classifier,
                &self.explainer,
                &rule,
                clause,
            ));
        }
        assembler.finish()
    }

    /// Per-clause fan-out/fan-in. Results land in an index-addressed
    /// buffer, so completion order never affects report order.
    async fn classify_all(
        &self,
        filename: &str,
        clauses: Vec<Clause>,
        rule: Arc<CustomRule>,
    ) -> AnalysisReport {
        let fault_confidence = self.config.confidence.fault_placeholder;
        let mut assembler = ReportAssembler::new(filename, &clauses, fault_confidence);

        // JoinSet over plain spawns: dropping it (request abort, timeout)
        // cancels outstanding clause tasks at the next clause boundary.
        let semaphore = Arc::new(Semaphore::new(self.config.workers()));
        let mut tasks = tokio::task::JoinSet::new();
        for clause in clauses {
            let classifier = Arc::clone(&self.classifier);
            let explainer = Arc::clone(&self.explainer);
            let rule = Arc::clone(&rule);
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let _permit = semaphore.acquire_owned().await.ok();
                let clause_id = clause.sequence_id;
                let clause_text = clause.text.clone();
                let outcome = tokio::task::spawn_blocking(move || {
                    // One panicking matcher must not take the document
                    // down; the clause gets a placeholder instead.
                    catch_unwind(AssertUnwindSafe(|| {
                        assess_clause(&classifier, &explainer, &rule, &clause)
                    }))
                })
                .await;

                match outcome {
                    Ok(Ok(finding)) => finding,
                    _ => {
                        warn!(clause = clause_id, "clause classification faulted");
                        fault_finding(clause_id, clause_text, fault_confidence)
                    }
                }
            });
        }

        // Findings arrive in completion order; the indexed buffer puts the
        // report back in sequence order.
        while let Some(result) = tasks.join_next().await {
            match result {
                Ok(finding) => assembler.insert(finding),
                // The assembler substitutes a placeholder for the slot.
                Err(e) => warn!("clause task failed to join: {}", e),
            }
        }
        assembler.finish()
    }
}

impl Default for RiskEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

/// Classify and explain one clause. Pure and deterministic.
fn assess_clause(
    classifier: &ClauseClassifier,
    explainer: &ExplanationGenerator,
    rule: &CustomRule,
    clause: &Clause,
) -> ClauseFinding {
    let classified = classifier.classify(&clause.text, rule);
    let explanation = explainer.render(&classified);
    ClauseFinding {
        id: clause.sequence_id,
        text: clause.text.clone(),
        risk_type: classified.risk_type,
        confidence: classified.confidence,
        explanation,
    }
}

fn fault_finding(id: usize, text: String, confidence: f64) -> ClauseFinding {
    ClauseFinding {
        id,
        text,
        risk_type: RiskType::Safe,
        confidence,
        explanation: explain::fault_note(),
    }
}
