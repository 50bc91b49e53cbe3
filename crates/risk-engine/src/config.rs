//! Engine configuration
//!
//! Every heuristic constant the classifier and segmenter rely on lives
//! here, so deployments can tune them without touching matcher code.

/// Tunable configuration for one `RiskEngine` instance.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Upload size cap in bytes. The HTTP layer enforces the same limit on
    /// the request body; this is the engine-side backstop.
    pub max_file_bytes: usize,

    /// Segmenter: candidates shorter than this merge into the following
    /// clause (headers, page numbers, signature fragments).
    pub min_clause_chars: usize,

    /// Segmenter: a block with more consecutive lines than this and no
    /// structural markers falls back to sentence-boundary splitting.
    pub unstructured_line_window: usize,

    /// Ingestor: a PDF whose extraction yields fewer non-whitespace glyphs
    /// than this is treated as scanned-image-only and rejected.
    pub min_pdf_glyphs: usize,

    /// Bound on the whole clause-level phase (classification + explanation
    /// across all clauses).
    pub classification_timeout_ms: u64,

    /// Worker pool size for per-clause fan-out. 0 means "available cores".
    pub max_workers: usize,

    /// Confidence heuristics per risk type.
    pub confidence: ConfidenceTable,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_file_bytes: 10 * 1024 * 1024,
            min_clause_chars: 50,
            unstructured_line_window: 12,
            min_pdf_glyphs: 25,
            classification_timeout_ms: 30_000,
            max_workers: 0,
            confidence: ConfidenceTable::default(),
        }
    }
}

impl EngineConfig {
    /// Resolved worker pool size.
    pub fn workers(&self) -> usize {
        if self.max_workers == 0 {
            std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(4)
        } else {
            self.max_workers
        }
    }
}

/// Fixed confidence values assigned by the built-in matchers.
///
/// These are heuristic constants, not derived quantities. Defaults mirror
/// the bands the dashboard was calibrated against (0.98 / 0.85 / 0.60).
#[derive(Debug, Clone)]
pub struct ConfidenceTable {
    /// Non-compete with both a duration and a geographic radius.
    pub non_compete_full: f64,
    /// Non-compete with one of duration/geography.
    pub non_compete_scoped: f64,
    /// Bare restraint-of-trade language.
    pub non_compete_base: f64,

    /// Termination exercisable without cause and without notice.
    pub termination_unilateral: f64,
    pub termination_base: f64,

    /// Indemnity covering "any and all claims", one-way.
    pub indemnification_broad: f64,
    pub indemnification_base: f64,

    /// Confidentiality obligation with no time bound.
    pub confidentiality_perpetual: f64,
    pub confidentiality_base: f64,

    /// Liability cap paired with a consequential-damages waiver.
    pub liability_cap_waiver: f64,
    pub liability_cap_base: f64,

    /// Reported for clauses no matcher fired on.
    pub safe: f64,

    /// Reported for clauses whose classification faulted.
    pub fault_placeholder: f64,

    /// Adjustment applied when a clause violates / satisfies a custom-rule
    /// numeric predicate.
    pub rule_violation_bonus: f64,
    pub rule_satisfied_penalty: f64,

    /// Severity bands used when phrasing explanations.
    pub high_band: f64,
    pub medium_band: f64,
}

impl Default for ConfidenceTable {
    fn default() -> Self {
        Self {
            non_compete_full: 0.98,
            non_compete_scoped: 0.90,
            non_compete_base: 0.82,
            termination_unilateral: 0.85,
            termination_base: 0.70,
            indemnification_broad: 0.75,
            indemnification_base: 0.60,
            confidentiality_perpetual: 0.80,
            confidentiality_base: 0.72,
            liability_cap_waiver: 0.78,
            liability_cap_base: 0.68,
            safe: 0.90,
            fault_placeholder: 0.10,
            rule_violation_bonus: 0.05,
            rule_satisfied_penalty: 0.15,
            high_band: 0.90,
            medium_band: 0.70,
        }
    }
}
