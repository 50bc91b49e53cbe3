use serde::{Deserialize, Serialize};

/// Risk categories assigned to clauses.
///
/// Declaration order doubles as the classifier's tie-break order, so new
/// categories go at the end (before `Safe`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RiskType {
    #[serde(rename = "Non-Compete")]
    NonCompete,
    Termination,
    Indemnification,
    Confidentiality,
    #[serde(rename = "Liability Cap")]
    LiabilityCap,
    Safe,
}

impl RiskType {
    /// Wire/display name, as rendered by the dashboard.
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskType::NonCompete => "Non-Compete",
            RiskType::Termination => "Termination",
            RiskType::Indemnification => "Indemnification",
            RiskType::Confidentiality => "Confidentiality",
            RiskType::LiabilityCap => "Liability Cap",
            RiskType::Safe => "Safe",
        }
    }

    pub fn is_risky(&self) -> bool {
        !matches!(self, RiskType::Safe)
    }
}

impl std::fmt::Display for RiskType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Byte span into the normalized document text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextSpan {
    pub start: usize,
    pub end: usize,
}

/// One segmented clause. `sequence_id` is 1-based and stable for the
/// lifetime of a single analysis request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clause {
    pub sequence_id: usize,
    pub text: String,
    pub span: TextSpan,
}

/// Classifier + explanation output for one clause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RiskAssessment {
    /// Back-reference to `Clause::sequence_id`.
    pub clause_id: usize,
    pub risk_type: RiskType,
    /// Always within [0, 1].
    pub confidence: f64,
    /// Markdown rationale + remediation.
    pub explanation: String,
}

/// Severity band used when phrasing the risk statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Severity {
    High,
    Medium,
    Low,
}

/// One row of the `/analyze_document` response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClauseFinding {
    pub id: usize,
    pub text: String,
    pub risk_type: RiskType,
    pub confidence: f64,
    pub explanation: String,
}

/// Aggregate report for one document. Exists only for the duration of one
/// request/response cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub filename: String,
    pub total_clauses_scanned: usize,
    pub risks_found: usize,
    pub results: Vec<ClauseFinding>,
}
