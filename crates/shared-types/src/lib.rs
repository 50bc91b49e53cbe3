pub mod types;

pub use types::{
    AnalysisReport, Clause, ClauseFinding, RiskAssessment, RiskType, Severity, TextSpan,
};
