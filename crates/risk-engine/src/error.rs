//! Error taxonomy for the analysis engine

use thiserror::Error;

/// Errors that can abort an analysis request.
///
/// A clause-level classifier fault is deliberately NOT a member of the
/// abort path: it is isolated per clause (see `RiskEngine::analyze`) and
/// surfaces as a low-confidence placeholder in the report instead.
#[derive(Error, Debug)]
pub enum EngineError {
    /// Media type is neither PDF nor plain text. User-correctable.
    #[error("Unsupported document format: {0}")]
    UnsupportedFormat(String),

    /// The document could not be decoded into usable text. User-correctable.
    #[error("Document could not be read: {0}")]
    CorruptDocument(String),

    /// Upload exceeds the configured size cap.
    #[error("Document too large: {actual} bytes (limit {limit})")]
    PayloadTooLarge { actual: usize, limit: usize },

    /// The clause-level phase exceeded its bound. Retryable by the caller.
    #[error("Classification timed out after {0}ms")]
    ClassificationTimeout(u64),

    /// Unexpected failure outside the per-clause isolation boundary.
    #[error("Internal classifier fault: {0}")]
    InternalClassifierFault(String),
}

impl EngineError {
    /// Stable machine-readable kind, surfaced to operators alongside the
    /// human message.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::UnsupportedFormat(_) => "UNSUPPORTED_FORMAT",
            EngineError::CorruptDocument(_) => "CORRUPT_DOCUMENT",
            EngineError::PayloadTooLarge { .. } => "PAYLOAD_TOO_LARGE",
            EngineError::ClassificationTimeout(_) => "CLASSIFICATION_TIMEOUT",
            EngineError::InternalClassifierFault(_) => "INTERNAL_CLASSIFIER_FAULT",
        }
    }
}
