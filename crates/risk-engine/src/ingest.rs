//! Document ingestion
//!
//! Turns an uploaded file into normalized text ready for segmentation:
//! - Media-type gate (PDF and plain text only)
//! - PDF text extraction with scanned/encrypted/malformed detection
//! - Whitespace and hyphenation cleanup

use pdf_extract::extract_text_from_mem;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::EngineError;

/// Accepted upload formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediaType {
    Pdf,
    PlainText,
}

impl MediaType {
    /// Resolve the media type from the declared content type and filename.
    ///
    /// The declared type wins when it is specific; generic types
    /// (`application/octet-stream`) fall back to the file extension, and a
    /// `%PDF-` magic prefix is honored either way.
    pub fn detect(
        content_type: Option<&str>,
        filename: &str,
        bytes: &[u8],
    ) -> Result<Self, EngineError> {
        if bytes.starts_with(b"%PDF-") {
            return Ok(MediaType::Pdf);
        }

        if let Some(declared) = content_type {
            let declared = declared
                .split(';')
                .next()
                .unwrap_or(declared)
                .trim()
                .to_ascii_lowercase();
            match declared.as_str() {
                "application/pdf" | "application/x-pdf" => return Ok(MediaType::Pdf),
                "application/octet-stream" | "" => {} // fall through to extension
                t if t.starts_with("text/") => return Ok(MediaType::PlainText),
                other => return Err(EngineError::UnsupportedFormat(other.to_string())),
            }
        }

        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase())
            .unwrap_or_default();
        match extension.as_str() {
            "pdf" => Ok(MediaType::Pdf),
            "txt" | "text" | "md" => Ok(MediaType::PlainText),
            "" => Err(EngineError::UnsupportedFormat(
                "no content type and no file extension".to_string(),
            )),
            other => Err(EngineError::UnsupportedFormat(format!(".{}", other))),
        }
    }
}

/// An uploaded document after extraction and cleanup. Immutable for the
/// rest of the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestedDocument {
    pub filename: String,
    pub text: String,
    /// Page count when the PDF structure was readable.
    pub page_count: Option<usize>,
    pub received_at: i64,
}

/// Extracts and normalizes uploaded documents.
pub struct DocumentIngestor {
    max_file_bytes: usize,
    min_pdf_glyphs: usize,
}

impl DocumentIngestor {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            max_file_bytes: config.max_file_bytes,
            min_pdf_glyphs: config.min_pdf_glyphs,
        }
    }

    /// Extract normalized text from an upload.
    ///
    /// # Errors
    /// - `UnsupportedFormat` if the media type is neither PDF nor plain text
    /// - `PayloadTooLarge` if the upload exceeds the configured cap
    /// - `CorruptDocument` if a PDF yields no usable text (scanned-only,
    ///   encrypted, or malformed)
    pub fn extract(
        &self,
        filename: &str,
        content_type: Option<&str>,
        bytes: &[u8],
    ) -> Result<IngestedDocument, EngineError> {
        if bytes.len() > self.max_file_bytes {
            return Err(EngineError::PayloadTooLarge {
                actual: bytes.len(),
                limit: self.max_file_bytes,
            });
        }

        let media_type = MediaType::detect(content_type, filename, bytes)?;
        let (raw_text, page_count) = match media_type {
            MediaType::Pdf => self.extract_pdf(bytes)?,
            MediaType::PlainText => (String::from_utf8_lossy(bytes).into_owned(), None),
        };

        let text = normalize_text(&raw_text);
        debug!(
            filename,
            chars = text.len(),
            ?page_count,
            "document ingested"
        );

        Ok(IngestedDocument {
            filename: filename.to_string(),
            text,
            page_count,
            received_at: chrono::Utc::now().timestamp(),
        })
    }

    fn extract_pdf(&self, bytes: &[u8]) -> Result<(String, Option<usize>), EngineError> {
        let raw_text = match extract_text_from_mem(bytes) {
            Ok(text) => text,
            Err(e) => {
                let msg = e.to_string();
                let lowered = msg.to_lowercase();
                if lowered.contains("encrypted") || lowered.contains("password") {
                    return Err(EngineError::CorruptDocument(
                        "password-protected PDF".to_string(),
                    ));
                }
                return Err(EngineError::CorruptDocument(format!(
                    "PDF extraction failed: {}",
                    msg
                )));
            }
        };

        // Scanned-image-only PDFs extract to (almost) nothing.
        let glyphs = raw_text.chars().filter(|c| !c.is_whitespace()).count();
        if glyphs < self.min_pdf_glyphs {
            return Err(EngineError::CorruptDocument(
                "no extractable text (scanned image-only PDF?)".to_string(),
            ));
        }

        // Page count is informational only; a broken xref shouldn't fail an
        // upload that pdf-extract already handled.
        let page_count = match lopdf::Document::load_mem(bytes) {
            Ok(doc) => Some(doc.get_pages().len()),
            Err(e) => {
                warn!("could not read PDF page structure: {}", e);
                None
            }
        };

        Ok((raw_text, page_count))
    }
}

/// Light cleanup applied to extracted text before segmentation.
///
/// Keeps blank-line structure intact (the segmenter relies on it) while
/// normalizing line endings, rejoining hyphenated line breaks, and
/// collapsing runs of spaces and tabs within lines.
pub fn normalize_text(raw: &str) -> String {
    let unified = raw.replace("\r\n", "\n").replace('\r', "\n");

    // Rejoin words hyphenated across a line break: "termi-\nnation".
    let mut dehyphenated = String::with_capacity(unified.len());
    let mut chars = unified.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '-' && chars.peek() == Some(&'\n') {
            let mut lookahead = chars.clone();
            lookahead.next(); // the newline
            if lookahead.peek().is_some_and(|n| n.is_lowercase()) {
                chars.next(); // swallow the newline with the hyphen
                continue;
            }
        }
        dehyphenated.push(c);
    }

    let mut lines: Vec<String> = dehyphenated
        .lines()
        .map(|line| {
            let mut collapsed = String::with_capacity(line.len());
            let mut in_gap = false;
            for c in line.chars() {
                if c == ' ' || c == '\t' {
                    if !in_gap {
                        collapsed.push(' ');
                    }
                    in_gap = true;
                } else {
                    collapsed.push(c);
                    in_gap = false;
                }
            }
            collapsed.trim_end().to_string()
        })
        .collect();

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}
