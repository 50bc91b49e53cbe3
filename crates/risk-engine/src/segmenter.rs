//! Clause segmentation
//!
//! Splits normalized document text into an ordered sequence of clauses.
//! Boundary cues, strongest first:
//! - numbering/lettering patterns ("1.", "Section 2", "(a)", ALL-CAPS headings)
//! - blank-line paragraph breaks
//! - sentence boundaries, once a structureless run exceeds the configured
//!   line window
//!
//! When a numbering pattern and a paragraph break coincide at the same
//! offset, the numbering pattern is the boundary. Candidates shorter than
//! the minimum clause length merge into the following clause; a short
//! trailing fragment merges into the previous one. The iterator is lazy and
//! restartable: calling `segment` again over identical text reproduces the
//! same sequence.

use std::collections::VecDeque;

use once_cell::sync::Lazy;
use regex::Regex;
use shared_types::{Clause, TextSpan};

use crate::config::EngineConfig;

/// "1.", "2)", "3.1", "10.2.4 " at the start of a line.
static NUMBERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{0,3}\d+(?:\.\d+)*[.)]?\s+\S").unwrap());

/// "Section 2", "ARTICLE IV:", "Clause 7".
static SECTION_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s{0,3}(?:section|article|clause)\s+[0-9IVXLC]+").unwrap());

/// "(a) ", "(iv) ", "(1) " lettering.
static LETTERED_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s{0,3}\([a-zA-Z0-9]{1,4}\)\s+\S").unwrap());

/// Standalone ALL-CAPS heading line.
static CAPS_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Z0-9 .,&'-]{3,}$").unwrap());

/// Sentence terminator, used by the fallback splitter.
static SENTENCE_END: Lazy<Regex> = Lazy::new(|| Regex::new(r#"[.!?]["')\u{201D}]*\s+"#).unwrap());

fn is_structural_boundary(line: &str) -> bool {
    NUMBERED_LINE.is_match(line)
        || SECTION_LINE.is_match(line)
        || LETTERED_LINE.is_match(line)
        || CAPS_HEADING.is_match(line.trim())
}

/// Collapse internal whitespace the way the report presents clause text.
fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Configured clause segmenter. Cheap to construct, reusable across
/// documents.
#[derive(Debug, Clone)]
pub struct ClauseSegmenter {
    min_clause_chars: usize,
    unstructured_line_window: usize,
}

impl ClauseSegmenter {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            min_clause_chars: config.min_clause_chars,
            unstructured_line_window: config.unstructured_line_window,
        }
    }

    /// Lazily segment `text` into clauses. Restartable: each call returns a
    /// fresh iterator over the same deterministic sequence.
    pub fn segment<'a>(&self, text: &'a str) -> ClauseIter<'a> {
        ClauseIter::new(text, self.min_clause_chars, self.unstructured_line_window)
    }
}

/// Byte range of one line within the source text.
#[derive(Debug, Clone, Copy)]
struct Line {
    start: usize,
    end: usize,
}

/// A clause formed but not yet numbered; the id is stamped at emission.
#[derive(Debug)]
struct PendingClause {
    text: String,
    span: TextSpan,
}

/// Lazy iterator over segmented clauses.
pub struct ClauseIter<'a> {
    text: &'a str,
    lines: Vec<Line>,
    cursor: usize,
    /// Sub-spans queued by the sentence-boundary fallback.
    queued: VecDeque<(usize, usize)>,
    /// Short candidate awaiting a forward merge: span plus text so far.
    carry: Option<(TextSpan, String)>,
    /// One-clause lookahead so a short trailing fragment can merge backward.
    held: Option<PendingClause>,
    next_id: usize,
    exhausted: bool,
    min_clause_chars: usize,
    window: usize,
}

impl<'a> ClauseIter<'a> {
    fn new(text: &'a str, min_clause_chars: usize, window: usize) -> Self {
        let mut lines = Vec::new();
        let mut offset = 0;
        for line in text.split('\n') {
            lines.push(Line {
                start: offset,
                end: offset + line.len(),
            });
            offset += line.len() + 1;
        }
        Self {
            text,
            lines,
            cursor: 0,
            queued: VecDeque::new(),
            carry: None,
            held: None,
            next_id: 1,
            exhausted: false,
            min_clause_chars,
            window,
        }
    }

    fn line_text(&self, line: Line) -> &'a str {
        &self.text[line.start..line.end]
    }

    /// Consume lines up to the next structural boundary or blank line.
    /// Returns the block's byte span and its line count.
    fn next_block(&mut self) -> Option<(usize, usize, usize)> {
        // Skip blank lines between blocks.
        while self.cursor < self.lines.len() {
            if self.line_text(self.lines[self.cursor]).trim().is_empty() {
                self.cursor += 1;
            } else {
                break;
            }
        }
        if self.cursor >= self.lines.len() {
            return None;
        }

        let first = self.lines[self.cursor];
        let mut last = first;
        let mut count = 1;
        self.cursor += 1;

        while self.cursor < self.lines.len() {
            let line = self.lines[self.cursor];
            let content = self.line_text(line);
            if content.trim().is_empty() {
                break; // paragraph break
            }
            if is_structural_boundary(content) {
                break; // numbering pattern wins, new block starts here
            }
            last = line;
            count += 1;
            self.cursor += 1;
        }

        Some((first.start, last.end, count))
    }

    /// Split an oversized unstructured block at sentence boundaries,
    /// grouping sentences until each piece reaches the minimum length.
    fn split_sentences(&self, start: usize, end: usize) -> VecDeque<(usize, usize)> {
        let block = &self.text[start..end];
        let mut pieces = VecDeque::new();
        let mut piece_start = 0;

        for m in SENTENCE_END.find_iter(block) {
            let boundary = m.end();
            let next_is_sentence_start = block[boundary..]
                .chars()
                .next()
                .is_some_and(|c| c.is_uppercase() || c == '(' || c == '"');
            if !next_is_sentence_start {
                continue;
            }
            if block[piece_start..m.start()].trim().len() >= self.min_clause_chars {
                pieces.push_back((start + piece_start, start + boundary));
                piece_start = boundary;
            }
        }
        if block[piece_start..].trim().is_empty() {
            if pieces.is_empty() {
                pieces.push_back((start, end));
            }
        } else {
            pieces.push_back((start + piece_start, end));
        }
        pieces
    }

    /// Next boundary candidate span, before minimum-length merging.
    fn next_candidate(&mut self) -> Option<(usize, usize)> {
        if let Some(span) = self.queued.pop_front() {
            return Some(span);
        }
        let (start, end, line_count) = self.next_block()?;
        if line_count > self.window {
            self.queued = self.split_sentences(start, end);
            return self.queued.pop_front();
        }
        Some((start, end))
    }

    /// Form the next full-length clause, applying forward merges.
    /// Returns `Err(leftover)` at end of input; the leftover is a short
    /// fragment still carried, if any.
    fn form_clause(&mut self) -> Result<PendingClause, Option<PendingClause>> {
        loop {
            let Some((start, end)) = self.next_candidate() else {
                let leftover = self
                    .carry
                    .take()
                    .map(|(span, text)| PendingClause { span, text });
                return Err(leftover);
            };

            let piece = collapse_whitespace(&self.text[start..end]);
            let (span_start, text) = match self.carry.take() {
                Some((carry_span, mut carried)) => {
                    if !carried.is_empty() && !piece.is_empty() {
                        carried.push(' ');
                    }
                    carried.push_str(&piece);
                    (carry_span.start, carried)
                }
                None => (start, piece),
            };
            let span = TextSpan {
                start: span_start,
                end,
            };

            if text.chars().count() < self.min_clause_chars {
                self.carry = Some((span, text));
                continue;
            }

            return Ok(PendingClause { text, span });
        }
    }

    fn stamp(&mut self, pending: PendingClause) -> Clause {
        let id = self.next_id;
        self.next_id += 1;
        Clause {
            sequence_id: id,
            text: pending.text,
            span: pending.span,
        }
    }
}

impl<'a> Iterator for ClauseIter<'a> {
    type Item = Clause;

    fn next(&mut self) -> Option<Clause> {
        if self.exhausted {
            return None;
        }
        loop {
            match self.form_clause() {
                Ok(clause) => {
                    if let Some(previous) = self.held.replace(clause) {
                        return Some(self.stamp(previous));
                    }
                    // Keep one clause in hand so a trailing fragment can
                    // merge backward; loop to form the next.
                }
                Err(leftover) => {
                    self.exhausted = true;
                    match (self.held.take(), leftover) {
                        (Some(mut held), Some(fragment)) if !fragment.text.is_empty() => {
                            held.text.push(' ');
                            held.text.push_str(&fragment.text);
                            held.span.end = fragment.span.end;
                            return Some(self.stamp(held));
                        }
                        (Some(held), _) => return Some(self.stamp(held)),
                        (None, Some(fragment)) if !fragment.text.is_empty() => {
                            // The whole document is shorter than the
                            // minimum; it is still one clause.
                            return Some(self.stamp(fragment));
                        }
                        (None, _) => return None,
                    }
                }
            }
        }
    }
}
