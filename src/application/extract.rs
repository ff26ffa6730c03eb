//! Turns a raw model reply into a free-text chain of trace plus a structured
//! payload. Models wrap their JSON in prose, use curly quotation glyphs, and
//! nest brackets, so the payload span is located with a depth scan and
//! normalized before parsing.

use crate::domain::entities::analysis::AnalysisReport;
use crate::domain::entities::decision::Decision;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Object,
    Array,
}

impl fmt::Display for PayloadKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadKind::Object => write!(f, "object"),
            PayloadKind::Array => write!(f, "array"),
        }
    }
}

/// Extraction failure. The chain of trace recovered before the failure is
/// always carried along so callers can still display the model's reasoning.
#[derive(Debug, Clone, Error)]
pub enum ExtractError {
    #[error("no matching close bracket for JSON {kind}")]
    Unbalanced { kind: PayloadKind, trace: String },

    #[error("JSON parse failed: {message}\npayload: {span}")]
    Parse {
        trace: String,
        message: String,
        span: String,
    },
}

impl ExtractError {
    pub fn trace(&self) -> &str {
        match self {
            ExtractError::Unbalanced { trace, .. } => trace,
            ExtractError::Parse { trace, .. } => trace,
        }
    }
}

/// Find the byte index of the close bracket matching the open bracket at
/// `start`. Returns `None` when `start` is out of range, does not sit on an
/// opening bracket, or the span never balances.
///
/// Depth counting only — bracket characters inside quoted string literals
/// are counted too. Matches the source behavior; a literal brace inside a
/// JSON string value will corrupt the scan.
pub fn find_matching_bracket(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let (open, close) = match bytes.get(start) {
        Some(b'{') => (b'{', b'}'),
        Some(b'[') => (b'[', b']'),
        _ => return None,
    };

    let mut depth = 0usize;
    for (i, &b) in bytes.iter().enumerate().skip(start) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(i);
            }
        }
    }
    None
}

/// Replace curly quotation glyphs with their ASCII equivalents so otherwise
/// well-formed JSON parses. Total and idempotent.
pub fn normalize_quotes(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '\u{201c}' | '\u{201d}' => '"',
            '\u{2018}' | '\u{2019}' => '\'',
            other => other,
        })
        .collect()
}

/// Object mode: split `raw` into (chain of trace, analysis report).
///
/// No `{` anywhere is a valid text-only outcome, not an error: the whole
/// reply is the trace and there is no report. An unbalanced `{` or a parse
/// failure is an error carrying the trace already recovered.
pub fn extract_analysis(raw: &str) -> Result<(String, Option<AnalysisReport>), ExtractError> {
    let Some(start) = raw.find('{') else {
        return Ok((raw.trim().to_string(), None));
    };
    let trace = raw[..start].trim().to_string();

    let end = find_matching_bracket(raw, start).ok_or_else(|| ExtractError::Unbalanced {
        kind: PayloadKind::Object,
        trace: trace.clone(),
    })?;

    let span = normalize_quotes(&raw[start..=end]);
    match serde_json::from_str::<AnalysisReport>(&span) {
        Ok(report) => Ok((trace, Some(report))),
        Err(e) => Err(ExtractError::Parse {
            trace,
            message: e.to_string(),
            span,
        }),
    }
}

/// Array mode: split `raw` into (chain of trace, decision list).
///
/// No `[` anywhere means "no trade this cycle" — the whole reply is the
/// trace and the list is empty. A `[` that never balances, or a span that
/// fails to parse, is an error; an explicitly empty `[]` is not.
pub fn extract_decisions(raw: &str) -> Result<(String, Vec<Decision>), ExtractError> {
    let Some(start) = raw.find('[') else {
        return Ok((raw.trim().to_string(), Vec::new()));
    };
    let trace = raw[..start].trim().to_string();

    let end = find_matching_bracket(raw, start).ok_or_else(|| ExtractError::Unbalanced {
        kind: PayloadKind::Array,
        trace: trace.clone(),
    })?;

    let span = normalize_quotes(&raw[start..=end]);
    match serde_json::from_str::<Vec<Decision>>(&span) {
        Ok(decisions) => Ok((trace, decisions)),
        Err(e) => Err(ExtractError::Parse {
            trace,
            message: e.to_string(),
            span,
        }),
    }
}
