//! Isolate the JSON payload inside a free-text model reply.
//!
//! The endpoint is asked for bare JSON but routinely wraps it in a fenced
//! code block or surrounds it with commentary. Matching is a heuristic in
//! order of preference:
//!
//! 1. the interior of a fenced block tagged `json` (any case);
//! 2. the interior of an untagged fenced block;
//! 3. the span from the first `{` to the last `}` in the text.
//!
//! A fence only counts when its body is a `{ ... }` object, and every ```` ``` ````
//! is tried as an opening fence, so a stray fence marker in prose cannot
//! swallow the start of the real block.
//!
//! Braces are never balanced: a reply with several independent objects, or
//! stray braces in prose, can select the wrong span.

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;
use tracing::debug;

/// Errors from [`extract_json`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("no JSON object found in the model response")]
    NoJsonFound,
}

/// A fenced block anchored at its opening fence: language tag, body, closing fence.
static FENCE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\A```([A-Za-z]*)[ \t]*\r?\n?(.*?)```").expect("fence pattern is valid")
});

/// Return the JSON text embedded in `raw`, trimmed of surrounding whitespace.
pub fn extract_json(raw: &str) -> Result<&str, ExtractionError> {
    if let Some(body) = fenced_body(raw) {
        return Ok(body);
    }

    if let Some(span) = brace_span(raw) {
        debug!(len = span.len(), "extracted JSON from brace span");
        return Ok(span);
    }

    Err(ExtractionError::NoJsonFound)
}

/// First `json`-tagged fence holding an object, else the first such untagged fence.
fn fenced_body(raw: &str) -> Option<&str> {
    let mut untagged: Option<&str> = None;

    for (start, _) in raw.match_indices("```") {
        let Some(caps) = FENCE.captures(&raw[start..]) else {
            continue;
        };
        let tag = caps.get(1).map_or("", |m| m.as_str());
        let Some(body) = caps.get(2).map(|m| m.as_str().trim()) else {
            continue;
        };
        if !(body.starts_with('{') && body.ends_with('}')) {
            continue;
        }
        if tag.eq_ignore_ascii_case("json") {
            debug!(len = body.len(), "extracted JSON from tagged fence");
            return Some(body);
        }
        if tag.is_empty() && untagged.is_none() {
            untagged = Some(body);
        }
    }

    if let Some(body) = untagged {
        debug!(len = body.len(), "extracted JSON from untagged fence");
    }
    untagged
}

/// Greedy `{ ... }` span from the first opening to the last closing brace.
fn brace_span(raw: &str) -> Option<&str> {
    let start = raw.find('{')?;
    let end = raw.rfind('}')?;
    (end > start).then(|| &raw[start..=end])
}
