//! Best-effort code extraction from a response that is still streaming.
//!
//! Called on every chunk with the full text received so far. A miss is not
//! an error: callers keep their previous preview and try again on the next
//! chunk.

use crate::markers::{CLIENT_DIRECTIVE, FENCE, FENCE_TAGS, IMPORT_KEYWORD, opening_fence};

/// An unterminated fenced block must hold more than this many characters
/// before it is offered as a candidate.
const MIN_PARTIAL_CHARS: usize = 50;

/// Unfenced code must span more than this many lines.
const MIN_RAW_LINES: usize = 3;

/// Returns the current best guess at the code payload in `text`, or `None`
/// when nothing usable has arrived yet.
///
/// Fenced blocks are preferred. A block whose closing fence has arrived is
/// returned whole; an open block is returned once it is long enough to be
/// worth previewing. Without a usable fence, raw code starting at a client
/// directive or import line is collected instead.
pub fn extract_partial(text: &str) -> Option<String> {
    extract_fenced(text).or_else(|| extract_raw(text))
}

fn extract_fenced(text: &str) -> Option<String> {
    for tag in FENCE_TAGS {
        let marker = opening_fence(tag);
        let Some(start) = text.find(&marker) else {
            continue;
        };
        let body = &text[start + marker.len()..];

        if let Some(end) = body.find(FENCE) {
            let code = body[..end].trim();
            return (!code.is_empty()).then(|| code.to_string());
        }

        let partial = body.trim();
        if partial.chars().count() > MIN_PARTIAL_CHARS {
            return Some(partial.to_string());
        }
    }
    None
}

fn extract_raw(text: &str) -> Option<String> {
    if !text.contains(CLIENT_DIRECTIVE) && !text.contains(IMPORT_KEYWORD) {
        return None;
    }

    let lines: Vec<&str> = text
        .split('\n')
        .skip_while(|line| !line.contains(CLIENT_DIRECTIVE) && !line.contains(IMPORT_KEYWORD))
        .filter(|line| !line.starts_with(FENCE))
        .collect();

    (lines.len() > MIN_RAW_LINES).then(|| lines.join("\n"))
}
