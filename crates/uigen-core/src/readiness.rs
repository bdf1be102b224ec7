//! Render-readiness heuristic for partially streamed component code.
//!
//! This is a syntactic proxy, not a parser. It is tuned to reject whenever in
//! doubt: handing truncated code to the sandbox crashes the preview, while a
//! false rejection only delays it by a chunk.

use crate::markers::{DEFAULT_EXPORT, has_jsx_return};

/// Candidates shorter than this carry too little signal to judge.
const MIN_READY_CHARS: usize = 100;

/// Reason a candidate was held back from the renderer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotReady {
    TooShort,
    MissingDefaultExport,
    MissingJsxReturn,
    UnbalancedBraces,
    UnbalancedParens,
    /// Last non-whitespace character is not `}`, `;` or `)`.
    OpenTail,
}

impl std::fmt::Display for NotReady {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let reason = match self {
            Self::TooShort => "too short",
            Self::MissingDefaultExport => "no default export yet",
            Self::MissingJsxReturn => "no JSX return yet",
            Self::UnbalancedBraces => "unbalanced braces",
            Self::UnbalancedParens => "unbalanced parentheses",
            Self::OpenTail => "ends mid-statement",
        };
        f.write_str(reason)
    }
}

/// Delimiter tallies for a code string.
///
/// Counting is naive: delimiters inside string literals, template literals
/// and comments are counted like any other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Balance {
    pub open_braces: usize,
    pub close_braces: usize,
    pub open_parens: usize,
    pub close_parens: usize,
}

impl Balance {
    pub fn of(code: &str) -> Self {
        let mut balance = Self::default();
        for ch in code.chars() {
            match ch {
                '{' => balance.open_braces += 1,
                '}' => balance.close_braces += 1,
                '(' => balance.open_parens += 1,
                ')' => balance.close_parens += 1,
                _ => {}
            }
        }
        balance
    }

    pub fn braces_balanced(&self) -> bool {
        self.open_braces == self.close_braces
    }

    pub fn parens_balanced(&self) -> bool {
        self.open_parens == self.close_parens
    }
}

/// Returns `true` when `code` looks complete enough to hand to the renderer.
pub fn is_render_ready(code: &str) -> bool {
    check_render_ready(code).is_ok()
}

/// Same decision as [`is_render_ready`], reporting the first failed check.
pub fn check_render_ready(code: &str) -> Result<(), NotReady> {
    if code.chars().count() < MIN_READY_CHARS {
        return Err(NotReady::TooShort);
    }
    if !code.contains(DEFAULT_EXPORT) {
        return Err(NotReady::MissingDefaultExport);
    }
    if !has_jsx_return(code) {
        return Err(NotReady::MissingJsxReturn);
    }

    let balance = Balance::of(code);
    if !balance.braces_balanced() {
        return Err(NotReady::UnbalancedBraces);
    }
    if !balance.parens_balanced() {
        return Err(NotReady::UnbalancedParens);
    }

    match code.trim_end().chars().last() {
        Some('}' | ';' | ')') => Ok(()),
        _ => Err(NotReady::OpenTail),
    }
}
