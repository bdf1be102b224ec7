/// Number of leading characters of a rejected response kept for diagnostics.
pub const PREVIEW_CHARS: usize = 500;

/// Errors returned by the finalize pass.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The finished response holds no code the finalize strategies recognise.
    #[error(
        "no valid code block found in response; the model may not have returned a React component"
    )]
    NoCodeFound {
        /// First [`PREVIEW_CHARS`] characters of the response.
        preview: String,
    },
}

impl ParseError {
    pub(crate) fn no_code_found(response: &str) -> Self {
        Self::NoCodeFound {
            preview: response.chars().take(PREVIEW_CHARS).collect(),
        }
    }

    /// Leading slice of the response that failed to parse.
    pub fn preview(&self) -> &str {
        match self {
            Self::NoCodeFound { preview } => preview,
        }
    }
}
