/// Errors returned by a chunk source before they are normalized for the
/// public generation stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceError {
    /// The upstream model or proxy rejected the request (status, auth, etc.).
    #[error("source error ({source_id}): {message}")]
    Upstream {
        source_id: String,
        message: String,
        status_code: Option<u16>,
    },
    /// Reading the chunk stream failed.
    #[error("transport error ({source_id}): {message}")]
    Transport { source_id: String, message: String },
}

impl SourceError {
    pub fn upstream(
        source_id: impl Into<String>,
        message: impl Into<String>,
        status_code: Option<u16>,
    ) -> Self {
        Self::Upstream {
            source_id: source_id.into(),
            message: message.into(),
            status_code,
        }
    }

    pub fn transport(source_id: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Transport {
            source_id: source_id.into(),
            message: message.into(),
        }
    }

    pub fn source_id(&self) -> &str {
        match self {
            Self::Upstream { source_id, .. } | Self::Transport { source_id, .. } => source_id,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            Self::Upstream { message, .. } | Self::Transport { message, .. } => message,
        }
    }
}

/// Terminal generation failure sent through `GenerationEvent::Failed`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, serde::Serialize, serde::Deserialize)]
pub enum GenerationFailure {
    /// The upstream source refused or aborted the generation.
    #[error("source failure ({source_id}): {message}")]
    Upstream { source_id: String, message: String },
    /// The chunk stream broke mid-generation.
    #[error("transport failure ({source_id}): {message}")]
    Transport { source_id: String, message: String },
    /// The finished response held no recognisable component code.
    #[error("no code found in response")]
    NoCode {
        /// Leading slice of the response, for diagnostics.
        preview: String,
    },
    /// The configured generation timeout elapsed.
    #[error("generation timed out")]
    TimedOut,
    /// The generation was cancelled by the caller.
    #[error("generation cancelled")]
    Cancelled,
    /// The session detected an internal sequencing error.
    #[error("protocol failure: {message}")]
    Protocol { message: String },
}

impl From<&SourceError> for GenerationFailure {
    fn from(err: &SourceError) -> Self {
        match err {
            SourceError::Upstream {
                source_id, message, ..
            } => Self::Upstream {
                source_id: source_id.clone(),
                message: message.clone(),
            },
            SourceError::Transport { source_id, message } => Self::Transport {
                source_id: source_id.clone(),
                message: message.clone(),
            },
        }
    }
}

impl From<&uigen_core::ParseError> for GenerationFailure {
    fn from(err: &uigen_core::ParseError) -> Self {
        Self::NoCode {
            preview: err.preview().to_string(),
        }
    }
}

/// Top-level error type for the public session API.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// Invalid generator configuration.
    #[error("config error: {0}")]
    Config(String),
    /// Invalid generation request.
    #[error("validation error: {0}")]
    Validation(String),
    /// Terminal failure of a started generation.
    #[error(transparent)]
    GenerationFailed(GenerationFailure),
    /// Internal protocol misuse or invariant violation.
    #[error("protocol error: {0}")]
    Protocol(String),
}

impl SessionError {
    pub(crate) fn protocol_msg(message: impl Into<String>) -> Self {
        Self::Protocol(message.into())
    }
}

impl From<GenerationFailure> for SessionError {
    fn from(value: GenerationFailure) -> Self {
        SessionError::GenerationFailed(value)
    }
}
