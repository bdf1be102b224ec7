use uigen_core::FinalCode;

use crate::errors::GenerationFailure;

/// Normalized events exposed by `GenerationStream`.
#[derive(Clone, Debug, PartialEq)]
pub enum GenerationEvent {
    /// First event for every generation.
    Started {
        generation_id: uuid::Uuid,
        source_id: String,
        /// Screen name to show until the final name is known.
        provisional_name: String,
        edit: bool,
    },
    /// A chunk arrived.
    Progress {
        generation_id: uuid::Uuid,
        seq: u64,
        received_chars: usize,
        /// Head of the raw response, truncated with `...`.
        preview: String,
    },
    /// New render-ready code for the live preview.
    ///
    /// Only sent when the candidate changed since the last update.
    PreviewUpdated {
        generation_id: uuid::Uuid,
        seq: u64,
        code: String,
    },
    /// Terminal success event with the finalized screen code.
    Completed {
        generation_id: uuid::Uuid,
        result: FinalCode,
    },
    /// Terminal failure event.
    Failed {
        generation_id: uuid::Uuid,
        error: GenerationFailure,
    },
}

impl GenerationEvent {
    pub fn generation_id(&self) -> uuid::Uuid {
        match self {
            Self::Started { generation_id, .. }
            | Self::Progress { generation_id, .. }
            | Self::PreviewUpdated { generation_id, .. }
            | Self::Completed { generation_id, .. }
            | Self::Failed { generation_id, .. } => *generation_id,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed { .. } | Self::Failed { .. })
    }
}
