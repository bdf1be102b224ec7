//! Common imports for typical session usage.
pub use crate::{
    AbortHandle, ChunkSource, GenerationEvent, GenerationFailure, GenerationStream, Generator,
    ScriptedSource, SessionConfig, SessionError,
};
pub use uigen_core::{FinalCode, GenerationRequest};
