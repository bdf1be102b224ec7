//! Drives one streamed UI generation from prompt to stored screen code.
//!
//! A [`Generator`] opens a response stream from a [`ChunkSource`], runs every
//! chunk through `uigen_core`'s extraction and readiness checks to feed a
//! live preview, and finalizes the full response once the stream ends.
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use uigen_session::prelude::*;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() -> Result<(), SessionError> {
//! let generator = Generator::builder()
//!     .source(Arc::new(ScriptedSource::new(std::fs::read_to_string("response.md").unwrap())))
//!     .build()?;
//!
//! let mut stream = generator.generate(GenerationRequest::new("An orders table")).await?;
//! while let Some(event) = stream.next_event().await {
//!     if let GenerationEvent::PreviewUpdated { code, .. } = event {
//!         println!("preview: {} chars", code.len());
//!     }
//! }
//! let screen = stream.finish().await?;
//! println!("{}", screen.name);
//! # Ok(())
//! # }
//! ```

/// Generation behavior options.
pub mod config;
/// Public error types used by the session API.
pub mod errors;
/// Generator entry point, streaming handle and cancellation handle.
pub mod generator;
/// Common imports for typical usage.
pub mod prelude;
/// Chunk source contract and the scripted replay source.
pub mod source;
/// Normalized generation events.
pub mod stream;

pub use config::SessionConfig;
pub use errors::{GenerationFailure, SessionError, SourceError};
pub use generator::{AbortHandle, GenerationStream, Generator, GeneratorBuilder};
pub use source::{ChunkSource, ChunkStream, ScriptedSource, SourceRequest};
pub use stream::GenerationEvent;
