//! Heuristic extraction of React component code from streamed LLM responses.
//!
//! Three passes make up the pipeline. During a stream, [`extract_partial`]
//! pulls the best-guess code out of the text received so far and
//! [`is_render_ready`] decides whether that guess can be handed to the live
//! preview. Once the stream ends, [`finalize`] resolves the definitive code
//! and component name.
//!
//! ```
//! use uigen_core::{extract_partial, finalize, is_render_ready};
//!
//! let mut received = String::new();
//! for chunk in ["Here it is:\n```tsx\n", "export default function Hi() {\n", "  return <p>hi</p>;\n}\n```"] {
//!     received.push_str(chunk);
//!     if let Some(code) = extract_partial(&received) {
//!         let _ready = is_render_ready(&code);
//!     }
//! }
//!
//! let result = finalize(&received).unwrap();
//! assert_eq!(result.name, "Hi");
//! ```

/// Render-error classification for sandbox feedback.
pub mod diagnose;
/// Finalize-pass errors.
pub mod errors;
/// Per-chunk code extraction.
pub mod extract;
/// Definitive extraction once a stream has ended.
pub mod finalize;
/// Fence, directive and export literals shared by the passes.
pub mod markers;
/// Component name inference.
pub mod name;
/// Tracing subscriber setup.
pub mod observability;
/// System prompt and per-generation user message assembly.
pub mod prompt;
/// Render-readiness heuristic.
pub mod readiness;
/// Sandbox entry-file preparation.
pub mod render;

pub use diagnose::{RenderDiagnosis, RenderErrorKind, diagnose};
pub use errors::ParseError;
pub use extract::extract_partial;
pub use finalize::{FinalCode, finalize};
pub use name::extract_component_name;
pub use prompt::{GenerationRequest, ScreenSummary, name_from_prompt};
pub use readiness::{NotReady, check_render_ready, is_render_ready};
pub use render::prepare_app_source;
