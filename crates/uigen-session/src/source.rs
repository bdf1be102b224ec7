use std::pin::Pin;
use std::time::Duration;

use futures::{Stream, StreamExt as _};

use crate::errors::SourceError;

/// Text chunks of one model response, in arrival order.
///
/// The stream ending is the end-of-response signal.
pub type ChunkStream = Pin<Box<dyn Stream<Item = Result<String, SourceError>> + Send>>;

/// Prompt pair sent to the upstream model for one generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceRequest {
    pub generation_id: uuid::Uuid,
    pub system_prompt: String,
    pub user_message: String,
}

/// Anything that can turn a prompt into a stream of response text.
///
/// Implementations wrap the model transport; the session only ever sees
/// text chunks.
#[async_trait::async_trait]
pub trait ChunkSource: Send + Sync {
    /// Stable identifier used in logs and failures.
    fn id(&self) -> String;

    /// Opens the response stream for `request`.
    async fn open(&self, request: SourceRequest) -> Result<ChunkStream, SourceError>;
}

/// Replays a recorded response in fixed-size chunks.
#[derive(Clone, Debug)]
pub struct ScriptedSource {
    response: String,
    chunk_chars: usize,
    delay: Option<Duration>,
}

impl ScriptedSource {
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
            chunk_chars: 32,
            delay: None,
        }
    }

    /// Characters per chunk. Zero is treated as one.
    pub fn chunk_chars(mut self, chunk_chars: usize) -> Self {
        self.chunk_chars = chunk_chars.max(1);
        self
    }

    /// Pause before each chunk, to mimic token pacing.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    fn chunks(&self) -> Vec<String> {
        let chars: Vec<char> = self.response.chars().collect();
        chars
            .chunks(self.chunk_chars)
            .map(|chunk| chunk.iter().collect())
            .collect()
    }
}

#[async_trait::async_trait]
impl ChunkSource for ScriptedSource {
    fn id(&self) -> String {
        "scripted".to_string()
    }

    async fn open(&self, _request: SourceRequest) -> Result<ChunkStream, SourceError> {
        let chunks = futures::stream::iter(self.chunks());
        match self.delay {
            Some(delay) => Ok(Box::pin(chunks.then(move |chunk| async move {
                tokio::time::sleep(delay).await;
                Ok::<_, SourceError>(chunk)
            }))),
            None => Ok(Box::pin(chunks.map(Ok::<_, SourceError>))),
        }
    }
}
