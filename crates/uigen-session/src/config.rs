use std::time::Duration;

/// Generation behavior options.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SessionConfig {
    /// Bounded event buffer size between the generation task and the consumer.
    pub stream_buffer_capacity: usize,
    /// Optional limit on the whole generation, from open to finalize.
    pub timeout: Option<Duration>,
    /// Characters of raw response echoed in each progress event.
    pub progress_preview_chars: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            stream_buffer_capacity: 64,
            timeout: None,
            progress_preview_chars: 100,
        }
    }
}

impl SessionConfig {
    pub fn stream_buffer_capacity(mut self, capacity: usize) -> Self {
        self.stream_buffer_capacity = capacity;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn progress_preview_chars(mut self, chars: usize) -> Self {
        self.progress_preview_chars = chars;
        self
    }
}
