use std::sync::Arc;

use futures::StreamExt as _;
use tokio::sync::{mpsc, oneshot, watch};
use tracing::{debug, info, warn};
use uigen_core::prompt::SYSTEM_PROMPT;
use uigen_core::{FinalCode, GenerationRequest, check_render_ready, extract_partial, finalize};

use crate::config::SessionConfig;
use crate::errors::{GenerationFailure, SessionError};
use crate::source::{ChunkSource, SourceRequest};
use crate::stream::GenerationEvent;

/// Handle used to request cancellation of a running generation.
#[derive(Clone)]
pub struct AbortHandle {
    tx: watch::Sender<bool>,
}

impl AbortHandle {
    /// Requests cancellation.
    ///
    /// Cancellation is best-effort and becomes visible as a terminal
    /// `GenerationEvent::Failed` with `GenerationFailure::Cancelled`. A
    /// cancelled generation is never finalized.
    pub fn abort(&self) {
        let _ = self.tx.send(true);
    }
}

/// Entry point for starting generations against one chunk source.
#[derive(Clone)]
pub struct Generator {
    source: Arc<dyn ChunkSource>,
    config: SessionConfig,
}

impl Generator {
    pub fn builder() -> GeneratorBuilder {
        GeneratorBuilder::default()
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Validates `request` and starts streaming it.
    ///
    /// The returned stream yields `Started`, then `Progress` per chunk with
    /// `PreviewUpdated` whenever render-ready code changes, then a terminal
    /// `Completed` or `Failed` event.
    pub async fn generate(&self, request: GenerationRequest) -> Result<GenerationStream, SessionError> {
        if request.prompt.trim().is_empty() {
            return Err(SessionError::Validation("prompt must not be empty".into()));
        }
        if let Some(edit) = &request.edit
            && edit.code.trim().is_empty()
        {
            return Err(SessionError::Validation(
                "edited screen has no code to revise".into(),
            ));
        }

        let generation_id = uuid::Uuid::new_v4();
        let (tx, rx) = mpsc::channel(self.config.stream_buffer_capacity);
        let (final_tx, final_rx) = oneshot::channel();
        let (abort_tx, abort_rx) = watch::channel(false);

        let task = GenerationTask {
            generation_id,
            source: self.source.clone(),
            source_request: SourceRequest {
                generation_id,
                system_prompt: SYSTEM_PROMPT.to_string(),
                user_message: request.user_message(),
            },
            provisional_name: request.provisional_name(),
            kept_name: request.edit.map(|target| target.name),
            config: self.config.clone(),
        };
        tokio::spawn(task.run(tx, final_tx, abort_rx));

        Ok(GenerationStream {
            generation_id,
            rx,
            final_rx,
            abort_handle: AbortHandle { tx: abort_tx },
            saw_terminal: false,
        })
    }

    /// Runs a generation to completion and returns the finalized code.
    pub async fn collect(&self, request: GenerationRequest) -> Result<FinalCode, SessionError> {
        self.generate(request).await?.finish().await
    }
}

/// Builder for a `Generator`.
#[derive(Default)]
pub struct GeneratorBuilder {
    source: Option<Arc<dyn ChunkSource>>,
    config: SessionConfig,
}

impl GeneratorBuilder {
    pub fn source(mut self, source: Arc<dyn ChunkSource>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Result<Generator, SessionError> {
        let source = self
            .source
            .ok_or_else(|| SessionError::Config("a chunk source is required".into()))?;
        if self.config.stream_buffer_capacity == 0 {
            return Err(SessionError::Config(
                "stream_buffer_capacity must be greater than 0".into(),
            ));
        }
        Ok(Generator {
            source,
            config: self.config,
        })
    }
}

/// Streaming handle returned by `Generator::generate`.
///
/// Use `next_event()` to consume events as they arrive and `finish()` to
/// obtain the final result after the terminal event.
pub struct GenerationStream {
    generation_id: uuid::Uuid,
    rx: mpsc::Receiver<GenerationEvent>,
    final_rx: oneshot::Receiver<Result<FinalCode, SessionError>>,
    abort_handle: AbortHandle,
    saw_terminal: bool,
}

impl GenerationStream {
    pub fn generation_id(&self) -> uuid::Uuid {
        self.generation_id
    }

    pub fn abort_handle(&self) -> AbortHandle {
        self.abort_handle.clone()
    }

    /// Waits for and returns the next event.
    ///
    /// Returns `None` after the event channel is closed.
    pub async fn next_event(&mut self) -> Option<GenerationEvent> {
        let event = self.rx.recv().await;
        if event.as_ref().is_some_and(GenerationEvent::is_terminal) {
            self.saw_terminal = true;
        }
        event
    }

    /// Drains the stream (if needed) and returns the terminal result.
    ///
    /// This is safe to call after consuming events manually with `next_event()`.
    pub async fn finish(mut self) -> Result<FinalCode, SessionError> {
        while !self.saw_terminal {
            match self.rx.recv().await {
                Some(event) if event.is_terminal() => self.saw_terminal = true,
                Some(_) => {}
                None => break,
            }
        }

        match self.final_rx.await {
            Ok(result) => result,
            Err(_) => Err(SessionError::protocol_msg(format!(
                "generation task ended without final result ({})",
                self.generation_id
            ))),
        }
    }
}

struct GenerationTask {
    generation_id: uuid::Uuid,
    source: Arc<dyn ChunkSource>,
    source_request: SourceRequest,
    provisional_name: String,
    /// Edits keep the edited screen's name instead of the inferred one.
    kept_name: Option<String>,
    config: SessionConfig,
}

/// Running state of one generation's response text.
#[derive(Default)]
struct Accumulator {
    received: String,
    received_chars: usize,
    last_preview: Option<String>,
}

impl Accumulator {
    fn push(&mut self, chunk: &str) {
        self.received.push_str(chunk);
        self.received_chars += chunk.chars().count();
    }

    fn progress_preview(&self, max_chars: usize) -> String {
        if self.received_chars <= max_chars {
            return self.received.clone();
        }
        let head: String = self.received.chars().take(max_chars).collect();
        format!("{head}...")
    }

    /// Render-ready code that differs from the last preview sent, if any.
    fn next_preview(&mut self) -> Option<String> {
        let candidate = extract_partial(&self.received)?;
        if let Err(reason) = check_render_ready(&candidate) {
            debug!(%reason, len = candidate.len(), "holding back preview");
            return None;
        }
        if self.last_preview.as_deref() == Some(candidate.as_str()) {
            return None;
        }
        self.last_preview = Some(candidate.clone());
        Some(candidate)
    }
}

impl GenerationTask {
    async fn run(
        self,
        tx: mpsc::Sender<GenerationEvent>,
        final_tx: oneshot::Sender<Result<FinalCode, SessionError>>,
        mut abort_rx: watch::Receiver<bool>,
    ) {
        let generation_id = self.generation_id;
        let source_id = self.source.id();

        if !send_event(
            &tx,
            GenerationEvent::Started {
                generation_id,
                source_id: source_id.clone(),
                provisional_name: self.provisional_name.clone(),
                edit: self.kept_name.is_some(),
            },
        )
        .await
        {
            let _ = final_tx.send(Err(SessionError::protocol_msg(
                "generation receiver dropped before Started",
            )));
            return;
        }

        let deadline = self
            .config
            .timeout
            .map(|timeout| tokio::time::Instant::now() + timeout);
        let timed_out = async move {
            match deadline {
                Some(deadline) => tokio::time::sleep_until(deadline).await,
                None => std::future::pending().await,
            }
        };
        tokio::pin!(timed_out);

        let opened = tokio::select! {
            opened = self.source.open(self.source_request.clone()) => opened,
            // The handle only ever sends `true`; a closed channel means the
            // stream was dropped.
            _ = abort_rx.changed() => {
                info!(%generation_id, "generation cancelled before the source opened");
                fail(&tx, final_tx, generation_id, GenerationFailure::Cancelled).await;
                return;
            }
            _ = &mut timed_out => {
                fail(&tx, final_tx, generation_id, GenerationFailure::TimedOut).await;
                return;
            }
        };
        let mut chunks = match opened {
            Ok(chunks) => chunks,
            Err(err) => {
                warn!(%generation_id, source = %source_id, error = %err, "chunk source refused generation");
                fail(&tx, final_tx, generation_id, GenerationFailure::from(&err)).await;
                return;
            }
        };

        let mut seq = 0_u64;
        let mut acc = Accumulator::default();
        loop {
            tokio::select! {
                changed = abort_rx.changed() => {
                    // A closed channel means the stream handle was dropped.
                    if changed.is_err() || *abort_rx.borrow() {
                        info!(%generation_id, received = acc.received_chars, "generation cancelled");
                        fail(&tx, final_tx, generation_id, GenerationFailure::Cancelled).await;
                        return;
                    }
                }
                _ = &mut timed_out => {
                    warn!(%generation_id, received = acc.received_chars, "generation timed out");
                    fail(&tx, final_tx, generation_id, GenerationFailure::TimedOut).await;
                    return;
                }
                next = chunks.next() => {
                    match next {
                        Some(Ok(chunk)) => {
                            if chunk.is_empty() {
                                continue;
                            }
                            acc.push(&chunk);
                            debug!(%generation_id, seq, received = acc.received_chars, "chunk received");

                            let progress = GenerationEvent::Progress {
                                generation_id,
                                seq,
                                received_chars: acc.received_chars,
                                preview: acc.progress_preview(self.config.progress_preview_chars),
                            };
                            let mut sent = send_event(&tx, progress).await;
                            if sent && let Some(code) = acc.next_preview() {
                                sent = send_event(&tx, GenerationEvent::PreviewUpdated { generation_id, seq, code }).await;
                            }
                            seq = seq.saturating_add(1);
                            if !sent {
                                let _ = final_tx.send(Err(SessionError::protocol_msg("generation receiver dropped during output")));
                                return;
                            }
                        }
                        Some(Err(err)) => {
                            warn!(%generation_id, source = %source_id, error = %err, "chunk stream failed");
                            fail(&tx, final_tx, generation_id, GenerationFailure::from(&err)).await;
                            return;
                        }
                        None => {
                            self.complete(&tx, final_tx, &acc.received).await;
                            return;
                        }
                    }
                }
            }
        }
    }

    async fn complete(
        &self,
        tx: &mpsc::Sender<GenerationEvent>,
        final_tx: oneshot::Sender<Result<FinalCode, SessionError>>,
        response: &str,
    ) {
        let generation_id = self.generation_id;
        match finalize(response) {
            Ok(mut result) => {
                if let Some(name) = &self.kept_name {
                    result.name = name.clone();
                }
                info!(%generation_id, component = %result.name, len = result.code.len(), "generation finalized");
                let sent = send_event(
                    tx,
                    GenerationEvent::Completed {
                        generation_id,
                        result: result.clone(),
                    },
                )
                .await;
                let _ = final_tx.send(if sent {
                    Ok(result)
                } else {
                    Err(SessionError::protocol_msg(
                        "generation receiver dropped before completion",
                    ))
                });
            }
            Err(err) => fail(tx, final_tx, generation_id, GenerationFailure::from(&err)).await,
        }
    }
}

async fn fail(
    tx: &mpsc::Sender<GenerationEvent>,
    final_tx: oneshot::Sender<Result<FinalCode, SessionError>>,
    generation_id: uuid::Uuid,
    failure: GenerationFailure,
) {
    let _ = send_event(
        tx,
        GenerationEvent::Failed {
            generation_id,
            error: failure.clone(),
        },
    )
    .await;
    let _ = final_tx.send(Err(SessionError::GenerationFailed(failure)));
}

async fn send_event(tx: &mpsc::Sender<GenerationEvent>, event: GenerationEvent) -> bool {
    tx.send(event).await.is_ok()
}
