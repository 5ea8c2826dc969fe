//! Streaming chat orchestration.
//!
//! `ChatOrchestrator::handle` runs one chat exchange: fetch the cached fleet
//! snapshot, compact the conversation, assemble the prompt, stream the
//! model's reply. Events flow to the caller through a bounded channel; the
//! producer task sends exactly one terminal event on every path, and stops
//! as soon as the consumer goes away.

use std::sync::Arc;
use std::time::Duration;

use futures::StreamExt;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, info, info_span, warn, Instrument};

use aerie_context::{compact_history, ContextCache};
use aerie_core::{ChatError, ChatEvent, ChatTurn, RequestId, TextModel};

use crate::prompt::build_prompt;

/// Outbound queue depth. A slow consumer exerts backpressure on the model
/// read loop once this many events are waiting.
const EVENT_BUFFER: usize = 32;

/// Delay between fragment emissions. Cosmetic, keeps dashboard rendering
/// smooth.
pub const DEFAULT_PACING: Duration = Duration::from_millis(20);

pub struct ChatOrchestrator {
    cache: Arc<ContextCache>,
    model: Arc<dyn TextModel>,
    pacing: Duration,
}

/// How the producer side of one exchange ended.
enum StreamEnd {
    Completed { fragments: usize },
    Disconnected,
}

impl ChatOrchestrator {
    pub fn new(cache: Arc<ContextCache>, model: Arc<dyn TextModel>) -> Self {
        Self {
            cache,
            model,
            pacing: DEFAULT_PACING,
        }
    }

    pub fn with_pacing(mut self, pacing: Duration) -> Self {
        self.pacing = pacing;
        self
    }

    /// Model name for logs and health reporting.
    pub fn model_name(&self) -> &str {
        self.model.name()
    }

    /// Run one exchange. The returned stream yields zero or more fragments
    /// followed by exactly one terminal event (done or error). Dropping the
    /// stream cancels the in-flight model call between emissions.
    pub fn handle(&self, turns: Vec<ChatTurn>) -> ReceiverStream<ChatEvent> {
        let (tx, rx) = mpsc::channel(EVENT_BUFFER);
        let cache = Arc::clone(&self.cache);
        let model = Arc::clone(&self.model);
        let pacing = self.pacing;
        let span = info_span!("chat_stream", request_id = %RequestId::new(), turns = turns.len());

        tokio::spawn(
            async move {
                match stream_chat(&cache, model.as_ref(), pacing, &turns, &tx).await {
                    Ok(StreamEnd::Completed { fragments }) => {
                        if tx.send(ChatEvent::Done).await.is_ok() {
                            info!(fragments, "chat stream completed");
                        } else {
                            debug!(fragments, "consumer disconnected before completion event");
                        }
                    }
                    Ok(StreamEnd::Disconnected) => {
                        debug!("consumer disconnected mid-stream");
                    }
                    Err(err) => {
                        let kind = err.error_kind();
                        if tx.send(ChatEvent::error(err.to_string())).await.is_ok() {
                            warn!(error = %err, error_kind = kind, "chat stream failed");
                        } else {
                            debug!(error = %err, "consumer disconnected before error event");
                        }
                    }
                }
            }
            .instrument(span),
        );

        ReceiverStream::new(rx)
    }
}

/// Producer body. Sends fragments as they arrive; the caller sends the
/// terminal event. A failed send means the consumer dropped the stream.
async fn stream_chat(
    cache: &ContextCache,
    model: &dyn TextModel,
    pacing: Duration,
    turns: &[ChatTurn],
    tx: &mpsc::Sender<ChatEvent>,
) -> Result<StreamEnd, ChatError> {
    if turns.is_empty() {
        return Err(ChatError::EmptyConversation);
    }

    let snapshot = cache.get().await?;
    let transcript = compact_history(turns);
    let prompt = build_prompt(&snapshot, &transcript);
    debug!(prompt_chars = prompt.len(), model = model.name(), "opening model stream");

    let mut fragments = model.stream(&prompt).await?;

    let mut sent = 0usize;
    while let Some(item) = fragments.next().await {
        let text = item?;
        if tx.send(ChatEvent::fragment(text)).await.is_err() {
            return Ok(StreamEnd::Disconnected);
        }
        sent += 1;
        if !pacing.is_zero() {
            tokio::time::sleep(pacing).await;
        }
    }
    Ok(StreamEnd::Completed { fragments: sent })
}
