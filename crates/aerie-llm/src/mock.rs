//! Deterministic in-process model for tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use aerie_core::{ModelError, TextModel, TokenStream};

/// Pre-programmed outcome for one `stream()` call.
pub enum MockReply {
    /// Yield these fragments, then end cleanly.
    Tokens(Vec<String>),
    /// Fail the call itself, before any fragment is produced.
    Refuse(ModelError),
    /// Yield these fragments, then fail mid-stream.
    TokensThenError(Vec<String>, ModelError),
}

impl MockReply {
    pub fn tokens(tokens: &[&str]) -> Self {
        Self::Tokens(tokens.iter().map(|t| t.to_string()).collect())
    }

    pub fn fail_after(tokens: &[&str], error: ModelError) -> Self {
        Self::TokensThenError(tokens.iter().map(|t| t.to_string()).collect(), error)
    }
}

/// Replies in the order configured, records every prompt it was handed.
pub struct MockModel {
    replies: Mutex<VecDeque<MockReply>>,
    prompts: Mutex<Vec<String>>,
    calls: AtomicUsize,
}

impl MockModel {
    pub fn new(replies: Vec<MockReply>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            prompts: Mutex::new(Vec::new()),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn single(reply: MockReply) -> Self {
        Self::new(vec![reply])
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }

    /// Prompts passed to `stream()`, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().clone()
    }
}

#[async_trait]
impl TextModel for MockModel {
    fn name(&self) -> &str {
        "mock"
    }

    async fn stream(&self, prompt: &str) -> Result<TokenStream, ModelError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        self.prompts.lock().push(prompt.to_string());

        let reply = self.replies.lock().pop_front().ok_or_else(|| {
            ModelError::InvalidRequest("mock model: no reply configured for this call".into())
        })?;

        let items: Vec<Result<String, ModelError>> = match reply {
            MockReply::Tokens(tokens) => tokens.into_iter().map(Ok).collect(),
            MockReply::Refuse(error) => return Err(error),
            MockReply::TokensThenError(tokens, error) => tokens
                .into_iter()
                .map(Ok)
                .chain(std::iter::once(Err(error)))
                .collect(),
        };
        Ok(Box::pin(futures::stream::iter(items)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    #[tokio::test]
    async fn replays_tokens_in_order() {
        let model = MockModel::single(MockReply::tokens(&["Dr", "one ready."]));
        let stream = model.stream("status?").await.unwrap();
        let tokens: Vec<_> = stream.map(|item| item.unwrap()).collect().await;

        assert_eq!(tokens, vec!["Dr", "one ready."]);
        assert_eq!(model.call_count(), 1);
        assert_eq!(model.prompts(), vec!["status?"]);
    }

    #[tokio::test]
    async fn refusal_fails_before_any_fragment() {
        let model = MockModel::single(MockReply::Refuse(ModelError::RateLimited("slow".into())));
        let err = model.stream("hi").await.err().unwrap();
        assert!(matches!(err, ModelError::RateLimited(_)));
    }

    #[tokio::test]
    async fn fail_after_yields_tokens_then_error() {
        let model = MockModel::single(MockReply::fail_after(
            &["partial"],
            ModelError::Interrupted("connection reset".into()),
        ));
        let stream = model.stream("hi").await.unwrap();
        let items: Vec<_> = stream.collect().await;

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].as_ref().unwrap(), "partial");
        assert!(matches!(items[1], Err(ModelError::Interrupted(_))));
    }

    #[tokio::test]
    async fn sequential_calls_consume_replies() {
        let model = MockModel::new(vec![
            MockReply::tokens(&["first"]),
            MockReply::tokens(&["second"]),
        ]);

        let first: Vec<_> = model
            .stream("a")
            .await
            .unwrap()
            .map(|item| item.unwrap())
            .collect()
            .await;
        let second: Vec<_> = model
            .stream("b")
            .await
            .unwrap()
            .map(|item| item.unwrap())
            .collect()
            .await;

        assert_eq!(first, vec!["first"]);
        assert_eq!(second, vec!["second"]);
        assert!(model.stream("c").await.is_err());
        assert_eq!(model.prompts(), vec!["a", "b", "c"]);
    }
}
