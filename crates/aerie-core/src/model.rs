use std::pin::Pin;

use async_trait::async_trait;
use futures::Stream;

use crate::error::ModelError;

/// Lazy, finite, non-restartable sequence of text fragments from a model.
/// Fragments arrive in generation order; the first `Err` item ends the stream.
pub type TokenStream = Pin<Box<dyn Stream<Item = Result<String, ModelError>> + Send>>;

/// Streaming generative-model collaborator. The orchestrator hands it one
/// fully assembled prompt; it never sees individual conversation turns.
#[async_trait]
pub trait TextModel: Send + Sync {
    /// Model name for logs.
    fn name(&self) -> &str;

    /// Open a streaming completion. Errors returned here happen before any
    /// fragment was produced; errors yielded by the stream happen mid-flight.
    async fn stream(&self, prompt: &str) -> Result<TokenStream, ModelError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::StreamExt;

    struct Canned;

    #[async_trait]
    impl TextModel for Canned {
        fn name(&self) -> &str {
            "canned"
        }

        async fn stream(&self, _prompt: &str) -> Result<TokenStream, ModelError> {
            let items = vec![Ok("Dr".to_string()), Ok("one ready.".to_string())];
            Ok(Box::pin(futures::stream::iter(items)))
        }
    }

    #[tokio::test]
    async fn trait_object_streams_fragments() {
        let model: Box<dyn TextModel> = Box::new(Canned);
        let mut stream = model.stream("prompt").await.unwrap();

        let mut collected = Vec::new();
        while let Some(item) = stream.next().await {
            collected.push(item.unwrap());
        }
        assert_eq!(collected, vec!["Dr", "one ready."]);
    }
}
