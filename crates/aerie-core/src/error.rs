/// Failures reaching the backing fleet store.
#[derive(Clone, Debug, thiserror::Error)]
pub enum SourceError {
    #[error("data source unavailable: {0}")]
    Unavailable(String),
    #[error("data source query failed: {0}")]
    Query(String),
}

impl SourceError {
    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Unavailable(_) => "unavailable",
            Self::Query(_) => "query_failed",
        }
    }
}

/// Failures from the generative-model collaborator.
/// Classification matters only for logging; the chat pipeline never retries.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ModelError {
    #[error("authentication failed: {0}")]
    AuthFailed(String),
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("rate limited: {0}")]
    RateLimited(String),
    #[error("server error {status}: {body}")]
    Server { status: u16, body: String },
    #[error("network error: {0}")]
    Network(String),
    #[error("stream interrupted: {0}")]
    Interrupted(String),
    #[error("idle timeout after {0:?}")]
    Timeout(std::time::Duration),
}

impl ModelError {
    /// Whether a fresh attempt could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::RateLimited(_)
                | Self::Server { .. }
                | Self::Network(_)
                | Self::Interrupted(_)
                | Self::Timeout(_)
        )
    }

    /// Short classification string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::AuthFailed(_) => "auth_failed",
            Self::InvalidRequest(_) => "invalid_request",
            Self::RateLimited(_) => "rate_limited",
            Self::Server { .. } => "server_error",
            Self::Network(_) => "network_error",
            Self::Interrupted(_) => "stream_interrupted",
            Self::Timeout(_) => "timeout",
        }
    }

    /// Classify an HTTP status code into the appropriate variant.
    pub fn from_status(status: u16, body: String) -> Self {
        match status {
            401 | 403 => Self::AuthFailed(body),
            400 => Self::InvalidRequest(body),
            429 => Self::RateLimited(body),
            500..=599 => Self::Server { status, body },
            _ => Self::InvalidRequest(format!("unexpected status {status}: {body}")),
        }
    }
}

/// Union of everything the chat pipeline can fail with. The orchestrator maps
/// each variant to exactly one terminal error event.
#[derive(Clone, Debug, thiserror::Error)]
pub enum ChatError {
    #[error("conversation is empty")]
    EmptyConversation,
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Model(#[from] ModelError),
}

impl ChatError {
    /// Top-level taxonomy string for logging.
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::EmptyConversation => "empty_conversation",
            Self::Source(_) => "source_unavailable",
            Self::Model(_) => "model_failure",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classification() {
        assert!(ModelError::RateLimited("slow down".into()).is_retryable());
        assert!(ModelError::Server { status: 500, body: "err".into() }.is_retryable());
        assert!(ModelError::Network("tcp reset".into()).is_retryable());
        assert!(ModelError::Interrupted("eof".into()).is_retryable());
        assert!(!ModelError::AuthFailed("bad key".into()).is_retryable());
        assert!(!ModelError::InvalidRequest("bad".into()).is_retryable());
    }

    #[test]
    fn from_status_mapping() {
        assert!(matches!(
            ModelError::from_status(401, "unauthorized".into()),
            ModelError::AuthFailed(_)
        ));
        assert!(matches!(
            ModelError::from_status(403, "forbidden".into()),
            ModelError::AuthFailed(_)
        ));
        assert!(matches!(
            ModelError::from_status(400, "bad request".into()),
            ModelError::InvalidRequest(_)
        ));
        assert!(matches!(
            ModelError::from_status(429, "quota".into()),
            ModelError::RateLimited(_)
        ));
        assert!(matches!(
            ModelError::from_status(503, "down".into()),
            ModelError::Server { status: 503, .. }
        ));
        assert!(matches!(
            ModelError::from_status(302, "redirect".into()),
            ModelError::InvalidRequest(_)
        ));
    }

    #[test]
    fn chat_error_kinds() {
        assert_eq!(ChatError::EmptyConversation.error_kind(), "empty_conversation");
        assert_eq!(
            ChatError::from(SourceError::Unavailable("no route".into())).error_kind(),
            "source_unavailable"
        );
        assert_eq!(
            ChatError::from(ModelError::Network("dns".into())).error_kind(),
            "model_failure"
        );
    }

    #[test]
    fn messages_carry_detail() {
        let err = ChatError::from(SourceError::Query("no such table: drones".into()));
        assert_eq!(err.to_string(), "data source query failed: no such table: drones");

        let err = ChatError::EmptyConversation;
        assert_eq!(err.to_string(), "conversation is empty");
    }

    #[test]
    fn source_error_kinds() {
        assert_eq!(SourceError::Unavailable("x".into()).error_kind(), "unavailable");
        assert_eq!(SourceError::Query("x".into()).error_kind(), "query_failed");
    }
}
