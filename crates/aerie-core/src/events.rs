use serde::{Deserialize, Serialize};

/// Events emitted to the client during a chat stream. Strict ordering contract:
///
/// Fragment* → (Done | Error)
///
/// Exactly one terminal event closes every stream; nothing follows it. A
/// stream never ends without one.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ChatEvent {
    Fragment { text: String },
    Done,
    Error { message: String },
}

impl ChatEvent {
    pub fn fragment(text: impl Into<String>) -> Self {
        Self::Fragment { text: text.into() }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error { message: message.into() }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Done | Self::Error { .. })
    }

    pub fn is_fragment(&self) -> bool {
        matches!(self, Self::Fragment { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_classification() {
        assert!(ChatEvent::Done.is_terminal());
        assert!(ChatEvent::error("boom").is_terminal());
        assert!(!ChatEvent::fragment("hi").is_terminal());
        assert!(ChatEvent::fragment("hi").is_fragment());
    }

    #[test]
    fn serde_tag_shape() {
        let json = serde_json::to_value(ChatEvent::fragment("Dr")).unwrap();
        assert_eq!(json["type"], "fragment");
        assert_eq!(json["text"], "Dr");

        let json = serde_json::to_value(ChatEvent::Done).unwrap();
        assert_eq!(json["type"], "done");

        let json = serde_json::to_value(ChatEvent::error("boom")).unwrap();
        assert_eq!(json["type"], "error");
        assert_eq!(json["message"], "boom");
    }
}
