//! Gemini-backed implementation of the `TextModel` contract, plus a
//! scriptable mock for tests.

pub mod gemini;
pub mod mock;
pub mod sse;

pub use gemini::{GeminiConfig, GeminiModel, DEFAULT_BASE_URL, DEFAULT_MODEL};
pub use mock::{MockModel, MockReply};
