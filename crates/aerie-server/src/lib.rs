pub mod auth;
pub mod orchestrator;
pub mod prompt;
pub mod server;

pub use orchestrator::{ChatOrchestrator, DEFAULT_PACING};
pub use server::{build_router, start, AppState, ServerConfig, ServerHandle};
