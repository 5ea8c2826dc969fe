//! HTTP surface: `POST /chat/stream` (SSE) and `GET /health`.
//!
//! The wire format matches what the dashboard frontend already speaks:
//! Gemini-style messages in, `data:`-framed text out with `[DONE]` and
//! `[ERROR] <message>` sentinels.

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::sse::{Event, KeepAlive, Sse};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use futures::StreamExt;
use secrecy::SecretString;
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::CorsLayer;
use tracing::{debug, info};

use aerie_core::{ChatEvent, ChatTurn};

use crate::auth::{self, DEFAULT_JWT_SECRET};
use crate::orchestrator::ChatOrchestrator;

/// Server configuration.
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub jwt_secret: SecretString,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            jwt_secret: DEFAULT_JWT_SECRET.to_string().into(),
        }
    }
}

/// Shared application state passed to Axum handlers.
#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<ChatOrchestrator>,
    pub jwt_secret: SecretString,
}

/// Chat request body: the dashboard sends the whole conversation each time,
/// each message carrying its text in Gemini-style parts.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub messages: Vec<WireMessage>,
}

#[derive(Debug, Deserialize)]
pub struct WireMessage {
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub parts: Vec<WirePart>,
}

#[derive(Debug, Deserialize)]
pub struct WirePart {
    pub text: String,
}

fn default_role() -> String {
    "user".to_string()
}

impl WireMessage {
    /// First part carries the text; the frontend never sends more than one.
    /// The frontend labels assistant turns "model".
    fn into_turn(self) -> ChatTurn {
        let text = self
            .parts
            .into_iter()
            .next()
            .map(|part| part.text)
            .unwrap_or_default();
        match self.role.as_str() {
            "assistant" | "model" => ChatTurn::assistant(text),
            _ => ChatTurn::user(text),
        }
    }
}

/// Build the Axum router with all routes. Cookie auth requires mirrored CORS
/// origins rather than a wildcard.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/chat/stream", post(chat_handler))
        .route("/health", get(health_handler))
        .with_state(state)
        .layer(CorsLayer::very_permissive())
}

/// Create and start the server. Returns a handle that keeps it alive.
pub async fn start(
    config: ServerConfig,
    orchestrator: Arc<ChatOrchestrator>,
) -> Result<ServerHandle, std::io::Error> {
    let state = AppState {
        orchestrator,
        jwt_secret: config.jwt_secret.clone(),
    };
    let router = build_router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    let local_addr = listener.local_addr()?;

    tracing::info!(addr = %local_addr, "aerie chat service listening");

    let server = tokio::spawn(async move {
        axum::serve(listener, router).await.ok();
    });

    Ok(ServerHandle {
        port: local_addr.port(),
        _server: server,
    })
}

/// Handle returned by `start()`.
pub struct ServerHandle {
    pub port: u16,
    _server: tokio::task::JoinHandle<()>,
}

async fn chat_handler(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<ChatRequest>,
) -> Response {
    let claims = match auth::authenticate(&headers, &state.jwt_secret) {
        Ok(claims) => claims,
        Err(reason) => {
            debug!(?reason, "rejected unauthenticated chat request");
            return (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "invalid token" })),
            )
                .into_response();
        }
    };
    info!(
        user_id = %claims.user_id,
        turns = request.messages.len(),
        "chat stream requested"
    );

    let turns: Vec<ChatTurn> = request
        .messages
        .into_iter()
        .map(WireMessage::into_turn)
        .collect();

    let events = state
        .orchestrator
        .handle(turns)
        .map(|event| Ok::<_, Infallible>(to_sse_event(event)));

    Sse::new(events)
        .keep_alive(KeepAlive::default())
        .into_response()
}

async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "model": state.orchestrator.model_name(),
    }))
}

fn to_sse_event(event: ChatEvent) -> Event {
    match event {
        ChatEvent::Fragment { text } => Event::default().data(text),
        ChatEvent::Done => Event::default().data("[DONE]"),
        ChatEvent::Error { message } => Event::default().data(format!("[ERROR] {message}")),
    }
}
