use std::time::Duration;

use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, instrument};

use aerie_core::{ModelError, TextModel, TokenStream};

use crate::sse::DataLineScanner;

/// Public Gemini REST endpoint.
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
/// Model used when none is configured.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);
/// A stream that goes silent for this long is treated as interrupted.
const IDLE_TIMEOUT: Duration = Duration::from_secs(90);

pub struct GeminiConfig {
    pub api_key: SecretString,
    pub model: String,
    pub base_url: String,
}

impl GeminiConfig {
    pub fn new(api_key: SecretString) -> Self {
        Self {
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

/// Streaming client for Gemini's `streamGenerateContent` endpoint in API-key
/// mode with `alt=sse` framing.
pub struct GeminiModel {
    http: reqwest::Client,
    config: GeminiConfig,
}

impl GeminiModel {
    pub fn new(config: GeminiConfig) -> Result<Self, ModelError> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| ModelError::Network(e.to_string()))?;
        Ok(Self { http, config })
    }

    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?key={}&alt=sse",
            self.config.base_url,
            self.config.model,
            self.config.api_key.expose_secret(),
        )
    }

    fn request_body(prompt: &str) -> serde_json::Value {
        json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }],
            }],
        })
    }
}

#[async_trait::async_trait]
impl TextModel for GeminiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    #[instrument(skip(self, prompt), fields(model = %self.config.model, prompt_chars = prompt.len()))]
    async fn stream(&self, prompt: &str) -> Result<TokenStream, ModelError> {
        let response = self
            .http
            .post(self.stream_url())
            .header(CONTENT_TYPE, "application/json")
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(|e| ModelError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(api_error(status.as_u16(), &body));
        }
        debug!("gemini stream opened");

        let mut scanner = DataLineScanner::new();
        let fragments = tokio_stream::StreamExt::timeout(response.bytes_stream(), IDLE_TIMEOUT)
            .map(move |item| match item {
                Err(_) => vec![Err(ModelError::Timeout(IDLE_TIMEOUT))],
                Ok(Err(e)) => vec![Err(ModelError::Interrupted(e.to_string()))],
                Ok(Ok(chunk)) => scanner
                    .push(&chunk)
                    .into_iter()
                    .flat_map(|data| chunk_items(&data))
                    .collect(),
            })
            .flat_map(futures::stream::iter);

        Ok(Box::pin(fragments))
    }
}

/// Decode one `data:` payload into stream items. A payload usually carries a
/// single text part; error payloads and multi-part candidates also occur.
fn chunk_items(data: &str) -> Vec<Result<String, ModelError>> {
    let chunk: StreamChunk = match serde_json::from_str(data) {
        Ok(chunk) => chunk,
        Err(e) => {
            return vec![Err(ModelError::Interrupted(format!(
                "malformed stream chunk: {e}"
            )))]
        }
    };

    if let Some(err) = chunk.error {
        return vec![Err(ModelError::from_status(
            err.code.unwrap_or(500),
            err.message,
        ))];
    }

    chunk
        .candidates
        .into_iter()
        .take(1)
        .filter_map(|candidate| candidate.content)
        .flat_map(|content| content.parts)
        .filter_map(|part| part.text)
        .filter(|text| !text.is_empty())
        .map(Ok)
        .collect()
}

/// Map a non-2xx response to a `ModelError`, preferring the message inside
/// the API's JSON error envelope over the raw body.
fn api_error(status: u16, body: &str) -> ModelError {
    let message = serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v["error"]["message"].as_str().map(str::to_string))
        .unwrap_or_else(|| body.to_string());
    ModelError::from_status(status, message)
}

// --- Deserialization types for streamGenerateContent chunks ---

#[derive(Deserialize)]
struct StreamChunk {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiErrorPayload>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ApiErrorPayload {
    code: Option<u16>,
    message: String,
}
