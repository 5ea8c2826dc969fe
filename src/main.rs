use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use secrecy::SecretString;

use aerie_context::{ContextCache, SnapshotFetcher, DEFAULT_TTL};
use aerie_llm::{GeminiConfig, GeminiModel};
use aerie_server::auth::DEFAULT_JWT_SECRET;
use aerie_server::{ChatOrchestrator, ServerConfig};
use aerie_store::{Database, SqliteFleetSource};
use aerie_telemetry::{init_telemetry, TelemetryConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let telemetry = TelemetryConfig {
        json_output: env_flag("AERIE_LOG_JSON", true),
        ..TelemetryConfig::default()
    };
    init_telemetry(&telemetry);

    tracing::info!("starting aerie chat service");

    let db_path = match std::env::var("AERIE_DB") {
        Ok(path) => PathBuf::from(path),
        Err(_) => {
            let dir = dirs_home().join(".aerie");
            std::fs::create_dir_all(&dir).context("creating data directory")?;
            dir.join("fleet.db")
        }
    };
    let db = Database::open(&db_path).context("opening fleet database")?;
    tracing::info!(path = %db_path.display(), "fleet database opened");

    let source = Arc::new(SqliteFleetSource::new(db));
    let ttl = std::env::var("AERIE_CACHE_TTL_SECS")
        .ok()
        .and_then(|v| v.parse().ok())
        .map(Duration::from_secs)
        .unwrap_or(DEFAULT_TTL);
    let cache = Arc::new(ContextCache::with_ttl(SnapshotFetcher::new(source), ttl));

    let api_key: SecretString = std::env::var("GEMINI_API_KEY")
        .context("GEMINI_API_KEY is not set")?
        .into();
    let mut model_config = GeminiConfig::new(api_key);
    if let Ok(model) = std::env::var("GEMINI_MODEL") {
        model_config.model = model;
    }
    let model = GeminiModel::new(model_config).context("building gemini client")?;

    let orchestrator = Arc::new(ChatOrchestrator::new(cache, Arc::new(model)));

    let config = ServerConfig {
        host: std::env::var("AERIE_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
        port: std::env::var("AERIE_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(8000),
        jwt_secret: std::env::var("JWT_SECRET")
            .unwrap_or_else(|_| DEFAULT_JWT_SECRET.to_string())
            .into(),
    };
    let handle = aerie_server::start(config, Arc::clone(&orchestrator))
        .await
        .context("starting http server")?;

    tracing::info!(
        port = handle.port,
        model = orchestrator.model_name(),
        cache_ttl_secs = ttl.as_secs(),
        "aerie chat service ready"
    );

    tokio::signal::ctrl_c()
        .await
        .context("listening for shutdown signal")?;
    tracing::info!("shutting down");
    Ok(())
}

fn env_flag(name: &str, default: bool) -> bool {
    match std::env::var(name) {
        Ok(value) => !matches!(value.as_str(), "0" | "false" | "no"),
        Err(_) => default,
    }
}

fn dirs_home() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
}
