use async_trait::async_trait;

use crate::error::SourceError;

/// One loosely-typed row from the backing store: field name → scalar value.
/// The core never interprets fields beyond rendering them; absent fields are
/// the renderer's problem, not the source's.
pub type Record = serde_json::Map<String, serde_json::Value>;

/// Read-only view of the operational fleet data, one method per tracked
/// collection. Implementations surface any connection or query failure as
/// `SourceError`; row order is whatever the store returns.
#[async_trait]
pub trait FleetSource: Send + Sync {
    async fn drones(&self) -> Result<Vec<Record>, SourceError>;
    async fn locations(&self) -> Result<Vec<Record>, SourceError>;
    async fn missions(&self) -> Result<Vec<Record>, SourceError>;
    async fn survey_reports(&self) -> Result<Vec<Record>, SourceError>;
}
