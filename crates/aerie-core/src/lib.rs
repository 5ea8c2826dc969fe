pub mod error;
pub mod events;
pub mod ids;
pub mod model;
pub mod records;
pub mod snapshot;
pub mod turns;

pub use error::{ChatError, ModelError, SourceError};
pub use events::ChatEvent;
pub use ids::RequestId;
pub use model::{TextModel, TokenStream};
pub use records::{FleetSource, Record};
pub use snapshot::Snapshot;
pub use turns::{ChatTurn, Role};
