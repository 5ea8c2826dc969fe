pub mod database;
pub mod error;
pub mod fleet;
pub mod schema;

pub use database::Database;
pub use error::StoreError;
pub use fleet::{FleetRepo, SqliteFleetSource};
