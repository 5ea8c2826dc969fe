pub mod cache;
pub mod fetcher;
pub mod history;

pub use cache::{ContextCache, DEFAULT_TTL};
pub use fetcher::SnapshotFetcher;
pub use history::compact_history;
