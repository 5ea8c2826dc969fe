use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;
use tracing::{debug, info};

use aerie_core::{Snapshot, SourceError};

use crate::fetcher::SnapshotFetcher;

/// How long a snapshot stays fresh.
pub const DEFAULT_TTL: Duration = Duration::from_secs(600);

struct CacheEntry {
    snapshot: Snapshot,
    fetched_at: Instant,
}

/// TTL cache over `SnapshotFetcher`, the only mutable state shared across
/// requests. Constructed once at startup and passed around by handle.
///
/// The write lock is held across a refetch, so at most one fetch is in flight
/// at a time; callers that lost the race re-check freshness after acquiring
/// the lock and reuse the winner's entry. A failed refetch leaves the previous
/// (already stale) entry in place and propagates the error; a stale snapshot
/// is never served as a fallback, and the next call re-attempts the fetch.
pub struct ContextCache {
    fetcher: SnapshotFetcher,
    ttl: Duration,
    entry: RwLock<Option<CacheEntry>>,
}

impl ContextCache {
    pub fn new(fetcher: SnapshotFetcher) -> Self {
        Self::with_ttl(fetcher, DEFAULT_TTL)
    }

    pub fn with_ttl(fetcher: SnapshotFetcher, ttl: Duration) -> Self {
        Self {
            fetcher,
            ttl,
            entry: RwLock::new(None),
        }
    }

    /// Return the cached snapshot, refetching first when the entry is missing
    /// or older than the TTL. Freshness is judged against one clock reading
    /// captured at call entry; an entry exactly at the TTL is still fresh.
    pub async fn get(&self) -> Result<Snapshot, SourceError> {
        let now = Instant::now();

        {
            let entry = self.entry.read().await;
            if let Some(entry) = entry.as_ref() {
                if is_fresh(entry, now, self.ttl) {
                    debug!(
                        age_secs = now.duration_since(entry.fetched_at).as_secs(),
                        "snapshot cache hit"
                    );
                    return Ok(entry.snapshot.clone());
                }
            }
        }

        let mut entry = self.entry.write().await;

        // Another task may have refreshed while this one waited for the lock.
        if let Some(existing) = entry.as_ref() {
            if is_fresh(existing, now, self.ttl) {
                return Ok(existing.snapshot.clone());
            }
        }

        let snapshot = self.fetcher.fetch().await?;
        *entry = Some(CacheEntry {
            snapshot: snapshot.clone(),
            fetched_at: now,
        });
        info!("snapshot cache refreshed");

        Ok(snapshot)
    }
}

fn is_fresh(entry: &CacheEntry, now: Instant, ttl: Duration) -> bool {
    now.duration_since(entry.fetched_at) <= ttl
}
