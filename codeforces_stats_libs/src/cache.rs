use serde::{de::DeserializeOwned, Serialize};
use std::collections::HashMap;
use std::future::Future;
use tokio::sync::RwLock;
use tokio::time::{Duration, Instant};

/// Result kind a cached entry belongs to. One handle can have one fresh entry
/// per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheKind {
    AllStats,
    UserInfo,
    MultiUserInfo,
    RatingHistory,
    SolvedCount,
    ParticipatedContests,
    CommonContests,
    UpcomingContests,
}

struct CacheEntry {
    stored_at: Instant,
    value: serde_json::Value,
}

/// Best-effort TTL cache for upstream-derived responses. Values are stored as
/// JSON so a single store serves every response shape.
pub struct ResponseCache {
    ttl: Duration,
    entries: RwLock<HashMap<(CacheKind, String), CacheEntry>>,
}

impl ResponseCache {
    pub fn new(ttl: Duration) -> Self {
        ResponseCache {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    pub async fn store(&self, kind: CacheKind, key: &str, value: &impl Serialize) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("failed to serialize cache entry for {:?}: {:?}", kind, e);
                return;
            }
        };

        let mut entries = self.entries.write().await;
        entries.insert(
            (kind, key.to_string()),
            CacheEntry {
                stored_at: Instant::now(),
                value,
            },
        );
    }

    /// Returns the cached value unless it is missing, stale, or no longer
    /// deserializes into the requested shape.
    pub async fn fetch<T: DeserializeOwned>(&self, kind: CacheKind, key: &str) -> Option<T> {
        let entries = self.entries.read().await;
        let entry = entries.get(&(kind, key.to_string()))?;
        if entry.stored_at.elapsed() > self.ttl {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    /// Drops every stale entry.
    pub async fn expire(&self) {
        let mut entries = self.entries.write().await;
        entries.retain(|_, entry| entry.stored_at.elapsed() <= self.ttl);
    }
}

/// Awaits `fetch`; a successful result is stored and returned, a failed one
/// falls back to the last good cached value for the same key.
pub async fn read_through<T, Fut>(
    cache: &ResponseCache,
    kind: CacheKind,
    key: &str,
    fetch: Fut,
) -> Option<T>
where
    T: Serialize + DeserializeOwned,
    Fut: Future<Output = Option<T>>,
{
    match fetch.await {
        Some(value) => {
            cache.store(kind, key, &value).await;
            Some(value)
        }
        None => cache.fetch(kind, key).await,
    }
}
