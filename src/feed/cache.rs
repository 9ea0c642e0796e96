// src/feed/cache.rs
use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::feed::store::CacheStore;
use crate::feed::types::{CacheEntry, Post};

/// Fixed key of the single cache slot.
pub const CACHE_KEY: &str = "instagram_posts_cache";

/// Default freshness window.
pub const DEFAULT_TTL: Duration = Duration::from_secs(30 * 60);

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheRead {
    Fresh(CacheEntry),
    /// Already removed from storage; handed back for a later stale read.
    Expired(CacheEntry),
    Malformed,
    Missing,
}

/// The single-slot post cache. Expired and malformed entries are purged
/// on detection.
#[derive(Clone)]
pub struct FeedCache {
    store: Arc<dyn CacheStore>,
    ttl: Duration,
}

impl FeedCache {
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    pub fn read_fresh(&self, now_ms: i64) -> CacheRead {
        let raw = match self.store.get(CACHE_KEY) {
            Ok(Some(raw)) => raw,
            Ok(None) => return CacheRead::Missing,
            Err(e) => {
                warn!(error = ?e, "feed cache read failed; treating as miss");
                return CacheRead::Missing;
            }
        };

        match serde_json::from_str::<CacheEntry>(&raw) {
            Ok(entry) if entry.is_fresh(now_ms, self.ttl) => CacheRead::Fresh(entry),
            Ok(entry) => {
                debug!(
                    age_ms = now_ms.saturating_sub(entry.fetched_at),
                    "feed cache expired"
                );
                self.purge();
                CacheRead::Expired(entry)
            }
            Err(e) => {
                warn!(error = %e, "feed cache entry malformed; purging");
                self.purge();
                CacheRead::Malformed
            }
        }
    }

    /// Stale read: whatever is stored, regardless of age.
    pub fn read_any(&self) -> Option<CacheEntry> {
        let raw = self.store.get(CACHE_KEY).ok().flatten()?;
        serde_json::from_str(&raw).ok()
    }

    pub fn write(&self, posts: &[Post], now_ms: i64) -> bool {
        let entry = CacheEntry::new(posts.to_vec(), now_ms);
        let json = match serde_json::to_string(&entry) {
            Ok(j) => j,
            Err(e) => {
                warn!(error = %e, "feed cache serialize failed");
                return false;
            }
        };
        match self.store.set(CACHE_KEY, &json) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = ?e, "feed cache write failed");
                false
            }
        }
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(CACHE_KEY) {
            warn!(error = ?e, "feed cache clear failed");
        }
    }

    fn purge(&self) {
        metrics::counter!("feed_cache_purged_total").increment(1);
        self.clear();
    }
}
