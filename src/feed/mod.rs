// src/feed/mod.rs
//! Feed gateway: fresh cache, then network, then stale cache, then the
//! built-in posts. `get_posts` always returns something.

pub mod cache;
pub mod fallback;
pub mod providers;
pub mod status;
pub mod store;
pub mod types;

use std::sync::Arc;

use chrono::Utc;
use metrics::{counter, describe_counter, describe_gauge, describe_histogram};
use once_cell::sync::OnceCell;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::config::FeedConfig;
use crate::error::FeedError;
use crate::feed::cache::{CacheRead, FeedCache};
use crate::feed::providers::InstagramSource;
use crate::feed::store::{CacheStore, FileStore};
use crate::feed::types::{CacheEntry, Post, PostSource};

/// Minimum number of posts requested upstream, so the cache stays useful
/// for larger pages.
pub const MIN_FETCH: usize = 12;

pub const STALE_ADVISORY: &str = "Some photos may not be up to date.";

/// One-time metrics registration (so series show up on /metrics).
fn ensure_metrics_described() {
    static ONCE: OnceCell<()> = OnceCell::new();
    ONCE.get_or_init(|| {
        describe_counter!("feed_requests_total", "Total get_posts calls.");
        describe_counter!(
            "feed_cache_hits_total",
            "Requests served from a fresh cache entry."
        );
        describe_counter!(
            "feed_cache_purged_total",
            "Expired or malformed cache entries removed."
        );
        describe_counter!("feed_fetch_errors_total", "Remote fetch failures.");
        describe_counter!(
            "feed_stale_served_total",
            "Requests served from an expired cache entry after a failed fetch."
        );
        describe_counter!(
            "feed_fallback_total",
            "Requests served from the built-in posts."
        );
        describe_histogram!("feed_fetch_ms", "Remote fetch time in milliseconds.");
        describe_gauge!("feed_cache_ttl_ms", "Configured freshness window.");
    });
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    Cache,
    Network,
    StaleCache,
    Fallback,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Cache => "cache",
            Tier::Network => "network",
            Tier::StaleCache => "stale_cache",
            Tier::Fallback => "fallback",
        }
    }
}

/// What the gateway hands upward: the posts plus an optional, non-fatal
/// advisory when they may be out of date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedOutcome {
    pub posts: Vec<Post>,
    pub tier: Tier,
    pub advisory: Option<String>,
}

/// Result of one tier, before it is collapsed into a `FeedOutcome`.
#[derive(Debug)]
enum TierResult {
    Served(Vec<Post>, Tier),
    /// Live refresh was attempted and did not produce posts.
    Degraded(&'static str),
    /// Tier not applicable (no credentials, nothing cached).
    Skip,
}

pub struct FeedGateway {
    config: FeedConfig,
    cache: FeedCache,
    source: Option<Arc<dyn PostSource>>,
}

impl FeedGateway {
    pub fn new(
        config: FeedConfig,
        store: Arc<dyn CacheStore>,
        source: Option<Arc<dyn PostSource>>,
    ) -> Self {
        ensure_metrics_described();
        let cache = FeedCache::new(store, config.cache_ttl);
        Self {
            config,
            cache,
            source,
        }
    }

    /// File-backed cache under `config.cache_dir`; the Instagram source is
    /// wired only when both credentials are present.
    pub fn from_config(config: FeedConfig) -> Self {
        let store: Arc<dyn CacheStore> = Arc::new(FileStore::new(config.cache_dir.clone()));
        let source: Option<Arc<dyn PostSource>> = match InstagramSource::from_config(&config) {
            Ok(src) => Some(Arc::new(src)),
            Err(e) => {
                warn!(
                    error = %e,
                    "photo feed network tier disabled; serving cached or built-in posts"
                );
                None
            }
        };
        Self::new(config, store, source)
    }

    pub fn config(&self) -> &FeedConfig {
        &self.config
    }

    /// Up to `limit` posts (a zero limit is treated as one).
    pub async fn get_posts(&self, limit: usize) -> FeedOutcome {
        counter!("feed_requests_total").increment(1);
        let limit = limit.max(1);
        let now = Utc::now().timestamp_millis();

        let expired = match self.cache.read_fresh(now) {
            CacheRead::Fresh(entry) => {
                counter!("feed_cache_hits_total").increment(1);
                return self.finish(entry.take(limit), Tier::Cache, None);
            }
            CacheRead::Expired(entry) => Some(entry),
            CacheRead::Malformed | CacheRead::Missing => None,
        };

        let advisory = match self.network_tier(limit, now, expired).await {
            TierResult::Served(posts, tier) => {
                let advisory = (tier == Tier::StaleCache).then(|| STALE_ADVISORY.to_string());
                return self.finish(posts, tier, advisory);
            }
            TierResult::Degraded(reason) => {
                debug!(reason, "live refresh produced no posts");
                Some(STALE_ADVISORY.to_string())
            }
            TierResult::Skip => None,
        };

        counter!("feed_fallback_total").increment(1);
        self.finish(fallback::fallback_take(limit), Tier::Fallback, advisory)
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
        info!("photo feed cache cleared");
    }

    async fn network_tier(
        &self,
        limit: usize,
        now: i64,
        expired: Option<CacheEntry>,
    ) -> TierResult {
        let source = match (&self.source, self.config.credentials()) {
            (Some(source), Some(_)) => source,
            _ => {
                info!("photo feed credentials missing; skipping network");
                return TierResult::Skip;
            }
        };

        let want = limit.max(MIN_FETCH);
        let fetched =
            match tokio::time::timeout(self.config.fetch_timeout, source.fetch(want)).await {
                Ok(res) => res,
                Err(_) => Err(FeedError::Timeout(self.config.fetch_timeout)),
            };

        match fetched {
            Ok(posts) if !posts.is_empty() => {
                self.cache.write(&posts, now);
                TierResult::Served(posts.into_iter().take(limit).collect(), Tier::Network)
            }
            Ok(_) => TierResult::Degraded("empty response"),
            Err(e) => {
                counter!("feed_fetch_errors_total").increment(1);
                warn!(error = %e, provider = source.name(), "photo feed fetch failed");
                self.stale_tier(limit, expired)
            }
        }
    }

    /// Any stored entry regardless of age; the entry purged at the start of
    /// this request counts too.
    fn stale_tier(&self, limit: usize, expired: Option<CacheEntry>) -> TierResult {
        match self.cache.read_any().or(expired) {
            Some(entry) if !entry.posts.is_empty() => {
                counter!("feed_stale_served_total").increment(1);
                TierResult::Served(entry.take(limit), Tier::StaleCache)
            }
            _ => TierResult::Degraded("fetch failed and nothing cached"),
        }
    }

    fn finish(&self, posts: Vec<Post>, tier: Tier, advisory: Option<String>) -> FeedOutcome {
        info!(tier = tier.as_str(), count = posts.len(), "photo feed served");
        FeedOutcome {
            posts,
            tier,
            advisory,
        }
    }
}
