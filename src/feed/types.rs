// src/feed/types.rs
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::error::FeedResult;

/// Kind of media behind a post. Only `Image` is rendered by the site; the
/// others are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaKind {
    Image,
    Video,
    CarouselAlbum,
    Other(String),
}

impl MediaKind {
    /// Map the upstream `media_type` tag (`IMAGE`, `VIDEO`, `CAROUSEL_ALBUM`).
    pub fn from_api(tag: &str) -> Self {
        match tag.trim().to_ascii_uppercase().as_str() {
            "IMAGE" => MediaKind::Image,
            "VIDEO" => MediaKind::Video,
            "CAROUSEL_ALBUM" => MediaKind::CarouselAlbum,
            other => MediaKind::Other(other.to_ascii_lowercase()),
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, MediaKind::Image)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub caption: Option<String>,
    pub media_kind: MediaKind,
    pub media_url: String,
    pub permalink: String,
    pub timestamp: String, // ISO-8601, as received
}

/// The one persisted batch. `posts` keep the upstream order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CacheEntry {
    pub posts: Vec<Post>,
    pub fetched_at: i64, // epoch millis
}

impl CacheEntry {
    pub fn new(posts: Vec<Post>, fetched_at: i64) -> Self {
        Self { posts, fetched_at }
    }

    /// Fresh iff `now - fetched_at < ttl`.
    pub fn is_fresh(&self, now_ms: i64, ttl: Duration) -> bool {
        let ttl_ms = i64::try_from(ttl.as_millis()).unwrap_or(i64::MAX);
        now_ms.saturating_sub(self.fetched_at) < ttl_ms
    }

    pub fn take(&self, limit: usize) -> Vec<Post> {
        self.posts.iter().take(limit).cloned().collect()
    }
}

/// A remote listing of posts, newest first as the upstream returns them.
#[async_trait::async_trait]
pub trait PostSource: Send + Sync {
    async fn fetch(&self, count: usize) -> FeedResult<Vec<Post>>;
    fn name(&self) -> &'static str;
}
