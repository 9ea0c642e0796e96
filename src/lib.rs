// src/lib.rs
// Public library surface for the binary and integration tests.

pub mod api;
pub mod config;
pub mod error;
pub mod feed;
pub mod format;
pub mod metrics;

// ---- Re-exports for stable public API ----
pub use crate::api::router;
pub use crate::config::FeedConfig;
pub use crate::error::FeedError;
pub use crate::feed::status::{FeedHandle, FeedStatus};
pub use crate::feed::types::{CacheEntry, MediaKind, Post, PostSource};
pub use crate::feed::{FeedGateway, FeedOutcome, Tier};
pub use crate::format::{format_relative_time, truncate_caption};

use shuttle_axum::axum::Router;

/// Build the HTTP app (without `/metrics`) the same way the binary does.
pub fn app(cfg: FeedConfig) -> Router {
    let handle = FeedHandle::new(FeedGateway::from_config(cfg));
    api::router(api::AppState::new(handle))
}
