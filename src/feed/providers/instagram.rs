// src/feed/providers/instagram.rs
use async_trait::async_trait;
use metrics::histogram;
use serde::Deserialize;
use std::collections::HashSet;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::{Credentials, FeedConfig};
use crate::error::{FeedError, FeedResult};
use crate::feed::types::{MediaKind, Post, PostSource};

const FIELDS: &str = "id,caption,media_type,media_url,permalink,timestamp,thumbnail_url";

#[derive(Debug, Deserialize)]
struct MediaPage {
    #[serde(default)]
    data: Vec<MediaItem>,
}

#[derive(Debug, Deserialize)]
struct MediaItem {
    id: String,
    caption: Option<String>,
    media_type: Option<String>,
    media_url: Option<String>,
    thumbnail_url: Option<String>,
    permalink: Option<String>,
    timestamp: Option<String>,
}

impl MediaItem {
    fn into_post(self) -> Option<Post> {
        let media_kind = self
            .media_type
            .as_deref()
            .map(MediaKind::from_api)
            .unwrap_or(MediaKind::Image);

        // Videos render their poster frame.
        let media_url = match media_kind {
            MediaKind::Video => self.thumbnail_url.or(self.media_url),
            _ => self.media_url.or(self.thumbnail_url),
        }
        .filter(|u| !u.trim().is_empty())?;

        Some(Post {
            permalink: self.permalink.unwrap_or_default(),
            timestamp: self.timestamp.unwrap_or_default(),
            id: self.id,
            caption: self.caption,
            media_kind,
            media_url,
        })
    }
}

/// Map a media-listing response body into posts, keeping response order.
/// Items without a displayable url and repeated ids are dropped.
pub fn parse_media_response(body: &str) -> FeedResult<Vec<Post>> {
    let page: MediaPage =
        serde_json::from_str(body).map_err(|e| FeedError::Decode(e.to_string()))?;

    let total = page.data.len();
    let mut seen = HashSet::with_capacity(total);
    let posts: Vec<Post> = page
        .data
        .into_iter()
        .filter_map(MediaItem::into_post)
        .filter(|p| seen.insert(p.id.clone()))
        .collect();
    if posts.len() < total {
        debug!(skipped = total - posts.len(), "media items dropped");
    }
    Ok(posts)
}

/// Media listing from the Instagram Graph API.
pub struct InstagramSource {
    client: reqwest::Client,
    api_base: String,
    credentials: Credentials,
    timeout: Duration,
}

impl InstagramSource {
    pub fn new(api_base: impl Into<String>, credentials: Credentials, timeout: Duration) -> Self {
        let client = reqwest::Client::builder()
            .user_agent("portfolio-feed/0.1")
            .timeout(timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!(error = %e, "http client build failed; using defaults without timeout");
                reqwest::Client::new()
            });
        Self {
            client,
            api_base: api_base.into().trim_end_matches('/').to_string(),
            credentials,
            timeout,
        }
    }

    /// `Err(MissingCredentials)` unless both halves are configured.
    pub fn from_config(cfg: &FeedConfig) -> FeedResult<Self> {
        let creds = cfg.credentials().ok_or(FeedError::MissingCredentials)?;
        Ok(Self::new(cfg.api_base.clone(), creds, cfg.fetch_timeout))
    }

    fn endpoint(&self) -> String {
        format!("{}/{}/media", self.api_base, self.credentials.account_id)
    }

    async fn fetch_body(&self, count: usize) -> FeedResult<String> {
        let limit = count.to_string();
        let resp = self
            .client
            .get(self.endpoint())
            .timeout(self.timeout)
            .query(&[
                ("fields", FIELDS),
                ("limit", limit.as_str()),
                ("access_token", self.credentials.access_token.as_str()),
            ])
            .send()
            .await
            // the URL carries the access token
            .map_err(|e| FeedError::from_reqwest(e.without_url(), self.timeout))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FeedError::Status(status.as_u16()));
        }
        resp.text()
            .await
            .map_err(|e| FeedError::from_reqwest(e.without_url(), self.timeout))
    }
}

#[async_trait]
impl PostSource for InstagramSource {
    async fn fetch(&self, count: usize) -> FeedResult<Vec<Post>> {
        let t0 = Instant::now();
        let res = match self.fetch_body(count).await {
            Ok(body) => parse_media_response(&body),
            Err(e) => Err(e),
        };
        histogram!("feed_fetch_ms").record(t0.elapsed().as_secs_f64() * 1_000.0);

        if let Err(e) = &res {
            debug!(error = %e, provider = self.name(), "graph api request failed");
        }
        res
    }

    fn name(&self) -> &'static str {
        "instagram"
    }
}
