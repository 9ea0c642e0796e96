use serde::{Deserialize, Serialize};
use shuttle_axum::axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tower_http::cors::CorsLayer;

use crate::feed::status::{FeedHandle, FeedStatus};
use crate::feed::types::Post;
use crate::feed::Tier;
use crate::format::{format_relative_time, truncate_caption};

/// Upper bound for `?limit=`.
pub const MAX_LIMIT: usize = 50;
pub const CAPTION_PREVIEW_LEN: usize = 100;

#[derive(Clone)]
pub struct AppState {
    pub feed: FeedHandle,
    pub default_limit: usize,
}

impl AppState {
    pub fn new(feed: FeedHandle) -> Self {
        let default_limit = feed.gateway().config().default_limit;
        Self {
            feed,
            default_limit,
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route("/posts", get(get_posts))
        .route("/posts/status", get(get_status))
        .route("/cache/clear", post(clear_cache))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

#[derive(Deserialize)]
struct PostsQuery {
    limit: Option<usize>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PostView {
    #[serde(flatten)]
    post: Post,
    caption_preview: Option<String>,
    relative_time: String,
}

impl From<Post> for PostView {
    fn from(post: Post) -> Self {
        Self {
            caption_preview: post
                .caption
                .as_deref()
                .map(|c| truncate_caption(c, CAPTION_PREVIEW_LEN)),
            relative_time: format_relative_time(&post.timestamp),
            post,
        }
    }
}

#[derive(Serialize)]
struct PostsResp {
    posts: Vec<PostView>,
    tier: Tier,
    advisory: Option<String>,
}

async fn get_posts(State(state): State<AppState>, Query(q): Query<PostsQuery>) -> Response {
    let limit = q
        .limit
        .unwrap_or(state.default_limit)
        .clamp(1, MAX_LIMIT);

    match state.feed.refetch(limit).await {
        Some(outcome) => Json(PostsResp {
            posts: outcome.posts.into_iter().map(PostView::from).collect(),
            tier: outcome.tier,
            advisory: outcome.advisory,
        })
        .into_response(),
        None => (StatusCode::SERVICE_UNAVAILABLE, Json(state.feed.status())).into_response(),
    }
}

async fn get_status(State(state): State<AppState>) -> Json<FeedStatus> {
    Json(state.feed.status())
}

async fn clear_cache(State(state): State<AppState>) -> StatusCode {
    state.feed.clear_cache();
    StatusCode::NO_CONTENT
}
