// src/feed/fallback.rs
//! Built-in demo posts shown when neither the cache nor the network can
//! provide anything.

use once_cell::sync::Lazy;

use crate::feed::types::{MediaKind, Post};

static FALLBACK_POSTS: Lazy<Vec<Post>> = Lazy::new(|| {
    let items: [(&str, &str, &str, &str); 8] = [
        (
            "demo-1",
            "Golden hour over the old harbour. Long exposure, no filters.",
            "photo-1500530855697-b586d89ba3ee",
            "2024-06-14T19:42:00+0000",
        ),
        (
            "demo-2",
            "Fog rolling through the pines on an early morning hike.",
            "photo-1441974231531-c6227db76b6e",
            "2024-05-30T06:15:00+0000",
        ),
        (
            "demo-3",
            "Street corners and neon reflections after the rain.",
            "photo-1519501025264-65ba15a82390",
            "2024-05-11T22:08:00+0000",
        ),
        (
            "demo-4",
            "Alpine lake, completely still. Worth every switchback.",
            "photo-1506905925346-21bda4d32df4",
            "2024-04-27T11:30:00+0000",
        ),
        (
            "demo-5",
            "Coffee, notebook, and a stubborn bug that finally gave up.",
            "photo-1495474472287-4d71bcdd2085",
            "2024-04-09T08:05:00+0000",
        ),
        (
            "demo-6",
            "Desert road trip. Nothing but horizon for three hours.",
            "photo-1509316785289-025f5b846b35",
            "2024-03-22T16:47:00+0000",
        ),
        (
            "demo-7",
            "Late train home, city lights sliding past the window.",
            "photo-1474487548417-781cb71495f3",
            "2024-03-02T21:20:00+0000",
        ),
        (
            "demo-8",
            "First snow on the rooftops.",
            "photo-1483664852095-d6cc6870702d",
            "2024-01-18T07:55:00+0000",
        ),
    ];

    items
        .into_iter()
        .map(|(id, caption, photo, ts)| Post {
            id: id.to_string(),
            caption: Some(caption.to_string()),
            media_kind: MediaKind::Image,
            media_url: format!("https://images.unsplash.com/{photo}?w=800&q=80"),
            permalink: "https://www.instagram.com/".to_string(),
            timestamp: ts.to_string(),
        })
        .collect()
});

pub fn fallback_posts() -> &'static [Post] {
    &FALLBACK_POSTS
}

/// First `limit` demo posts. Never fails.
pub fn fallback_take(limit: usize) -> Vec<Post> {
    FALLBACK_POSTS.iter().take(limit).cloned().collect()
}
