//! Photo feed service binary entrypoint.
//! Boots the Axum HTTP server that serves cached Instagram posts to the
//! portfolio site.

use portfolio_feed::metrics::Metrics;
use portfolio_feed::FeedConfig;
use shuttle_axum::ShuttleAxum;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Compact logs filtered by `RUST_LOG`. The runtime may already have
/// installed a subscriber, in which case this is a no-op.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("portfolio_feed=info,warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().compact())
        .try_init();
}

#[shuttle_runtime::main]
async fn axum() -> ShuttleAxum {
    // Load .env in local/dev; no-op in prod environments.
    let _ = dotenvy::dotenv();
    init_tracing();

    let cfg = FeedConfig::load()?;
    tracing::info!(config = ?cfg, "photo feed config loaded");

    let metrics = Metrics::init(cfg.cache_ttl)?;

    let router = portfolio_feed::app(cfg).merge(metrics.router());

    Ok(router.into())
}
