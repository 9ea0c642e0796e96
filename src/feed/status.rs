// src/feed/status.rs
use std::sync::{Arc, Mutex, MutexGuard};

use serde::Serialize;
use tracing::error;

use crate::feed::types::Post;
use crate::feed::{FeedGateway, FeedOutcome};

pub const LOAD_ERROR: &str = "Failed to load photos.";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FeedStatus {
    pub loading: bool,
    pub error: Option<String>,
}

#[derive(Debug, Default)]
struct HandleState {
    status: FeedStatus,
    // `loading` holds while any refetch is outstanding.
    in_flight: usize,
    last: Option<FeedOutcome>,
}

/// Shared view of the feed for the UI layer: last posts plus a
/// loading/error pair.
#[derive(Clone)]
pub struct FeedHandle {
    gateway: Arc<FeedGateway>,
    state: Arc<Mutex<HandleState>>,
}

impl FeedHandle {
    pub fn new(gateway: FeedGateway) -> Self {
        Self::from_shared(Arc::new(gateway))
    }

    pub fn from_shared(gateway: Arc<FeedGateway>) -> Self {
        Self {
            gateway,
            state: Arc::new(Mutex::new(HandleState::default())),
        }
    }

    pub fn gateway(&self) -> &FeedGateway {
        &self.gateway
    }

    /// Run `get_posts` on its own task. A panic inside the gateway surfaces
    /// as `error`; the previously loaded posts stay in place.
    pub async fn refetch(&self, limit: usize) -> Option<FeedOutcome> {
        {
            let mut st = self.lock();
            st.in_flight += 1;
            st.status.loading = true;
        }

        let gateway = Arc::clone(&self.gateway);
        let joined = tokio::spawn(async move { gateway.get_posts(limit).await }).await;

        let mut st = self.lock();
        st.in_flight = st.in_flight.saturating_sub(1);
        st.status.loading = st.in_flight > 0;
        match joined {
            Ok(outcome) => {
                st.status.error = None;
                st.last = Some(outcome.clone());
                Some(outcome)
            }
            Err(e) => {
                error!(error = %e, "photo feed load aborted");
                st.status.error = Some(LOAD_ERROR.to_string());
                None
            }
        }
    }

    pub fn clear_cache(&self) {
        self.gateway.clear_cache();
    }

    pub fn status(&self) -> FeedStatus {
        self.lock().status.clone()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.lock()
            .last
            .as_ref()
            .map(|o| o.posts.clone())
            .unwrap_or_default()
    }

    pub fn advisory(&self) -> Option<String> {
        self.lock().last.as_ref().and_then(|o| o.advisory.clone())
    }

    fn lock(&self) -> MutexGuard<'_, HandleState> {
        match self.state.lock() {
            Ok(g) => g,
            Err(poison) => poison.into_inner(),
        }
    }
}
