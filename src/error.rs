// src/error.rs
use std::time::Duration;

/// Failures inside the feed tiers. None of these reach callers of
/// `FeedGateway::get_posts`; each one moves the request to the next tier.
#[derive(Debug, thiserror::Error)]
pub enum FeedError {
    #[error("feed request timed out after {0:?}")]
    Timeout(Duration),
    #[error("feed request failed: {0}")]
    Http(#[source] reqwest::Error),
    #[error("feed endpoint returned HTTP {0}")]
    Status(u16),
    #[error("feed response could not be decoded: {0}")]
    Decode(String),
    #[error("cache storage: {0}")]
    Storage(#[from] std::io::Error),
    #[error("credentials are not configured")]
    MissingCredentials,
}

impl FeedError {
    /// Classify a reqwest failure, keeping timeouts distinct from transport errors.
    pub fn from_reqwest(e: reqwest::Error, timeout: Duration) -> Self {
        if e.is_timeout() {
            FeedError::Timeout(timeout)
        } else if e.is_decode() {
            FeedError::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            FeedError::Status(status.as_u16())
        } else {
            FeedError::Http(e)
        }
    }
}

pub type FeedResult<T> = Result<T, FeedError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_messages_are_readable() {
        assert_eq!(
            FeedError::Status(503).to_string(),
            "feed endpoint returned HTTP 503"
        );
        assert_eq!(
            FeedError::Timeout(Duration::from_secs(10)).to_string(),
            "feed request timed out after 10s"
        );
    }

    #[test]
    fn io_errors_convert_to_storage() {
        let err: FeedError =
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "ro fs").into();
        assert!(matches!(err, FeedError::Storage(_)));
        assert_eq!(err.to_string(), "cache storage: ro fs");
    }
}
