//! Delivery failures.

use std::io;

use thiserror::Error;

/// Reasons a feed could not be delivered.
#[derive(Debug, Error)]
pub enum FeedError {
    /// The appliance does not accept feeds from this host.
    #[error("appliance refused the feed: unauthorized request")]
    Unauthorized,
    /// The appliance failed while accepting the feed.
    #[error("appliance reported an internal error")]
    Internal,
    /// The appliance answered with an unexpected response token.
    #[error("appliance rejected the feed: {0}")]
    Rejected(String),
    /// The appliance answered with a non-success HTTP status.
    #[error("appliance returned HTTP {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// The HTTP exchange failed.
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The configured appliance URL cannot be used.
    #[error("invalid appliance URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
    /// Writing a feed to disk failed.
    #[error("failed to write feed file: {0}")]
    Io(#[from] io::Error),
}

impl FeedError {
    /// Returns `true` when resending the same feed later may succeed.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Internal | Self::Http(_) | Self::Io(_) => true,
            Self::Status { status } => *status >= 500,
            Self::Unauthorized | Self::Rejected(_) | Self::InvalidUrl(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_side_failures_are_retryable() {
        assert!(FeedError::Internal.is_retryable());
        assert!(FeedError::Status { status: 503 }.is_retryable());
        assert!(!FeedError::Status { status: 404 }.is_retryable());
    }

    #[test]
    fn refusals_are_final() {
        assert!(!FeedError::Unauthorized.is_retryable());
        assert!(!FeedError::Rejected("Bad feed".into()).is_retryable());
    }

    #[test]
    fn messages_name_the_cause() {
        assert!(
            FeedError::Rejected("Bad datasource".into())
                .to_string()
                .contains("Bad datasource")
        );
        assert!(FeedError::Status { status: 502 }.to_string().contains("502"));
    }
}
