//! Pusher and retry settings.

use std::time::Duration;

use spi::FeedType;

/// Default size a feed may grow to before it is submitted.
pub const DEFAULT_MAX_FEED_SIZE: usize = 10 * 1024 * 1024;
/// Default largest content stream pushed as-is.
pub const DEFAULT_MAX_DOCUMENT_SIZE: u64 = 30 * 1024 * 1024;
/// Default number of closed feeds allowed to wait for submission.
pub const DEFAULT_MAX_FEEDS_IN_FLIGHT: usize = 10;
/// Default bytes allowed in closed feeds waiting for submission.
pub const DEFAULT_MAX_IN_FLIGHT_BYTES: usize = 64 * 1024 * 1024;

/// Settings for [`DocPusher`](crate::DocPusher).
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PusherConfig {
    /// Feed size at which a feed is closed and submitted.
    pub max_feed_size: usize,
    /// Content longer than this is replaced by alternate content.
    pub max_document_size: u64,
    /// Use `base64compressed` when the destination supports it.
    pub use_compression: bool,
    /// Emit a log-friendly copy of every submitted feed.
    pub feed_logging: bool,
    /// Closed feeds allowed to wait before reporting a local backlog.
    pub max_feeds_in_flight: usize,
    /// Bytes in waiting feeds allowed before reporting low memory.
    pub max_in_flight_bytes: usize,
    /// Prefix for `contenturl` record URLs.
    pub content_url_prefix: Option<String>,
    /// Feed type of documents that do not name one.
    pub default_feed_type: FeedType,
    /// Strip every ACL property before serialisation.
    pub strip_acls: bool,
}

impl Default for PusherConfig {
    fn default() -> Self {
        Self {
            max_feed_size: DEFAULT_MAX_FEED_SIZE,
            max_document_size: DEFAULT_MAX_DOCUMENT_SIZE,
            use_compression: true,
            feed_logging: false,
            max_feeds_in_flight: DEFAULT_MAX_FEEDS_IN_FLIGHT,
            max_in_flight_bytes: DEFAULT_MAX_IN_FLIGHT_BYTES,
            content_url_prefix: None,
            default_feed_type: FeedType::Content,
            strip_acls: false,
        }
    }
}

impl PusherConfig {
    /// Sets the feed size at which feeds are submitted.
    #[must_use]
    pub const fn with_max_feed_size(mut self, bytes: usize) -> Self {
        self.max_feed_size = bytes;
        self
    }

    /// Sets the content size limit.
    #[must_use]
    pub const fn with_max_document_size(mut self, bytes: u64) -> Self {
        self.max_document_size = bytes;
        self
    }

    /// Enables or disables compressed content.
    #[must_use]
    pub const fn with_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Enables or disables feed logging.
    #[must_use]
    pub const fn with_feed_logging(mut self, enabled: bool) -> Self {
        self.feed_logging = enabled;
        self
    }

    /// Sets how many closed feeds may wait before [`LocalFeedBacklog`] is
    /// reported.
    ///
    /// [`LocalFeedBacklog`]: crate::PusherStatus::LocalFeedBacklog
    #[must_use]
    pub const fn with_max_feeds_in_flight(mut self, feeds: usize) -> Self {
        self.max_feeds_in_flight = feeds;
        self
    }

    /// Sets how many waiting bytes trigger [`LowMemory`].
    ///
    /// [`LowMemory`]: crate::PusherStatus::LowMemory
    #[must_use]
    pub const fn with_max_in_flight_bytes(mut self, bytes: usize) -> Self {
        self.max_in_flight_bytes = bytes;
        self
    }

    /// Sets the prefix of `contenturl` record URLs.
    #[must_use]
    pub fn with_content_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.content_url_prefix = Some(prefix.into());
        self
    }

    /// Sets the feed type of documents without `google:feedtype`.
    #[must_use]
    pub const fn with_default_feed_type(mut self, feed_type: FeedType) -> Self {
        self.default_feed_type = feed_type;
        self
    }

    /// Enables or disables ACL stripping.
    #[must_use]
    pub const fn with_strip_acls(mut self, strip: bool) -> Self {
        self.strip_acls = strip;
        self
    }
}

/// How long [`DocumentAcceptor`](crate::DocumentAcceptor) waits out
/// backpressure.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RetryPolicy {
    /// Status checks made before giving up on one `take`.
    pub retry_count: u32,
    /// Pause for local pressure.
    pub short_sleep: Duration,
    /// Pause for an appliance backlog.
    pub long_sleep: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            retry_count: 10,
            short_sleep: Duration::from_secs(1),
            long_sleep: Duration::from_secs(5 * 60),
        }
    }
}

impl RetryPolicy {
    /// Sets the number of status checks per `take`.
    #[must_use]
    pub const fn with_retry_count(mut self, count: u32) -> Self {
        self.retry_count = count;
        self
    }

    /// Sets the short and long pauses.
    #[must_use]
    pub const fn with_sleeps(mut self, short: Duration, long: Duration) -> Self {
        self.short_sleep = short;
        self.long_sleep = long;
        self
    }
}
