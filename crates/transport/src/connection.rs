use std::sync::Arc;

use feed::FeedPayload;

use crate::FeedError;

/// Content encodings every appliance accepts.
pub const DEFAULT_CONTENT_ENCODINGS: &str = "base64binary";

/// Destination of closed feeds.
///
/// Implementations are shared between the pusher and its sender thread and
/// must therefore be thread safe.
pub trait FeedConnection: Send + Sync {
    /// Delivers `payload` and returns the appliance's response token.
    ///
    /// A returned token has already been classified as success.
    fn send_data(&self, payload: &FeedPayload) -> Result<String, FeedError>;

    /// Returns `true` while the appliance is too far behind to accept more
    /// feeds.
    fn is_backlogged(&self) -> bool;

    /// Returns the comma-separated content encodings the destination accepts.
    fn content_encodings(&self) -> String {
        DEFAULT_CONTENT_ENCODINGS.to_owned()
    }

    /// Returns `true` when the destination understands inherited ACLs.
    fn supports_inherited_acls(&self) -> bool {
        true
    }
}

impl<C: FeedConnection + ?Sized> FeedConnection for Arc<C> {
    fn send_data(&self, payload: &FeedPayload) -> Result<String, FeedError> {
        (**self).send_data(payload)
    }

    fn is_backlogged(&self) -> bool {
        (**self).is_backlogged()
    }

    fn content_encodings(&self) -> String {
        (**self).content_encodings()
    }

    fn supports_inherited_acls(&self) -> bool {
        (**self).supports_inherited_acls()
    }
}

impl<C: FeedConnection + ?Sized> FeedConnection for Box<C> {
    fn send_data(&self, payload: &FeedPayload) -> Result<String, FeedError> {
        (**self).send_data(payload)
    }

    fn is_backlogged(&self) -> bool {
        (**self).is_backlogged()
    }

    fn content_encodings(&self) -> String {
        (**self).content_encodings()
    }

    fn supports_inherited_acls(&self) -> bool {
        (**self).supports_inherited_acls()
    }
}
