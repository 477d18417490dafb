//! Appliance response tokens.

use crate::FeedError;

/// Token returned when a feed was accepted.
pub const SUCCESS: &str = "Success";
/// Token returned when the sending host is not allowed to feed.
pub const UNAUTHORIZED: &str = "Error - Unauthorized Request";
/// Token returned when the appliance failed internally.
pub const INTERNAL_ERROR: &str = "Internal Error";

/// Maps a response body to the outcome it reports.
///
/// Surrounding whitespace is ignored. Anything other than the three known
/// tokens is a rejection carrying the body text.
pub fn classify(response: &str) -> Result<(), FeedError> {
    match response.trim() {
        SUCCESS => Ok(()),
        UNAUTHORIZED => Err(FeedError::Unauthorized),
        INTERNAL_ERROR => Err(FeedError::Internal),
        other => Err(FeedError::Rejected(other.to_owned())),
    }
}
