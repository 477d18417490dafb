//! Failures raised while serialising a record.

use std::io;

use spi::RepositoryError;
use thiserror::Error;
use urls::UrlError;

/// Reasons a document could not be added to a feed.
///
/// Whatever the variant, the feed is left exactly as it was before the
/// failed [`add_record`](crate::Feed::add_record) call.
#[derive(Debug, Error)]
pub enum RecordError {
    /// The record URL could not be derived.
    #[error("cannot determine record URL: {0}")]
    Url(UrlError),
    /// Reading or encoding the content stream failed.
    #[error("failed to read document content: {0}")]
    Content(#[source] io::Error),
    /// The content stream exceeded the configured document size limit.
    #[error("document content exceeds {limit} bytes")]
    ContentTooLarge {
        /// The configured limit in bytes.
        limit: u64,
    },
    /// A property accessor failed.
    #[error(transparent)]
    Repository(RepositoryError),
    /// The feed was already closed.
    #[error("feed is closed")]
    Closed,
}

impl RecordError {
    /// Returns `true` for failures confined to the one document: the caller
    /// should skip it and keep feeding.
    ///
    /// Transient repository failures and a closed feed are not document
    /// fatal.
    #[must_use]
    pub fn is_document_fatal(&self) -> bool {
        match self {
            Self::Url(_) | Self::Content(_) | Self::ContentTooLarge { .. } => true,
            Self::Repository(error) => !error.is_transient(),
            Self::Closed => false,
        }
    }
}

impl From<UrlError> for RecordError {
    fn from(error: UrlError) -> Self {
        match error {
            UrlError::Repository(error) => Self::Repository(error),
            other => Self::Url(other),
        }
    }
}

impl From<RepositoryError> for RecordError {
    fn from(error: RepositoryError) -> Self {
        Self::Repository(error)
    }
}
