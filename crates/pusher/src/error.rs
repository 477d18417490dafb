//! Failures raised by pushers and the document acceptor.

use std::io;

use feed::RecordError;
use spi::RepositoryError;
use thiserror::Error;
use transport::FeedError;
use urls::UrlError;

/// Reasons a [`Pusher`](crate::Pusher) could not handle a call.
#[derive(Debug, Error)]
pub enum PushError {
    /// The document could not be serialised.
    #[error(transparent)]
    Record(#[from] RecordError),
    /// Submitting a feed failed.
    #[error("feed submission failed: {0}")]
    Feed(#[from] FeedError),
    /// The background feed sender could not be started.
    #[error("cannot start feed sender: {0}")]
    Spawn(#[source] io::Error),
    /// The background feed sender stopped unexpectedly.
    #[error("feed sender stopped")]
    SenderStopped,
    /// A disabled pusher was flushed while holding accepted records.
    #[error("pusher is disabled; {records} accepted record(s) were not sent")]
    Discarded {
        /// Records in the dropped feed.
        records: usize,
    },
}

impl From<RepositoryError> for PushError {
    fn from(error: RepositoryError) -> Self {
        Self::Record(RecordError::Repository(error))
    }
}

impl From<UrlError> for PushError {
    fn from(error: UrlError) -> Self {
        Self::Record(RecordError::from(error))
    }
}

/// Errors surfaced by [`DocumentAcceptor`](crate::DocumentAcceptor).
///
/// Backpressure is never an error; it is waited out inside `take`.
#[derive(Debug, Error)]
pub enum AcceptorError {
    /// The document cannot be fed; skip it and continue.
    #[error("document skipped: {0}")]
    Document(#[source] RecordError),
    /// The repository failed; passed through unchanged.
    #[error(transparent)]
    Repository(RepositoryError),
    /// The feed layer failed.
    #[error(transparent)]
    Feed(PushError),
    /// A freshly created pusher refused the document as well.
    #[error("pusher is disabled")]
    Disabled,
}

impl AcceptorError {
    /// Returns `true` when only the current document is affected.
    #[must_use]
    pub const fn is_document_fatal(&self) -> bool {
        matches!(self, Self::Document(_))
    }
}

impl From<PushError> for AcceptorError {
    fn from(error: PushError) -> Self {
        match error {
            PushError::Record(RecordError::Repository(error)) if error.is_transient() => {
                Self::Repository(error)
            }
            PushError::Record(error) if error.is_document_fatal() => Self::Document(error),
            other => Self::Feed(other),
        }
    }
}
