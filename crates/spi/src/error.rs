//! Errors reported by connectors while a document is being read.

use thiserror::Error;

/// Failure raised by a connector when a property is accessed.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum RepositoryError {
    /// The backing repository is temporarily unavailable. The whole batch
    /// should be retried later; this error must never be downgraded to a
    /// per-document failure.
    #[error("transient repository failure: {0}")]
    Transient(String),
    /// This document cannot be read; other documents are unaffected.
    #[error("document cannot be read: {0}")]
    Document(String),
}

impl RepositoryError {
    /// Returns `true` when the failure is a transient backend outage.
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Transient(_))
    }
}
