//! Error type for record URL construction.

use spi::RepositoryError;
use thiserror::Error;

/// Reasons a record URL cannot be produced.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum UrlError {
    /// The document has neither an explicit URL nor a docid.
    #[error("document has no docid and no search URL")]
    MissingDocid,
    /// The explicit search URL does not parse.
    #[error("malformed search URL '{0}'")]
    Malformed(String),
    /// A fragment was supplied for a plain content-feed document.
    #[error("fragment '{fragment}' is not allowed for content document '{docid}'")]
    FragmentNotAllowed {
        /// Docid of the offending document.
        docid: String,
        /// Fragment that was supplied.
        fragment: String,
    },
    /// Feed type `contenturl` requires a content URL prefix.
    #[error("content URL feeds require a non-empty content URL prefix")]
    MissingContentUrlPrefix,
    /// Reading a property failed.
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}
