#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `urls` derives the canonical URL of a feed record. A document either
//! names its URL explicitly through `google:searchurl`, or the URL is
//! fabricated from its docid according to the document's [`FeedType`]:
//!
//! - `web`: the docid is the URL, unchanged by any fragment.
//! - `content`: a synthetic connector URL,
//!   `googleconnector://<datasource>.localhost/doc?docid=<id>`.
//! - `contenturl`: a content-retrieval URL built from a configured prefix
//!   plus `ConnectorName` and `docid` query parameters.
//!
//! The same fabrication produces `google:aclinheritfrom` URLs from the
//! `google:aclinheritfrom:docid` triple.
//!
//! # Invariants
//!
//! - Fabricated URLs depend only on the data source, feed type, docid and
//!   fragment, so the same inputs always produce the same URL.
//! - Fragments are never emitted as true URL fragments for `content` and
//!   `contenturl` URLs because the appliance strips them; they are appended
//!   as an extra query parameter instead.
//! - A fragment on a non-ACL document of feed type `content` is rejected.
//! - ACL documents skip URL syntax validation: an ACL identifier need not be
//!   dereferenceable.
//!
//! # Errors
//!
//! [`UrlError`] reports missing docids, malformed explicit URLs, invalid
//! fragment use and a missing content URL prefix. Repository failures raised
//! while reading properties pass through as [`UrlError::Repository`].
//!
//! # Examples
//!
//! ```
//! use spi::{FeedType, SimpleDocument, names};
//! use urls::UrlConstructor;
//!
//! let constructor = UrlConstructor::new("files", FeedType::Content);
//! let document = SimpleDocument::new().with_string(names::DOCID, "reports/q1");
//!
//! assert_eq!(
//!     constructor.record_url(&document)?,
//!     "googleconnector://files.localhost/doc?docid=reports%2Fq1"
//! );
//! # Ok::<(), urls::UrlError>(())
//! ```

mod constructor;
mod error;
mod validate;

pub use constructor::{CONNECTOR_URL_SCHEME, UrlConstructor};
pub use error::UrlError;
pub use validate::is_valid_url;

pub use spi::FeedType;
