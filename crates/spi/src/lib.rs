#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `spi` defines the document model that upstream content connectors hand to
//! the feed pipeline. A [`Document`] is an unordered set of named,
//! multi-valued [`Property`] entries whose values are typed [`Value`]s.
//! Property access is fallible: connectors report backend failures through
//! [`RepositoryError`], distinguishing transient outages (retry the batch
//! later) from problems with a single document (skip it).
//!
//! # Design
//!
//! - [`Document`] is object safe so filter chains can wrap documents behind
//!   `&dyn Document` without materialising copies.
//! - Binary values are reopenable [`ContentSource`]s rather than one-shot
//!   streams. Wrapping filters may therefore inspect a document without
//!   consuming the content the serializer later streams into a feed.
//! - Well-known property names live in [`names`]; they mirror the names used
//!   by the appliance's feed protocol (`google:docid`, `google:aclusers`, ...).
//!
//! # Examples
//!
//! ```
//! use spi::{Document, SimpleDocument, names};
//!
//! let document = SimpleDocument::new()
//!     .with_string(names::DOCID, "doc-1")
//!     .with_strings(names::ACLUSERS, ["joe", "mary"]);
//!
//! let users = document.find_property(names::ACLUSERS)?.expect("present");
//! assert_eq!(users.len(), 2);
//! # Ok::<(), spi::RepositoryError>(())
//! ```

mod action;
mod document;
mod error;
mod feed_type;
pub mod names;
mod simple;
mod value;

pub use action::ActionType;
pub use document::{
    Document, find_boolean, find_date, find_first, find_string, is_acl_document,
};
pub use error::RepositoryError;
pub use feed_type::{FeedType, ParseFeedTypeError};
pub use simple::SimpleDocument;
pub use value::{BinaryValue, ContentSource, FileContent, Property, Value};
