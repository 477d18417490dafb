#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `filters` rewrites documents on their way into a feed without copying
//! them. A [`DocumentFilter`] answers property lookups on behalf of the
//! document it wraps, either passing them through, synthesising new values
//! or hiding properties altogether. A [`DocumentFilterChain`] decides per
//! document which filters apply and stacks them into a [`FilteredDocument`].
//!
//! # Design
//!
//! - Chains are ordered lists of predicate and filter pairs. Predicates are
//!   evaluated once, against the source document's property names, when
//!   [`DocumentFilterChain::compose`] runs; the result is a concrete pipeline
//!   for that one document.
//! - Filters never materialise documents. Every lookup on a
//!   [`FilteredDocument`] flows through the stacked filters, so the innermost
//!   filter sees the source and each later filter sees the output of the
//!   filters before it.
//! - [`DocumentFilterChain::acl`] assembles the standard chain: inherit-from
//!   synthesis ([`AclInheritFromDocidFilter`]), then legacy role merging
//!   ([`AclRolesFilter`]), then optionally [`StripAclFilter`].
//!
//! # Invariants
//!
//! - Stage order is preserved: a filter added earlier is applied first.
//! - ACL merging keeps the original scope order; a scope carrying several
//!   roles expands to one `scope=role` entry per role and blank scopes are
//!   dropped.
//! - Repository errors raised by the source document pass through filters
//!   unchanged.
//!
//! # Examples
//!
//! ```
//! use filters::DocumentFilterChain;
//! use spi::{Document, FeedType, SimpleDocument, find_string, names};
//! use urls::UrlConstructor;
//!
//! let chain = DocumentFilterChain::acl(UrlConstructor::new("files", FeedType::Content), None);
//! let source = SimpleDocument::new()
//!     .with_string(names::DOCID, "child")
//!     .with_string(names::ACLINHERITFROM_DOCID, "parent");
//!
//! let document = chain.compose(&source)?;
//! assert_eq!(
//!     find_string(&document, names::ACLINHERITFROM)?.as_deref(),
//!     Some("googleconnector://files.localhost/doc?docid=parent"),
//! );
//! assert!(document.find_property(names::ACLINHERITFROM_DOCID)?.is_none());
//! # Ok::<(), spi::RepositoryError>(())
//! ```

pub mod acl;
mod chain;
mod filter;
mod inherit;
mod roles;
mod strip;

pub use chain::DocumentFilterChain;
pub use filter::{DocumentFilter, FilteredDocument};
pub use inherit::AclInheritFromDocidFilter;
pub use roles::AclRolesFilter;
pub use strip::{StripAclFilter, StripMode};
