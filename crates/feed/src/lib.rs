#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `feed` serializes documents into the appliance's `gsafeed` XML format.
//! A [`Feed`] accumulates records for one data source and feed type; once it
//! [`is_full`](Feed::is_full) or the caller flushes, it is closed and turned
//! into a [`FeedPayload`] for the transport.
//!
//! # Wire format
//!
//! ```text
//! <?xml version='1.0' encoding='UTF-8'?>
//! <!DOCTYPE gsafeed PUBLIC "-//Google//DTD GSA Feeds//EN" "gsafeed.dtd">
//! <gsafeed>
//! <header><datasource>ds</datasource><feedtype>incremental</feedtype></header>
//! <group>
//! <record url="..." mimetype="text/html" ...>
//! <metadata><meta name="..." content="..."/></metadata>
//! <content encoding="base64binary">...</content>
//! </record>
//! </group>
//! </gsafeed>
//! ```
//!
//! # Design
//!
//! - Records are built in two steps. The start tag and metadata are rendered
//!   into a small string first; content is then streamed from the caller's
//!   reader through the base64 (and optionally zlib) encoders straight into
//!   the feed's [`FeedBuffer`], so content is never copied twice.
//! - [`FeedBuffer`] grows by doubling until increments reach 8 MiB and then
//!   grows linearly.
//! - ACL scopes are written with their roles folded in using
//!   [`filters::acl::merged_acl`].
//!
//! # Invariants
//!
//! - The prologue is written once at construction and the footer once at
//!   [`Feed::close`]; closing twice is a no-op and a closed feed rejects
//!   records.
//! - A failed [`Feed::add_record`] leaves the bytes, the log copy and the
//!   record count exactly as they were.
//! - Deletes carry neither metadata nor content; `metadata-and-url` feeds
//!   never read content streams.
//!
//! # Errors
//!
//! [`RecordError`] distinguishes document-fatal failures (skip the document)
//! from transient repository failures that must reach the caller unchanged;
//! see [`RecordError::is_document_fatal`].
//!
//! # Examples
//!
//! ```
//! use feed::{ContentEncoding, Feed};
//! use spi::{FeedType, SimpleDocument, names};
//!
//! let mut feed = Feed::new("files", FeedType::Content, 1024 * 1024);
//! let document = SimpleDocument::new()
//!     .with_string(names::DOCID, "readme")
//!     .with_string("author", "joe");
//! let mut content: &[u8] = b"hello";
//! feed.add_record(&document, Some(&mut content), ContentEncoding::Base64Binary)?;
//!
//! let payload = feed.into_payload();
//! let xml = payload.xml();
//! assert!(xml.contains(r#"<meta name="author" content="joe"/>"#));
//! assert!(xml.contains(r#"<content encoding="base64binary">aGVsbG8=</content>"#));
//! assert!(xml.ends_with("</gsafeed>\n"));
//! # Ok::<(), feed::RecordError>(())
//! ```

mod buffer;
mod encoding;
mod error;
pub mod escape;
mod feed;
mod payload;
mod record;

pub use buffer::{FeedBuffer, INITIAL_CAPACITY, MAX_GROWTH_INCREMENT};
pub use encoding::ContentEncoding;
pub use error::RecordError;
pub use feed::{CONTENT_PLACEHOLDER, Feed};
pub use payload::FeedPayload;
pub use record::AUTHMETHOD_HTTPBASIC;
