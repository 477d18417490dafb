#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]

//! # Overview
//!
//! `transport` delivers closed feeds. Everything the pusher needs from a
//! destination is captured by [`FeedConnection`]: send a payload, report
//! whether the destination is backlogged, and advertise the content
//! encodings and ACL features it understands.
//!
//! # Design
//!
//! - [`HttpFeedConnection`] posts feeds to the appliance's `/xmlfeed` as
//!   multipart forms with `datasource`, `feedtype` and `data` fields. It
//!   polls `/getbacklogcount` through a [`BacklogMonitor`], and caches the
//!   answers of `/getcontentencodings` and `/getdtdversion`.
//! - [`FileFeedConnection`] appends feeds to a file, [`TeeFeedConnection`]
//!   does that in front of another connection, and [`DiscardFeedConnection`]
//!   drops feeds.
//! - Response bodies are classified by [`response::classify`].
//!
//! # Invariants
//!
//! - The backlog state changes only on successful polls: it is entered at
//!   the ceiling and left below the floor.
//! - `send_data` returns a token only after it was classified as success.
//!
//! # Errors
//!
//! [`FeedError`] covers HTTP failures, refused or rejected feeds and file
//! I/O. [`FeedError::is_retryable`] separates transient failures from final
//! ones.
//!
//! # Examples
//!
//! ```
//! use feed::FeedPayload;
//! use transport::{DiscardFeedConnection, FeedConnection};
//!
//! let payload = FeedPayload::from_parts("files", "incremental", Vec::new(), 0);
//! assert_eq!(DiscardFeedConnection.send_data(&payload)?, "Success");
//! # Ok::<(), transport::FeedError>(())
//! ```

mod backlog;
mod connection;
mod error;
mod file;
mod http;
pub mod response;

pub use backlog::{
    BacklogMonitor, DEFAULT_BACKLOG_CEILING, DEFAULT_BACKLOG_FLOOR, DEFAULT_BACKLOG_INTERVAL,
};
pub use connection::{DEFAULT_CONTENT_ENCODINGS, FeedConnection};
pub use error::FeedError;
pub use file::{DiscardFeedConnection, FileFeedConnection, TeeFeedConnection};
pub use http::{
    BACKLOG_PATH, CONTENT_ENCODINGS_PATH, DTD_VERSION_PATH, FEED_PATH, HttpConfig,
    HttpFeedConnection, INHERITED_ACL_DTD_VERSION, supports_inherited_acls,
};
