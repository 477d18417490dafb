#![deny(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]
#![warn(missing_docs)]

//! # Overview
//!
//! `pusher` connects a traversal loop to the feed pipeline. The loop hands
//! documents to a [`DocumentAcceptor`]; the acceptor forwards them to a
//! [`Pusher`] and turns the pusher's [`PusherStatus`] into bounded waiting,
//! so a producer that outruns the appliance slows down instead of growing an
//! unbounded queue.
//!
//! # Design
//!
//! - [`DocPusher`] runs each document through the ACL
//!   [`DocumentFilterChain`](filters::DocumentFilterChain), picks content
//!   (or alternate content) and appends the record to the open
//!   [`Feed`](feed::Feed). Full feeds, feed type changes and flushes close
//!   the feed and queue it on a background sender thread.
//! - The sender thread receives closed feeds over a `crossbeam-channel` and
//!   hands them to the [`FeedConnection`](transport::FeedConnection) in
//!   order. Queue depth and queued bytes become
//!   [`PusherStatus::LocalFeedBacklog`] and [`PusherStatus::LowMemory`]; the
//!   connection's backlog flag becomes [`PusherStatus::GsaFeedBacklog`].
//! - [`DocumentAcceptor`] creates pushers through a [`PusherFactory`] and
//!   waits out backpressure according to a [`RetryPolicy`]. Waits can be
//!   ended early through an [`InterruptHandle`].
//!
//! # Invariants
//!
//! - Records reach the wire in the order documents were taken.
//! - A document that fails to serialise leaves the open feed untouched.
//! - After [`DocumentAcceptor::cancel`] nothing accepted earlier is sent and
//!   the next `take` starts a new feed.
//! - Waiting inside `take` never exceeds `retry_count` pauses.
//!
//! # Errors
//!
//! [`PushError`] reports pusher failures; [`AcceptorError`] sorts them into
//! document-fatal failures, transient repository failures (passed through
//! unchanged) and feed failures.
//!
//! # Examples
//!
//! ```
//! use std::sync::Arc;
//!
//! use pusher::{DocPusherFactory, DocumentAcceptor, PusherConfig};
//! use spi::{SimpleDocument, names};
//! use transport::DiscardFeedConnection;
//!
//! let factory = DocPusherFactory::new(Arc::new(DiscardFeedConnection), PusherConfig::default());
//! let acceptor = DocumentAcceptor::new("files", factory);
//!
//! let document = SimpleDocument::new()
//!     .with_string(names::DOCID, "readme")
//!     .with_content("hello");
//! acceptor.take(&document)?;
//! acceptor.flush()?;
//! # Ok::<(), pusher::AcceptorError>(())
//! ```

mod acceptor;
mod backoff;
mod config;
mod doc_pusher;
mod error;
mod pusher;
mod sender;
mod status;

pub use acceptor::DocumentAcceptor;
pub use backoff::InterruptHandle;
pub use config::{
    DEFAULT_MAX_DOCUMENT_SIZE, DEFAULT_MAX_FEED_SIZE, DEFAULT_MAX_FEEDS_IN_FLIGHT,
    DEFAULT_MAX_IN_FLIGHT_BYTES, PusherConfig, RetryPolicy,
};
pub use doc_pusher::{DocPusher, DocPusherFactory};
pub use error::{AcceptorError, PushError};
pub use pusher::{Pusher, PusherFactory};
pub use status::PusherStatus;
