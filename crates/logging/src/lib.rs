#![deny(unsafe_code)]
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]

//! # Overview
//!
//! `logging` gives every crate of the feed pipeline a shared vocabulary of
//! tracing targets. Each pipeline stage logs on its own [`Channel`]:
//!
//! | Channel | Target | Used for |
//! |---------|--------|----------|
//! | [`Channel::Record`] | `feed::record` | record building, ignored properties |
//! | [`Channel::Push`] | `feed::push` | accepted and skipped documents, waits |
//! | [`Channel::Send`] | `feed::send` | feed submission and appliance responses |
//! | [`Channel::Backlog`] | `feed::backlog` | appliance backlog transitions |
//! | [`Channel::Acl`] | `feed::acl` | ACL filter composition |
//! | [`Channel::FeedLog`] | `feed::log` | log-friendly copies of whole feeds |
//!
//! The `trace_*!`/`warn_*!` macros fix the target so call sites stay short.
//!
//! # Verbosity
//!
//! [`VerbosityConfig::from_verbose_level`] maps a `-v` count onto per-channel
//! levels and [`init_tracing`] installs a formatting subscriber that honours
//! them. `RUST_LOG` takes precedence when set.
//!
//! # Examples
//!
//! ```
//! use logging::{Channel, VerbosityConfig};
//!
//! let config = VerbosityConfig::from_verbose_level(1);
//! assert!(config.directives().contains("feed::send=info"));
//! assert_eq!(Channel::Send.target(), "feed::send");
//! ```

mod config;
mod init;
mod levels;
mod tracing_macros;

pub use config::VerbosityConfig;
pub use init::{InitError, init_tracing};
pub use levels::{Channel, ChannelLevel};
