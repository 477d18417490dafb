//! crates/logging/src/tracing_macros.rs
//! Convenience macros for feed pipeline tracing.
//!
//! These macros wrap the standard tracing macros with the target of the
//! matching [`Channel`](crate::Channel).

/// Emit a record-building trace.
///
/// # Example
/// ```ignore
/// trace_record!(url = %url, "built record");
/// ```
#[macro_export]
macro_rules! trace_record {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "feed::record", $($arg)*)
    };
}

/// Emit a record-building warning.
#[macro_export]
macro_rules! warn_record {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: "feed::record", $($arg)*)
    };
}

/// Emit a document acceptance trace.
///
/// # Example
/// ```ignore
/// trace_push!(records = count, "feed full");
/// ```
#[macro_export]
macro_rules! trace_push {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "feed::push", $($arg)*)
    };
}

/// Emit a document acceptance warning.
#[macro_export]
macro_rules! warn_push {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: "feed::push", $($arg)*)
    };
}

/// Emit a feed submission trace.
#[macro_export]
macro_rules! trace_send {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "feed::send", $($arg)*)
    };
}

/// Emit a feed submission warning.
#[macro_export]
macro_rules! warn_send {
    ($($arg:tt)*) => {
        ::tracing::warn!(target: "feed::send", $($arg)*)
    };
}

/// Emit a backlog monitoring trace.
#[macro_export]
macro_rules! trace_backlog {
    ($($arg:tt)*) => {
        ::tracing::info!(target: "feed::backlog", $($arg)*)
    };
}

/// Emit an ACL processing trace.
#[macro_export]
macro_rules! trace_acl {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "feed::acl", $($arg)*)
    };
}

/// Emit a full feed dump.
#[macro_export]
macro_rules! trace_feed_log {
    ($($arg:tt)*) => {
        ::tracing::debug!(target: "feed::log", $($arg)*)
    };
}
