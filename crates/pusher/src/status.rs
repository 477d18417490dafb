//! Backpressure signal reported by pushers.

use std::fmt;

/// State of a pusher after accepting a document.
///
/// Everything other than [`Ok`](Self::Ok) asks the caller to slow down; only
/// [`Disabled`](Self::Disabled) means the pusher itself must be replaced.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
pub enum PusherStatus {
    /// Keep feeding.
    #[default]
    Ok,
    /// The pusher was canceled or lost its sender and accepts nothing more.
    Disabled,
    /// Closed feeds waiting for submission hold too many bytes.
    LowMemory,
    /// Too many closed feeds are waiting for submission.
    LocalFeedBacklog,
    /// The appliance reports a feed backlog.
    GsaFeedBacklog,
}

impl PusherStatus {
    /// Returns the conventional upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Ok => "OK",
            Self::Disabled => "DISABLED",
            Self::LowMemory => "LOW_MEMORY",
            Self::LocalFeedBacklog => "LOCAL_FEED_BACKLOG",
            Self::GsaFeedBacklog => "GSA_FEED_BACKLOG",
        }
    }

    /// Returns `true` for the statuses that are waited out with a short
    /// sleep.
    #[must_use]
    pub const fn is_local_pressure(self) -> bool {
        matches!(self, Self::LowMemory | Self::LocalFeedBacklog)
    }
}

impl fmt::Display for PusherStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_ok() {
        assert_eq!(PusherStatus::default(), PusherStatus::Ok);
    }

    #[test]
    fn names_match_wire_convention() {
        assert_eq!(PusherStatus::GsaFeedBacklog.to_string(), "GSA_FEED_BACKLOG");
        assert_eq!(PusherStatus::LowMemory.as_str(), "LOW_MEMORY");
    }

    #[test]
    fn local_pressure_covers_memory_and_queue() {
        assert!(PusherStatus::LowMemory.is_local_pressure());
        assert!(PusherStatus::LocalFeedBacklog.is_local_pressure());
        assert!(!PusherStatus::GsaFeedBacklog.is_local_pressure());
        assert!(!PusherStatus::Disabled.is_local_pressure());
        assert!(!PusherStatus::Ok.is_local_pressure());
    }
}
