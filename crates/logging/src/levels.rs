//! Channel identifiers and level values.

use tracing::level_filters::LevelFilter;

/// Pipeline stage a log event belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Channel {
    /// Record building.
    Record,
    /// Document acceptance and backpressure waits.
    Push,
    /// Feed submission to the appliance.
    Send,
    /// Appliance backlog monitoring.
    Backlog,
    /// ACL filter processing.
    Acl,
    /// Full feed dumps.
    FeedLog,
}

impl Channel {
    /// Every channel, in display order.
    pub const ALL: [Self; 6] = [
        Self::Record,
        Self::Push,
        Self::Send,
        Self::Backlog,
        Self::Acl,
        Self::FeedLog,
    ];

    /// Returns the tracing target for this channel.
    #[must_use]
    pub const fn target(self) -> &'static str {
        match self {
            Self::Record => "feed::record",
            Self::Push => "feed::push",
            Self::Send => "feed::send",
            Self::Backlog => "feed::backlog",
            Self::Acl => "feed::acl",
            Self::FeedLog => "feed::log",
        }
    }
}

/// Minimum level recorded for a channel.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ChannelLevel {
    /// Nothing is recorded.
    Off,
    /// Errors only.
    Error,
    /// Warnings and errors.
    #[default]
    Warn,
    /// Informational events.
    Info,
    /// Debug events.
    Debug,
    /// Everything.
    Trace,
}

impl ChannelLevel {
    /// Returns the directive spelling used by `EnvFilter`.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => "off",
            Self::Error => "error",
            Self::Warn => "warn",
            Self::Info => "info",
            Self::Debug => "debug",
            Self::Trace => "trace",
        }
    }
}

impl From<ChannelLevel> for LevelFilter {
    fn from(level: ChannelLevel) -> Self {
        match level {
            ChannelLevel::Off => Self::OFF,
            ChannelLevel::Error => Self::ERROR,
            ChannelLevel::Warn => Self::WARN,
            ChannelLevel::Info => Self::INFO,
            ChannelLevel::Debug => Self::DEBUG,
            ChannelLevel::Trace => Self::TRACE,
        }
    }
}
