//! Verbosity configuration mapping `-v` counts to channel levels.

use super::levels::{Channel, ChannelLevel};

/// Per-channel verbosity.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VerbosityConfig {
    /// Level applied to targets outside the feed channels.
    pub default: ChannelLevel,
    /// Record building.
    pub record: ChannelLevel,
    /// Document acceptance.
    pub push: ChannelLevel,
    /// Feed submission.
    pub send: ChannelLevel,
    /// Backlog monitoring.
    pub backlog: ChannelLevel,
    /// ACL processing.
    pub acl: ChannelLevel,
    /// Feed dumps.
    pub feed_log: ChannelLevel,
}

impl Default for VerbosityConfig {
    fn default() -> Self {
        Self::from_verbose_level(0)
    }
}

impl VerbosityConfig {
    /// Create a configuration from a verbose level (0-4).
    ///
    /// Level 0 keeps warnings only, level 1 reports submissions and backlog
    /// transitions, level 2 adds per-record and ACL detail, level 3 dumps
    /// whole feeds and level 4 enables tracing everywhere.
    #[must_use]
    pub fn from_verbose_level(level: u8) -> Self {
        use ChannelLevel::{Debug, Info, Trace, Warn};

        match level {
            0 => Self::uniform(Warn),
            1 => Self {
                push: Info,
                send: Info,
                backlog: Info,
                ..Self::uniform(Warn)
            },
            2 => Self {
                default: Info,
                feed_log: Info,
                ..Self::uniform(Debug)
            },
            3 => Self {
                default: Info,
                ..Self::uniform(Debug)
            },
            _ => Self::uniform(Trace),
        }
    }

    fn uniform(level: ChannelLevel) -> Self {
        Self {
            default: level,
            record: level,
            push: level,
            send: level,
            backlog: level,
            acl: level,
            feed_log: level,
        }
    }

    /// Returns the level configured for `channel`.
    #[must_use]
    pub const fn level(&self, channel: Channel) -> ChannelLevel {
        match channel {
            Channel::Record => self.record,
            Channel::Push => self.push,
            Channel::Send => self.send,
            Channel::Backlog => self.backlog,
            Channel::Acl => self.acl,
            Channel::FeedLog => self.feed_log,
        }
    }

    /// Renders the configuration as `EnvFilter` directives.
    #[must_use]
    pub fn directives(&self) -> String {
        let mut directives = String::from(self.default.as_str());
        for channel in Channel::ALL {
            directives.push(',');
            directives.push_str(channel.target());
            directives.push('=');
            directives.push_str(self.level(channel).as_str());
        }
        directives
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_level_keeps_warnings() {
        let config = VerbosityConfig::from_verbose_level(0);
        for channel in Channel::ALL {
            assert_eq!(config.level(channel), ChannelLevel::Warn);
        }
    }

    #[test]
    fn level_one_reports_submissions() {
        let config = VerbosityConfig::from_verbose_level(1);
        assert_eq!(config.send, ChannelLevel::Info);
        assert_eq!(config.backlog, ChannelLevel::Info);
        assert_eq!(config.record, ChannelLevel::Warn);
    }

    #[test]
    fn feed_dumps_need_level_three() {
        assert_eq!(
            VerbosityConfig::from_verbose_level(2).feed_log,
            ChannelLevel::Info
        );
        assert_eq!(
            VerbosityConfig::from_verbose_level(3).feed_log,
            ChannelLevel::Debug
        );
    }

    #[test]
    fn high_levels_saturate_at_trace() {
        assert_eq!(
            VerbosityConfig::from_verbose_level(9),
            VerbosityConfig::from_verbose_level(4)
        );
    }

    #[test]
    fn directives_list_every_channel() {
        let directives = VerbosityConfig::from_verbose_level(1).directives();
        assert!(directives.starts_with("warn,"));
        for channel in Channel::ALL {
            assert!(directives.contains(channel.target()));
        }
        assert!(directives.contains("feed::push=info"));
    }
}
