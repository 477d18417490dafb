//! Appliance backlog tracking with hysteresis.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Default count of unprocessed feed items at which feeding pauses.
pub const DEFAULT_BACKLOG_CEILING: u64 = 50_000;
/// Default count below which feeding resumes.
pub const DEFAULT_BACKLOG_FLOOR: u64 = 15_000;
/// Default minimum time between backlog polls.
pub const DEFAULT_BACKLOG_INTERVAL: Duration = Duration::from_secs(15 * 60);

#[derive(Debug, Default)]
struct BacklogState {
    backlogged: bool,
    last_poll: Option<Instant>,
    last_count: Option<u64>,
}

/// Tracks whether the appliance is backlogged.
///
/// The state enters backlog when a polled count reaches the ceiling and
/// leaves it only once a count drops below the floor. Polls happen at most
/// once per interval; a failed poll keeps the previous state.
#[derive(Debug)]
pub struct BacklogMonitor {
    ceiling: u64,
    floor: u64,
    interval: Duration,
    state: Mutex<BacklogState>,
}

impl Default for BacklogMonitor {
    fn default() -> Self {
        Self::new(
            DEFAULT_BACKLOG_CEILING,
            DEFAULT_BACKLOG_FLOOR,
            DEFAULT_BACKLOG_INTERVAL,
        )
    }
}

impl BacklogMonitor {
    /// Creates a monitor. A floor above the ceiling is lowered to it.
    #[must_use]
    pub fn new(ceiling: u64, floor: u64, interval: Duration) -> Self {
        Self {
            ceiling,
            floor: floor.min(ceiling),
            interval,
            state: Mutex::new(BacklogState::default()),
        }
    }

    /// Returns the current state, polling first when the interval elapsed.
    pub fn check<F>(&self, poll: F) -> bool
    where
        F: FnOnce() -> Option<u64>,
    {
        self.check_at(Instant::now(), poll)
    }

    /// Like [`check`](Self::check) with an explicit clock reading.
    pub fn check_at<F>(&self, now: Instant, poll: F) -> bool
    where
        F: FnOnce() -> Option<u64>,
    {
        let mut state = self
            .state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner());

        let due = state
            .last_poll
            .is_none_or(|last| now.saturating_duration_since(last) >= self.interval);
        if !due {
            return state.backlogged;
        }
        state.last_poll = Some(now);

        let Some(count) = poll() else {
            logging::trace_backlog!(
                backlogged = state.backlogged,
                "backlog poll failed; keeping previous state"
            );
            return state.backlogged;
        };
        state.last_count = Some(count);

        if !state.backlogged && count >= self.ceiling {
            state.backlogged = true;
            logging::trace_backlog!(count, ceiling = self.ceiling, "appliance backlogged");
        } else if state.backlogged && count < self.floor {
            state.backlogged = false;
            logging::trace_backlog!(count, floor = self.floor, "appliance backlog cleared");
        }
        state.backlogged
    }

    /// Returns the most recent successfully polled count.
    #[must_use]
    pub fn last_count(&self) -> Option<u64> {
        self.state
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .last_count
    }
}
