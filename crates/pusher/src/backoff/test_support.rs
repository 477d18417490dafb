use std::sync::{Mutex, MutexGuard, OnceLock};
use std::time::Duration;

fn recorded_sleeps() -> &'static Mutex<Vec<Duration>> {
    static RECORDED_SLEEPS: OnceLock<Mutex<Vec<Duration>>> = OnceLock::new();
    RECORDED_SLEEPS.get_or_init(|| Mutex::new(Vec::new()))
}

fn session_lock() -> &'static Mutex<()> {
    static SESSION_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
    SESSION_LOCK.get_or_init(|| Mutex::new(()))
}

fn lock_recorded_sleeps() -> MutexGuard<'static, Vec<Duration>> {
    recorded_sleeps()
        .lock()
        .unwrap_or_else(|poison| poison.into_inner())
}

pub(crate) fn record_sleep(duration: Duration) {
    lock_recorded_sleeps().push(duration);
}

/// Exclusive access to the pauses recorded by [`Backoff`](super::Backoff).
///
/// Tests hold the session for the whole scenario so parallel tests neither
/// drain nor append to the shared buffer while assertions run.
pub(crate) struct RecordedSleepSession {
    _guard: MutexGuard<'static, ()>,
}

impl RecordedSleepSession {
    pub(crate) fn clear(&mut self) {
        lock_recorded_sleeps().clear();
    }

    pub(crate) fn len(&self) -> usize {
        lock_recorded_sleeps().len()
    }

    pub(crate) fn take(&mut self) -> Vec<Duration> {
        std::mem::take(&mut *lock_recorded_sleeps())
    }
}

pub(crate) fn recorded_sleep_session() -> RecordedSleepSession {
    RecordedSleepSession {
        _guard: session_lock()
            .lock()
            .unwrap_or_else(|poison| poison.into_inner()),
    }
}
