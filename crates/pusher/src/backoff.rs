//! Interruptible pauses used while waiting out backpressure.
//!
//! Under `cfg(test)` pauses are recorded instead of slept so tests can assert
//! on the schedule; see [`test_support`].

use std::time::Duration;

use crossbeam_channel::{Receiver, Sender};

#[cfg(test)]
pub(crate) mod test_support;

/// Wakes a [`DocumentAcceptor`](crate::DocumentAcceptor) that is waiting out
/// backpressure.
///
/// An interrupt delivered while nobody is waiting ends the next wait
/// immediately. Repeated interrupts collapse into one.
#[derive(Clone, Debug)]
pub struct InterruptHandle {
    wake: Sender<()>,
}

impl InterruptHandle {
    /// Ends the current or next backoff pause.
    pub fn interrupt(&self) {
        let _ = self.wake.try_send(());
    }
}

#[derive(Debug)]
pub(crate) struct Backoff {
    wake: Sender<()>,
    woken: Receiver<()>,
}

impl Default for Backoff {
    fn default() -> Self {
        let (wake, woken) = crossbeam_channel::bounded(1);
        Self { wake, woken }
    }
}

impl Backoff {
    pub(crate) fn interrupt_handle(&self) -> InterruptHandle {
        InterruptHandle {
            wake: self.wake.clone(),
        }
    }

    /// Pauses for `duration`. Returns `false` when interrupted.
    pub(crate) fn pause(&self, duration: Duration) -> bool {
        #[cfg(test)]
        {
            test_support::record_sleep(duration);
            self.woken.try_recv().is_err()
        }

        #[cfg(not(test))]
        {
            use crossbeam_channel::RecvTimeoutError;

            match self.woken.recv_timeout(duration) {
                Ok(()) => false,
                Err(RecvTimeoutError::Timeout | RecvTimeoutError::Disconnected) => true,
            }
        }
    }
}
