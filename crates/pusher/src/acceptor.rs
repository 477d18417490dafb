//! crates/pusher/src/acceptor.rs
//!
//! Entry point for traversal loops: waits out backpressure and manages the
//! pusher lifecycle.

use std::fmt;
use std::sync::{Mutex, MutexGuard};

use spi::Document;

use crate::backoff::{Backoff, InterruptHandle};
use crate::{AcceptorError, Pusher, PusherFactory, PusherStatus, RetryPolicy};

/// Accepts documents for one data source.
///
/// A pusher is created lazily on the first [`take`](Self::take) and dropped
/// by [`flush`](Self::flush) and [`cancel`](Self::cancel). Calls are
/// serialised; the acceptor can be shared between threads but handles one
/// call at a time.
pub struct DocumentAcceptor<F: PusherFactory> {
    data_source: String,
    factory: F,
    retry: RetryPolicy,
    pusher: Mutex<Option<F::Pusher>>,
    backoff: Backoff,
}

impl<F: PusherFactory> DocumentAcceptor<F> {
    /// Creates an acceptor feeding `data_source` through pushers from
    /// `factory`.
    #[must_use]
    pub fn new(data_source: impl Into<String>, factory: F) -> Self {
        Self {
            data_source: data_source.into(),
            factory,
            retry: RetryPolicy::default(),
            pusher: Mutex::new(None),
            backoff: Backoff::default(),
        }
    }

    /// Replaces the retry policy.
    #[must_use]
    pub const fn with_retry_policy(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    /// Returns the data source documents are fed into.
    #[must_use]
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// Returns the retry policy in use.
    #[must_use]
    pub const fn retry_policy(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns a handle that ends a backoff wait early.
    #[must_use]
    pub fn interrupt_handle(&self) -> InterruptHandle {
        self.backoff.interrupt_handle()
    }

    fn lock(&self) -> MutexGuard<'_, Option<F::Pusher>> {
        self.pusher
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn take_with(
        &self,
        slot: &mut Option<F::Pusher>,
        document: &dyn Document,
    ) -> Result<PusherStatus, AcceptorError> {
        let pusher = match slot {
            Some(pusher) => pusher,
            None => slot.insert(self.factory.new_pusher(&self.data_source)?),
        };
        Ok(pusher.take(document)?)
    }

    /// Feeds `document`, then waits while the pusher reports backpressure.
    ///
    /// Waiting is bounded by the retry policy: local pressure is waited out
    /// with the short sleep and an appliance backlog with the long sleep.
    /// Running out of retries or being interrupted is not an error; the
    /// document has been accepted either way.
    ///
    /// A pusher that reports [`PusherStatus::Disabled`], whether from the
    /// first `take` or while waiting, is replaced and the whole `take` is
    /// repeated once with the new pusher. A replacement that is disabled as
    /// well yields [`AcceptorError::Disabled`].
    pub fn take(&self, document: &dyn Document) -> Result<(), AcceptorError> {
        let mut slot = self.lock();

        let mut status = self.take_with(&mut slot, document)?;
        let mut replaced = false;
        let mut attempt = 0;
        loop {
            let pause = match status {
                PusherStatus::Ok => return Ok(()),
                PusherStatus::Disabled => {
                    *slot = None;
                    if replaced {
                        return Err(AcceptorError::Disabled);
                    }
                    replaced = true;
                    logging::trace_push!(data_source = %self.data_source, "pusher disabled; starting a new one");
                    status = self.take_with(&mut slot, document)?;
                    attempt = 0;
                    continue;
                }
                PusherStatus::LowMemory | PusherStatus::LocalFeedBacklog => self.retry.short_sleep,
                PusherStatus::GsaFeedBacklog => self.retry.long_sleep,
            };

            if attempt == self.retry.retry_count {
                logging::warn_push!(
                    data_source = %self.data_source,
                    %status,
                    retries = self.retry.retry_count,
                    "backpressure persists; returning to caller"
                );
                return Ok(());
            }
            attempt += 1;

            logging::trace_push!(
                data_source = %self.data_source,
                %status,
                attempt,
                pause_ms = u64::try_from(pause.as_millis()).unwrap_or(u64::MAX),
                "waiting for backpressure to clear"
            );
            if !self.backoff.pause(pause) {
                logging::trace_push!(data_source = %self.data_source, "backoff interrupted");
                return Ok(());
            }
            status = match slot.as_ref() {
                Some(pusher) => pusher.status(),
                None => return Ok(()),
            };
        }
    }

    /// Submits everything accepted so far and waits for delivery.
    ///
    /// The pusher is dropped whether or not delivery succeeded; the next
    /// [`take`](Self::take) starts a new one.
    pub fn flush(&self) -> Result<(), AcceptorError> {
        let mut slot = self.lock();
        match slot.take() {
            Some(mut pusher) => Ok(pusher.flush()?),
            None => Ok(()),
        }
    }

    /// Discards everything accepted but not yet delivered.
    pub fn cancel(&self) {
        if let Some(mut pusher) = self.lock().take() {
            pusher.cancel();
            logging::trace_push!(data_source = %self.data_source, "canceled pusher");
        }
    }
}

impl<F: PusherFactory> fmt::Debug for DocumentAcceptor<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocumentAcceptor")
            .field("data_source", &self.data_source)
            .field("retry", &self.retry)
            .field(
                "active",
                &self.pusher.try_lock().ok().map(|slot| slot.is_some()),
            )
            .finish_non_exhaustive()
    }
}
