//! The seam between the acceptor and whatever turns documents into feeds.

use spi::Document;

use crate::{PushError, PusherStatus};

/// Accepts documents for one data source and reports backpressure.
pub trait Pusher: Send {
    /// Queues `document` and reports the resulting status.
    ///
    /// [`PusherStatus::Disabled`] means the document was *not* accepted.
    fn take(&mut self, document: &dyn Document) -> Result<PusherStatus, PushError>;

    /// Submits everything queued and waits until it has been delivered.
    fn flush(&mut self) -> Result<(), PushError>;

    /// Drops everything queued without submitting it. The pusher is
    /// disabled afterwards.
    fn cancel(&mut self);

    /// Re-evaluates backpressure without accepting anything.
    fn status(&self) -> PusherStatus;
}

/// Creates pushers on demand.
pub trait PusherFactory: Send + Sync {
    /// The pusher type created.
    type Pusher: Pusher;

    /// Creates a pusher feeding `data_source`.
    fn new_pusher(&self, data_source: &str) -> Result<Self::Pusher, PushError>;
}

impl<P: Pusher + ?Sized> Pusher for Box<P> {
    fn take(&mut self, document: &dyn Document) -> Result<PusherStatus, PushError> {
        (**self).take(document)
    }

    fn flush(&mut self) -> Result<(), PushError> {
        (**self).flush()
    }

    fn cancel(&mut self) {
        (**self).cancel();
    }

    fn status(&self) -> PusherStatus {
        (**self).status()
    }
}
