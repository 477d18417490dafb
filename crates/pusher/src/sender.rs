//! Background submission of closed feeds.
//!
//! A single worker thread owns the receiving end of an unbounded channel and
//! hands every payload to the connection in submission order. The pusher
//! reads the queue depth and byte count to derive local backpressure.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use crossbeam_channel::{Receiver, SendError, Sender};
use feed::FeedPayload;
use transport::{FeedConnection, FeedError};

use crate::PushError;

const IDLE_POLL: Duration = Duration::from_millis(50);

enum SenderMessage {
    Feed(FeedPayload),
    Shutdown,
}

#[derive(Debug, Default)]
struct Queue {
    pending: usize,
    bytes: usize,
    error: Option<FeedError>,
}

#[derive(Debug, Default)]
struct Shared {
    queue: Mutex<Queue>,
    idle: Condvar,
    canceled: AtomicBool,
}

impl Shared {
    fn lock(&self) -> MutexGuard<'_, Queue> {
        self.queue
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }

    fn finish(&self, bytes: usize, failure: Option<FeedError>) {
        let mut queue = self.lock();
        queue.pending = queue.pending.saturating_sub(1);
        queue.bytes = queue.bytes.saturating_sub(bytes);
        if let Some(error) = failure {
            // The first failure is the one reported; later ones are logged only.
            queue.error.get_or_insert(error);
        }
        if queue.pending == 0 {
            self.idle.notify_all();
        }
    }
}

/// Handle to the worker thread submitting closed feeds.
#[derive(Debug)]
pub(crate) struct FeedSender {
    messages: Sender<SenderMessage>,
    shared: Arc<Shared>,
    worker: Option<JoinHandle<()>>,
}

impl FeedSender {
    /// Starts a worker delivering to `connection`.
    pub(crate) fn spawn(connection: Arc<dyn FeedConnection>) -> io::Result<Self> {
        let (messages, inbox) = crossbeam_channel::unbounded();
        let shared = Arc::new(Shared::default());
        let worker_shared = Arc::clone(&shared);
        let worker = thread::Builder::new()
            .name("feed-sender".into())
            .spawn(move || sender_main(&inbox, connection.as_ref(), &worker_shared))?;
        Ok(Self {
            messages,
            shared,
            worker: Some(worker),
        })
    }

    /// Queues `payload` for submission.
    pub(crate) fn submit(&self, payload: FeedPayload) -> Result<(), PushError> {
        let bytes = payload.len();
        {
            let mut queue = self.shared.lock();
            queue.pending += 1;
            queue.bytes += bytes;
        }
        if let Err(SendError(_)) = self.messages.send(SenderMessage::Feed(payload)) {
            self.shared.finish(bytes, None);
            return Err(PushError::SenderStopped);
        }
        Ok(())
    }

    /// Number of feeds queued or being sent.
    pub(crate) fn pending(&self) -> usize {
        self.shared.lock().pending
    }

    /// Bytes held by feeds queued or being sent.
    pub(crate) fn in_flight_bytes(&self) -> usize {
        self.shared.lock().bytes
    }

    /// Removes and returns the first recorded delivery failure.
    pub(crate) fn take_error(&self) -> Option<FeedError> {
        self.shared.lock().error.take()
    }

    /// Returns `false` once the worker thread has exited.
    pub(crate) fn is_running(&self) -> bool {
        self.worker
            .as_ref()
            .is_some_and(|worker| !worker.is_finished())
    }

    /// Blocks until every queued feed has been handled.
    pub(crate) fn wait_idle(&self) -> Result<(), PushError> {
        let mut queue = self.shared.lock();
        while queue.pending > 0 {
            if !self.is_running() {
                return Err(PushError::SenderStopped);
            }
            queue = self
                .shared
                .idle
                .wait_timeout(queue, IDLE_POLL)
                .unwrap_or_else(|poison| poison.into_inner())
                .0;
        }
        Ok(())
    }

    /// Makes the worker drop queued feeds instead of sending them.
    ///
    /// A send already in progress is not interrupted.
    pub(crate) fn cancel(&self) {
        self.shared.canceled.store(true, Ordering::SeqCst);
    }
}

impl Drop for FeedSender {
    fn drop(&mut self) {
        let _ = self.messages.send(SenderMessage::Shutdown);
        if self.shared.canceled.load(Ordering::SeqCst) {
            return;
        }
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn sender_main(inbox: &Receiver<SenderMessage>, connection: &dyn FeedConnection, shared: &Shared) {
    while let Ok(message) = inbox.recv() {
        let payload = match message {
            SenderMessage::Feed(payload) => payload,
            SenderMessage::Shutdown => break,
        };
        let failure = if shared.canceled.load(Ordering::SeqCst) {
            logging::trace_push!(
                feed_id = %payload.feed_id(),
                records = payload.record_count(),
                "dropped canceled feed"
            );
            None
        } else {
            deliver(connection, &payload).err()
        };
        shared.finish(payload.len(), failure);
    }
}

fn deliver(connection: &dyn FeedConnection, payload: &FeedPayload) -> Result<(), FeedError> {
    match connection.send_data(payload) {
        Ok(token) => {
            logging::trace_send!(
                feed_id = %payload.feed_id(),
                data_source = payload.data_source(),
                feed_type = payload.feed_type(),
                records = payload.record_count(),
                bytes = payload.len(),
                %token,
                "submitted feed"
            );
            Ok(())
        }
        Err(error) => {
            logging::warn_send!(
                feed_id = %payload.feed_id(),
                records = payload.record_count(),
                retryable = error.is_retryable(),
                %error,
                "feed submission failed"
            );
            Err(error)
        }
    }
}
