#![deny(unsafe_code)]

//! Test doubles shared by the workspace's unit and integration tests.
//!
//! - [`FailingDocument`] wraps a [`SimpleDocument`] and fails selected
//!   property lookups.
//! - [`RecordingFeedConnection`] captures payloads instead of sending them
//!   and lets tests steer backlog, failures and send timing.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

use feed::FeedPayload;
use spi::{Document, Property, RepositoryError, SimpleDocument};
use transport::{FeedConnection, FeedError};

/// Document whose lookups fail on demand.
#[derive(Clone, Debug, Default)]
pub struct FailingDocument {
    inner: SimpleDocument,
    failures: BTreeMap<String, RepositoryError>,
    listing: Option<RepositoryError>,
}

impl FailingDocument {
    /// Wraps `inner`; nothing fails until configured.
    #[must_use]
    pub fn new(inner: SimpleDocument) -> Self {
        Self {
            inner,
            failures: BTreeMap::new(),
            listing: None,
        }
    }

    /// Makes lookups of `name` fail with `error`.
    #[must_use]
    pub fn fail_on(mut self, name: impl Into<String>, error: RepositoryError) -> Self {
        self.failures.insert(name.into(), error);
        self
    }

    /// Makes listing property names fail with `error`.
    #[must_use]
    pub fn fail_listing(mut self, error: RepositoryError) -> Self {
        self.listing = Some(error);
        self
    }
}

impl Document for FailingDocument {
    fn find_property(&self, name: &str) -> Result<Option<Property>, RepositoryError> {
        match self.failures.get(name) {
            Some(error) => Err(error.clone()),
            None => self.inner.find_property(name),
        }
    }

    fn property_names(&self) -> Result<BTreeSet<String>, RepositoryError> {
        match &self.listing {
            Some(error) => Err(error.clone()),
            None => self.inner.property_names(),
        }
    }
}

/// Feed connection that records payloads in memory.
#[derive(Debug)]
pub struct RecordingFeedConnection {
    sent: Mutex<Vec<FeedPayload>>,
    backlogged: AtomicBool,
    failures: AtomicUsize,
    refusals: AtomicUsize,
    held: Mutex<bool>,
    released: Condvar,
    content_encodings: String,
    inherited_acls: bool,
}

impl Default for RecordingFeedConnection {
    fn default() -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            backlogged: AtomicBool::new(false),
            failures: AtomicUsize::new(0),
            refusals: AtomicUsize::new(0),
            held: Mutex::new(false),
            released: Condvar::new(),
            content_encodings: transport::DEFAULT_CONTENT_ENCODINGS.to_owned(),
            inherited_acls: true,
        }
    }
}

impl RecordingFeedConnection {
    /// Creates a connection that accepts everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Advertises `encodings` as supported content encodings.
    #[must_use]
    pub fn with_content_encodings(mut self, encodings: impl Into<String>) -> Self {
        self.content_encodings = encodings.into();
        self
    }

    /// Reports no support for inherited ACLs.
    #[must_use]
    pub fn without_inherited_acls(mut self) -> Self {
        self.inherited_acls = false;
        self
    }

    /// Sets the reported backlog state.
    pub fn set_backlogged(&self, backlogged: bool) {
        self.backlogged.store(backlogged, Ordering::SeqCst);
    }

    /// Makes the next `count` sends fail with [`FeedError::Internal`].
    pub fn fail_next(&self, count: usize) {
        self.failures.store(count, Ordering::SeqCst);
    }

    /// Makes the next `count` sends fail with [`FeedError::Unauthorized`],
    /// which is not retryable.
    pub fn refuse_next(&self, count: usize) {
        self.refusals.store(count, Ordering::SeqCst);
    }

    /// Blocks senders until [`release`](Self::release) is called.
    pub fn hold(&self) {
        *self.held.lock().unwrap_or_else(|poison| poison.into_inner()) = true;
    }

    /// Lets held senders continue.
    pub fn release(&self) {
        *self.held.lock().unwrap_or_else(|poison| poison.into_inner()) = false;
        self.released.notify_all();
    }

    /// Returns copies of every payload received so far.
    #[must_use]
    pub fn payloads(&self) -> Vec<FeedPayload> {
        self.sent
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .clone()
    }

    /// Returns the number of payloads received.
    #[must_use]
    pub fn sent_count(&self) -> usize {
        self.sent
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .len()
    }

    /// Returns every payload's XML concatenated.
    #[must_use]
    pub fn xml(&self) -> String {
        self.payloads()
            .iter()
            .map(|payload| payload.xml().into_owned())
            .collect()
    }
}

impl FeedConnection for RecordingFeedConnection {
    fn send_data(&self, payload: &FeedPayload) -> Result<String, FeedError> {
        let mut held = self.held.lock().unwrap_or_else(|poison| poison.into_inner());
        while *held {
            held = self
                .released
                .wait(held)
                .unwrap_or_else(|poison| poison.into_inner());
        }
        drop(held);

        let refused = self
            .refusals
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if refused {
            return Err(FeedError::Unauthorized);
        }

        let failed = self
            .failures
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |left| left.checked_sub(1))
            .is_ok();
        if failed {
            return Err(FeedError::Internal);
        }

        self.sent
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
            .push(payload.clone());
        Ok(transport::response::SUCCESS.to_owned())
    }

    fn is_backlogged(&self) -> bool {
        self.backlogged.load(Ordering::SeqCst)
    }

    fn content_encodings(&self) -> String {
        self.content_encodings.clone()
    }

    fn supports_inherited_acls(&self) -> bool {
        self.inherited_acls
    }
}

/// Writes `contents` to a fresh file in `dir` and returns its path.
pub fn write_file(dir: &tempfile::TempDir, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap_or_else(|error| panic!("write {name}: {error}"));
    path
}
