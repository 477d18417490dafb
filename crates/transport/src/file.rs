//! Connections that keep feeds local.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use feed::FeedPayload;

use crate::connection::DEFAULT_CONTENT_ENCODINGS;
use crate::{FeedConnection, FeedError, response};

/// Appends every feed to a file and reports success.
#[derive(Debug)]
pub struct FileFeedConnection {
    path: PathBuf,
    file: Mutex<File>,
    content_encodings: String,
}

impl FileFeedConnection {
    /// Opens `path` for appending, creating it when missing.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, FeedError> {
        let path = path.into();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            path,
            file: Mutex::new(file),
            content_encodings: DEFAULT_CONTENT_ENCODINGS.to_owned(),
        })
    }

    /// Overrides the encodings this connection advertises.
    #[must_use]
    pub fn with_content_encodings(mut self, encodings: impl Into<String>) -> Self {
        self.content_encodings = encodings.into();
        self
    }

    /// Returns the file feeds are written to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn append(&self, payload: &FeedPayload) -> Result<(), FeedError> {
        let mut file = self.file.lock().unwrap_or_else(|poison| poison.into_inner());
        file.write_all(payload.bytes())?;
        file.flush()?;
        Ok(())
    }
}

impl FeedConnection for FileFeedConnection {
    fn send_data(&self, payload: &FeedPayload) -> Result<String, FeedError> {
        self.append(payload)?;
        logging::trace_send!(
            feed_id = %payload.feed_id(),
            path = %self.path.display(),
            bytes = payload.len(),
            "wrote feed to file"
        );
        Ok(response::SUCCESS.to_owned())
    }

    fn is_backlogged(&self) -> bool {
        false
    }

    fn content_encodings(&self) -> String {
        self.content_encodings.clone()
    }
}

/// Copies every feed to a file before handing it to another connection.
#[derive(Debug)]
pub struct TeeFeedConnection<C> {
    inner: C,
    tee: FileFeedConnection,
}

impl<C: FeedConnection> TeeFeedConnection<C> {
    /// Tees feeds sent through `inner` into `tee`.
    #[must_use]
    pub const fn new(inner: C, tee: FileFeedConnection) -> Self {
        Self { inner, tee }
    }

    /// Returns the wrapped connection.
    #[must_use]
    pub const fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: FeedConnection> FeedConnection for TeeFeedConnection<C> {
    fn send_data(&self, payload: &FeedPayload) -> Result<String, FeedError> {
        if let Err(error) = self.tee.append(payload) {
            logging::warn_send!(
                %error,
                path = %self.tee.path().display(),
                "cannot tee feed"
            );
        }
        self.inner.send_data(payload)
    }

    fn is_backlogged(&self) -> bool {
        self.inner.is_backlogged()
    }

    fn content_encodings(&self) -> String {
        self.inner.content_encodings()
    }

    fn supports_inherited_acls(&self) -> bool {
        self.inner.supports_inherited_acls()
    }
}

/// Drops every feed.
#[derive(Clone, Copy, Debug, Default)]
pub struct DiscardFeedConnection;

impl FeedConnection for DiscardFeedConnection {
    fn send_data(&self, payload: &FeedPayload) -> Result<String, FeedError> {
        logging::trace_send!(
            feed_id = %payload.feed_id(),
            records = payload.record_count(),
            "discarded feed"
        );
        Ok(response::SUCCESS.to_owned())
    }

    fn is_backlogged(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn payload(body: &str) -> FeedPayload {
        FeedPayload::from_parts("ds", "incremental", body.as_bytes().to_vec(), 1)
    }

    #[derive(Debug, Default)]
    struct Counting(AtomicUsize);

    impl FeedConnection for Counting {
        fn send_data(&self, _payload: &FeedPayload) -> Result<String, FeedError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(response::SUCCESS.to_owned())
        }

        fn is_backlogged(&self) -> bool {
            true
        }

        fn supports_inherited_acls(&self) -> bool {
            false
        }
    }

    #[test]
    fn file_connection_appends_feeds() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("feeds.xml");
        let connection = FileFeedConnection::open(&path).unwrap();

        assert_eq!(connection.send_data(&payload("<one/>")).unwrap(), "Success");
        connection.send_data(&payload("<two/>")).unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<one/><two/>");
        assert!(!connection.is_backlogged());
        assert_eq!(connection.content_encodings(), "base64binary");
    }

    #[test]
    fn file_connection_reports_open_failures() {
        let dir = tempfile::tempdir().unwrap();
        let err = FileFeedConnection::open(dir.path().join("missing/feeds.xml")).unwrap_err();
        assert!(matches!(err, FeedError::Io(_)));
    }

    #[test]
    fn tee_copies_then_delegates() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tee.xml");
        let tee = TeeFeedConnection::new(
            Counting::default(),
            FileFeedConnection::open(&path).unwrap(),
        );

        tee.send_data(&payload("<feed/>")).unwrap();
        assert_eq!(tee.inner().0.load(Ordering::SeqCst), 1);
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "<feed/>");
        assert!(tee.is_backlogged());
        assert!(!tee.supports_inherited_acls());
    }

    #[test]
    fn discard_accepts_everything() {
        let connection = DiscardFeedConnection;
        assert_eq!(connection.send_data(&payload("<x/>")).unwrap(), "Success");
        assert!(!connection.is_backlogged());
        assert!(connection.supports_inherited_acls());
    }
}
