use std::borrow::Cow;

use uuid::Uuid;

/// A closed feed ready for transmission.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FeedPayload {
    pub(crate) feed_id: Uuid,
    pub(crate) data_source: String,
    pub(crate) feed_type: &'static str,
    pub(crate) bytes: Vec<u8>,
    pub(crate) record_count: usize,
    pub(crate) log: Option<String>,
}

impl FeedPayload {
    /// Wraps pre-serialized feed bytes, assigning a fresh feed id.
    #[must_use]
    pub fn from_parts(
        data_source: impl Into<String>,
        feed_type: &'static str,
        bytes: Vec<u8>,
        record_count: usize,
    ) -> Self {
        Self {
            feed_id: Uuid::new_v4(),
            data_source: data_source.into(),
            feed_type,
            bytes,
            record_count,
            log: None,
        }
    }

    /// Returns the id of the feed this payload was produced from.
    #[must_use]
    pub const fn feed_id(&self) -> Uuid {
        self.feed_id
    }

    /// Returns the data source named in the header.
    #[must_use]
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// Returns the header feed type (`incremental` or `metadata-and-url`).
    #[must_use]
    pub const fn feed_type(&self) -> &'static str {
        self.feed_type
    }

    /// Returns the serialized XML.
    #[must_use]
    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Returns the payload size in bytes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when the payload holds no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the number of records.
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.record_count
    }

    /// Returns the log-friendly copy, when feed logging was enabled.
    #[must_use]
    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    /// Returns the XML as text.
    #[must_use]
    pub fn xml(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.bytes)
    }

    /// Consumes the payload and returns its bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}
