//! Append-only byte buffer with bounded growth.

use std::io::{self, Write};

/// Initial capacity reserved for a fresh buffer.
pub const INITIAL_CAPACITY: usize = 32 * 1024;

/// Largest single capacity increment. Below this the buffer doubles.
pub const MAX_GROWTH_INCREMENT: usize = 8 * 1024 * 1024;

/// Growable byte buffer that doubles until increments reach
/// [`MAX_GROWTH_INCREMENT`] and then grows linearly.
///
/// Streaming large content through a plain `Vec` would double a
/// multi-hundred-megabyte allocation on every overflow; capping the
/// increment keeps over-allocation bounded.
#[derive(Clone, Debug, Default)]
pub struct FeedBuffer {
    bytes: Vec<u8>,
}

impl FeedBuffer {
    /// Creates a buffer with [`INITIAL_CAPACITY`] reserved.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(INITIAL_CAPACITY)
    }

    /// Creates a buffer with `capacity` bytes reserved.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            bytes: Vec::with_capacity(capacity),
        }
    }

    /// Returns the number of bytes written.
    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    /// Returns `true` when nothing has been written.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Returns the reserved capacity.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.bytes.capacity()
    }

    /// Returns the written bytes.
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.bytes
    }

    /// Discards everything written after the first `len` bytes.
    pub fn truncate(&mut self, len: usize) {
        self.bytes.truncate(len);
    }

    /// Appends `data`, growing the buffer as needed.
    pub fn extend_from_slice(&mut self, data: &[u8]) {
        self.ensure_additional(data.len());
        self.bytes.extend_from_slice(data);
    }

    /// Consumes the buffer and returns its bytes.
    #[must_use]
    pub fn into_vec(self) -> Vec<u8> {
        self.bytes
    }

    fn ensure_additional(&mut self, additional: usize) {
        let required = self.bytes.len().saturating_add(additional);
        let capacity = self.bytes.capacity();
        if required <= capacity {
            return;
        }

        let increment = capacity.clamp(INITIAL_CAPACITY, MAX_GROWTH_INCREMENT);
        let target = required.max(capacity.saturating_add(increment));
        self.bytes.reserve_exact(target - self.bytes.len());
    }
}

impl Write for FeedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn write_all(&mut self, buf: &[u8]) -> io::Result<()> {
        self.extend_from_slice(buf);
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
