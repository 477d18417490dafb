use std::fmt;
use std::fs::File;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};

/// Reopenable source of binary content.
///
/// Every call to [`open`](Self::open) yields a fresh reader positioned at the
/// start of the content, so inspecting a value never consumes it.
pub trait ContentSource: fmt::Debug + Send + Sync {
    /// Opens a new reader over the content.
    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>>;

    /// Returns the content length when it is known without reading.
    fn len_hint(&self) -> Option<u64> {
        None
    }
}

impl ContentSource for Vec<u8> {
    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(Cursor::new(self.as_slice())))
    }

    fn len_hint(&self) -> Option<u64> {
        Some(self.len() as u64)
    }
}

/// Content read lazily from a file on disk.
#[derive(Clone, Debug)]
pub struct FileContent {
    path: PathBuf,
}

impl FileContent {
    /// Creates a source for the file at `path`. The file is not opened yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Returns the backing path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ContentSource for FileContent {
    fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        Ok(Box::new(File::open(&self.path)?))
    }

    fn len_hint(&self) -> Option<u64> {
        std::fs::metadata(&self.path).ok().map(|meta| meta.len())
    }
}

/// Shared handle to a [`ContentSource`].
#[derive(Clone, Debug)]
pub struct BinaryValue(Arc<dyn ContentSource>);

impl BinaryValue {
    /// Wraps an arbitrary content source.
    #[must_use]
    pub fn new(source: impl ContentSource + 'static) -> Self {
        Self(Arc::new(source))
    }

    /// Creates an in-memory binary value.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Vec<u8>>) -> Self {
        Self::new(bytes.into())
    }

    /// Creates a binary value backed by the file at `path`.
    #[must_use]
    pub fn from_file(path: impl Into<PathBuf>) -> Self {
        Self::new(FileContent::new(path))
    }

    /// Opens a reader over the content.
    pub fn open(&self) -> io::Result<Box<dyn Read + Send + '_>> {
        self.0.open()
    }

    /// Returns the content length when known up front.
    #[must_use]
    pub fn len_hint(&self) -> Option<u64> {
        self.0.len_hint()
    }
}

/// A single typed property value.
#[derive(Clone, Debug)]
pub enum Value {
    /// Free-form text.
    String(String),
    /// Signed integer.
    Long(i64),
    /// Floating point number.
    Double(f64),
    /// Boolean flag.
    Boolean(bool),
    /// Point in time.
    Date(OffsetDateTime),
    /// Binary content.
    Binary(BinaryValue),
}

impl Value {
    /// Convenience constructor for string values.
    #[must_use]
    pub fn string(value: impl Into<String>) -> Self {
        Self::String(value.into())
    }

    /// Returns the text when this is a string value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(value) => Some(value),
            _ => None,
        }
    }

    /// Interprets the value as a boolean.
    ///
    /// Strings are accepted when they read `true` or `false` (ignoring case
    /// and surrounding whitespace); other variants yield `None`.
    #[must_use]
    pub fn to_boolean(&self) -> Option<bool> {
        match self {
            Self::Boolean(value) => Some(*value),
            Self::String(value) => {
                let value = value.trim();
                if value.eq_ignore_ascii_case("true") {
                    Some(true)
                } else if value.eq_ignore_ascii_case("false") {
                    Some(false)
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    /// Returns the timestamp when this is a date value.
    #[must_use]
    pub const fn as_date(&self) -> Option<OffsetDateTime> {
        match self {
            Self::Date(value) => Some(*value),
            _ => None,
        }
    }

    /// Returns the binary handle when this is a binary value.
    #[must_use]
    pub const fn as_binary(&self) -> Option<&BinaryValue> {
        match self {
            Self::Binary(value) => Some(value),
            _ => None,
        }
    }
}

/// Text form used in feed metadata. Dates render as RFC 3339 in UTC and
/// binary values render as the empty string.
impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(value) => f.write_str(value),
            Self::Long(value) => write!(f, "{value}"),
            Self::Double(value) => write!(f, "{value}"),
            Self::Boolean(value) => write!(f, "{value}"),
            Self::Date(value) => {
                let rendered = value
                    .to_offset(UtcOffset::UTC)
                    .format(&Rfc3339)
                    .map_err(|_| fmt::Error)?;
                f.write_str(&rendered)
            }
            Self::Binary(_) => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Self::Long(value)
    }
}

impl From<OffsetDateTime> for Value {
    fn from(value: OffsetDateTime) -> Self {
        Self::Date(value)
    }
}

/// Ordered, possibly multi-valued property.
#[derive(Clone, Debug, Default)]
pub struct Property {
    values: Vec<Value>,
}

impl Property {
    /// Creates a property from its values.
    #[must_use]
    pub const fn new(values: Vec<Value>) -> Self {
        Self { values }
    }

    /// Creates a single-valued property.
    #[must_use]
    pub fn single(value: impl Into<Value>) -> Self {
        Self {
            values: vec![value.into()],
        }
    }

    /// Returns the values in order.
    #[must_use]
    pub fn values(&self) -> &[Value] {
        &self.values
    }

    /// Returns the first value, if any.
    #[must_use]
    pub fn first(&self) -> Option<&Value> {
        self.values.first()
    }

    /// Returns the number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when the property has no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over the values.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.values.iter()
    }

    /// Consumes the property and returns its values.
    #[must_use]
    pub fn into_values(self) -> Vec<Value> {
        self.values
    }
}

impl FromIterator<Value> for Property {
    fn from_iter<I: IntoIterator<Item = Value>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

impl From<Value> for Property {
    fn from(value: Value) -> Self {
        Self::single(value)
    }
}

impl<'a> IntoIterator for &'a Property {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}
