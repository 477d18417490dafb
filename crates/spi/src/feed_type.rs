use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Kind of feed a document belongs to.
///
/// The feed type decides how a record URL is fabricated from a docid and
/// which `<feedtype>` the feed header announces.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FeedType {
    /// Content is pushed with the record; URLs are synthetic connector URLs.
    #[default]
    Content,
    /// The docid is itself a crawlable URL; only metadata is pushed.
    Web,
    /// Metadata is pushed and the appliance fetches content from a
    /// connector-served retrieval URL.
    ContentUrl,
    /// Free-standing ACL records.
    Acl,
}

impl FeedType {
    /// Returns the lowercase name used in document properties.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Content => "content",
            Self::Web => "web",
            Self::ContentUrl => "contenturl",
            Self::Acl => "acl",
        }
    }

    /// Returns the value written into the feed header's `<feedtype>`.
    #[must_use]
    pub const fn xml_feed_type(self) -> &'static str {
        match self {
            Self::Content | Self::Acl => "incremental",
            Self::Web | Self::ContentUrl => "metadata-and-url",
        }
    }

    /// Returns `true` for feed types whose records never carry content.
    #[must_use]
    pub const fn is_metadata_and_url(self) -> bool {
        matches!(self, Self::Web | Self::ContentUrl)
    }
}

impl fmt::Display for FeedType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a feed type name is not recognised.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
#[error("unknown feed type '{0}'")]
pub struct ParseFeedTypeError(pub String);

impl FromStr for FeedType {
    type Err = ParseFeedTypeError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "content" => Ok(Self::Content),
            "web" => Ok(Self::Web),
            "contenturl" => Ok(Self::ContentUrl),
            "acl" => Ok(Self::Acl),
            _ => Err(ParseFeedTypeError(value.to_owned())),
        }
    }
}
