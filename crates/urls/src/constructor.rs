use spi::{Document, FeedType, find_string, is_acl_document, names};
use url::form_urlencoded;

use crate::{UrlError, is_valid_url};

/// Scheme of the synthetic URLs fabricated for content feeds.
pub const CONNECTOR_URL_SCHEME: &str = "googleconnector";

/// Derives record and inherit-from URLs for one data source.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct UrlConstructor {
    data_source: String,
    feed_type: FeedType,
    content_url_prefix: Option<String>,
}

impl UrlConstructor {
    /// Creates a constructor for `data_source` whose documents default to
    /// `feed_type` when they do not carry a `google:feedtype` property.
    #[must_use]
    pub fn new(data_source: impl Into<String>, feed_type: FeedType) -> Self {
        Self {
            data_source: data_source.into(),
            feed_type,
            content_url_prefix: None,
        }
    }

    /// Sets the prefix used for `contenturl` retrieval URLs.
    #[must_use]
    pub fn with_content_url_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.content_url_prefix = Some(prefix.into());
        self
    }

    /// Returns the data source (connector name) URLs are built for.
    #[must_use]
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// Returns the default feed type.
    #[must_use]
    pub const fn feed_type(&self) -> FeedType {
        self.feed_type
    }

    /// Returns the configured content URL prefix.
    #[must_use]
    pub fn content_url_prefix(&self) -> Option<&str> {
        self.content_url_prefix.as_deref()
    }

    /// Resolves the feed type of a document, falling back to the default.
    pub fn document_feed_type<D: Document + ?Sized>(
        &self,
        document: &D,
    ) -> Result<FeedType, UrlError> {
        Ok(parse_feed_type(document, names::FEEDTYPE)?.unwrap_or(self.feed_type))
    }

    /// Returns the URL a document's record is published under.
    ///
    /// An explicit `google:searchurl` wins when it is a valid URL (ACL
    /// documents skip validation). Otherwise the URL is fabricated from the
    /// docid, fragment and feed type.
    pub fn record_url<D: Document + ?Sized>(&self, document: &D) -> Result<String, UrlError> {
        let is_acl = is_acl_document(document)?;

        if let Some(search_url) = find_string(document, names::SEARCHURL)? {
            if is_acl || is_valid_url(&search_url) {
                return Ok(search_url);
            }
            return Err(UrlError::Malformed(search_url));
        }

        let docid = find_string(document, names::DOCID)?.ok_or(UrlError::MissingDocid)?;
        let feed_type = self.document_feed_type(document)?;
        let fragment = find_string(document, names::FRAGMENT)?;

        if let Some(fragment) = fragment.as_deref() {
            if feed_type == FeedType::Content && !is_acl {
                return Err(UrlError::FragmentNotAllowed {
                    docid,
                    fragment: fragment.to_owned(),
                });
            }
        }

        self.fabricate(&docid, fragment.as_deref(), feed_type)
    }

    /// Fabricates the URL a document inherits its ACL from.
    ///
    /// Returns `Ok(None)` when the document has no
    /// `google:aclinheritfrom:docid`. The feed type comes from
    /// `google:aclinheritfrom:feedtype`, then the document's own
    /// `google:feedtype`, then the default.
    pub fn inherit_from_url<D: Document + ?Sized>(
        &self,
        document: &D,
    ) -> Result<Option<String>, UrlError> {
        let Some(docid) = find_string(document, names::ACLINHERITFROM_DOCID)? else {
            return Ok(None);
        };

        let feed_type = match parse_feed_type(document, names::ACLINHERITFROM_FEEDTYPE)? {
            Some(feed_type) => feed_type,
            None => self.document_feed_type(document)?,
        };
        let fragment = find_string(document, names::ACLINHERITFROM_FRAGMENT)?;

        self.fabricate(&docid, fragment.as_deref(), feed_type)
            .map(Some)
    }

    /// Builds a URL from a docid, optional fragment and feed type.
    pub fn fabricate(
        &self,
        docid: &str,
        fragment: Option<&str>,
        feed_type: FeedType,
    ) -> Result<String, UrlError> {
        let fragment = fragment.filter(|fragment| !fragment.is_empty());

        let mut url = match feed_type {
            // The appliance strips true fragments, so a web docid is the URL.
            FeedType::Web => return Ok(docid.to_owned()),
            FeedType::Content | FeedType::Acl => format!(
                "{CONNECTOR_URL_SCHEME}://{}.localhost/doc?docid={}",
                self.data_source,
                encode(docid)
            ),
            FeedType::ContentUrl => {
                let prefix = self
                    .content_url_prefix
                    .as_deref()
                    .map(str::trim)
                    .filter(|prefix| !prefix.is_empty())
                    .ok_or(UrlError::MissingContentUrlPrefix)?;
                let separator = if prefix.contains('?') { '&' } else { '?' };
                format!(
                    "{prefix}{separator}ConnectorName={}&docid={}",
                    encode(&self.data_source),
                    encode(docid)
                )
            }
        };

        if let Some(fragment) = fragment {
            url.push('&');
            url.push_str(&encode(fragment));
        }
        Ok(url)
    }
}

fn encode(value: &str) -> String {
    form_urlencoded::byte_serialize(value.as_bytes()).collect()
}

fn parse_feed_type<D: Document + ?Sized>(
    document: &D,
    name: &str,
) -> Result<Option<FeedType>, UrlError> {
    let Some(raw) = find_string(document, name)? else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(feed_type) => Ok(Some(feed_type)),
        Err(error) => {
            logging::warn_record!(property = name, %error, "ignoring invalid feed type");
            Ok(None)
        }
    }
}
