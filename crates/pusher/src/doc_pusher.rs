//! Turns documents into feeds and hands closed feeds to the sender thread.

use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use feed::{ContentEncoding, Feed, RecordError};
use filters::{DocumentFilterChain, StripMode};
use spi::{
    ActionType, BinaryValue, Document, FeedType, RepositoryError, Value, find_first, find_string,
    is_acl_document, names,
};
use transport::FeedConnection;
use urls::UrlConstructor;
use uuid::Uuid;

use crate::sender::FeedSender;
use crate::{PushError, Pusher, PusherConfig, PusherFactory, PusherStatus};

/// What goes into a record's `<content>` element.
enum Content {
    None,
    Alternate(Vec<u8>),
    Stream {
        value: BinaryValue,
        alternate: Vec<u8>,
    },
}

/// Pusher that batches documents into [`Feed`]s for one data source.
///
/// At most one feed is open at a time. It is submitted when it becomes
/// full, when a document of another feed type arrives, or on
/// [`flush`](Pusher::flush). Submission happens on a background thread;
/// the number and size of feeds still waiting there drive
/// [`PusherStatus::LocalFeedBacklog`] and [`PusherStatus::LowMemory`].
pub struct DocPusher {
    data_source: String,
    config: PusherConfig,
    connection: Arc<dyn FeedConnection>,
    urls: UrlConstructor,
    chain: DocumentFilterChain,
    encoding: ContentEncoding,
    skip_acl_documents: bool,
    feed: Option<Feed>,
    sender: FeedSender,
    disabled: bool,
}

impl DocPusher {
    /// Creates a pusher for `data_source` delivering to `connection`.
    ///
    /// The connection is asked once for its content encodings and inherited
    /// ACL support; the answers shape every feed this pusher writes.
    pub fn new(
        data_source: impl Into<String>,
        connection: Arc<dyn FeedConnection>,
        config: PusherConfig,
    ) -> Result<Self, PushError> {
        let data_source = data_source.into();
        let mut urls = UrlConstructor::new(data_source.clone(), config.default_feed_type);
        if let Some(prefix) = &config.content_url_prefix {
            urls = urls.with_content_url_prefix(prefix.clone());
        }

        let inherited_acls = connection.supports_inherited_acls();
        let strip = if config.strip_acls {
            Some(StripMode::All)
        } else if inherited_acls {
            None
        } else {
            Some(StripMode::Inheritance)
        };
        let chain = DocumentFilterChain::acl(urls.clone(), strip);
        let encoding =
            ContentEncoding::negotiate(&connection.content_encodings(), config.use_compression);
        let sender = FeedSender::spawn(Arc::clone(&connection)).map_err(PushError::Spawn)?;

        logging::trace_push!(
            data_source = %data_source,
            %encoding,
            inherited_acls,
            strip_acls = config.strip_acls,
            "started pusher"
        );

        Ok(Self {
            data_source,
            skip_acl_documents: config.strip_acls || !inherited_acls,
            config,
            connection,
            urls,
            chain,
            encoding,
            feed: None,
            sender,
            disabled: false,
        })
    }

    /// Returns the data source feeds are written for.
    #[must_use]
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// Returns the content encoding negotiated with the connection.
    #[must_use]
    pub const fn content_encoding(&self) -> ContentEncoding {
        self.encoding
    }

    /// Returns the id of the feed currently accumulating records.
    #[must_use]
    pub fn open_feed_id(&self) -> Option<Uuid> {
        self.feed.as_ref().map(Feed::feed_id)
    }

    /// Returns the number of records in the open feed.
    #[must_use]
    pub fn open_record_count(&self) -> usize {
        self.feed.as_ref().map_or(0, Feed::record_count)
    }

    fn accept(&mut self, document: &dyn Document) -> Result<(), PushError> {
        let filtered = self.chain.compose(document)?;

        if self.skip_acl_documents && is_acl_document(&filtered)? {
            let docid = find_string(&filtered, names::DOCID)?;
            logging::trace_push!(?docid, "skipped ACL document");
            return Ok(());
        }

        let feed_type = self.urls.document_feed_type(&filtered)?;
        if self
            .feed
            .as_ref()
            .is_some_and(|feed| feed.feed_type() != feed_type)
        {
            logging::trace_push!(%feed_type, "feed type changed; submitting open feed");
            self.submit_open_feed()?;
        }

        let content = self.content_for(&filtered, feed_type)?;
        let mut feed = match self.feed.take() {
            Some(feed) => feed,
            None => self.new_feed(feed_type),
        };
        let added = append(&mut feed, &filtered, content, self.encoding);
        if added.is_ok() && feed.is_full() {
            logging::trace_push!(
                feed_id = %feed.feed_id(),
                records = feed.record_count(),
                size = feed.size(),
                "feed full"
            );
            self.submit(feed)?;
        } else {
            self.feed = Some(feed);
        }

        if let Err(error) = &added {
            logging::warn_push!(%error, document_fatal = error.is_document_fatal(), "document not added");
        }
        added.map_err(PushError::from)
    }

    fn content_for(
        &self,
        document: &dyn Document,
        feed_type: FeedType,
    ) -> Result<Content, RepositoryError> {
        if feed_type != FeedType::Content || is_acl_document(document)? {
            return Ok(Content::None);
        }
        let action = find_string(document, names::ACTION)?;
        if action.and_then(|action| action.parse::<ActionType>().ok()) == Some(ActionType::Delete) {
            return Ok(Content::None);
        }

        let alternate = find_string(document, names::TITLE)?
            .map_or_else(|| b" ".to_vec(), String::into_bytes);
        let value = match find_first(document, names::CONTENT)? {
            Some(Value::Binary(value)) => value,
            Some(Value::String(text)) if !text.is_empty() => BinaryValue::from_bytes(text),
            _ => return Ok(Content::Alternate(alternate)),
        };

        match value.len_hint() {
            Some(0) => Ok(Content::Alternate(alternate)),
            Some(length) if length > self.config.max_document_size => {
                logging::warn_push!(
                    length,
                    limit = self.config.max_document_size,
                    "content too large; pushing alternate content"
                );
                Ok(Content::Alternate(alternate))
            }
            _ => Ok(Content::Stream { value, alternate }),
        }
    }

    fn new_feed(&self, feed_type: FeedType) -> Feed {
        let mut urls = UrlConstructor::new(self.data_source.clone(), feed_type);
        if let Some(prefix) = self.urls.content_url_prefix() {
            urls = urls.with_content_url_prefix(prefix);
        }
        let feed = Feed::new(self.data_source.clone(), feed_type, self.config.max_feed_size)
            .with_url_constructor(urls)
            .with_max_document_size(self.config.max_document_size);
        let feed = if self.config.feed_logging {
            feed.with_log()
        } else {
            feed
        };
        logging::trace_push!(feed_id = %feed.feed_id(), %feed_type, "opened feed");
        feed
    }

    fn submit_open_feed(&mut self) -> Result<(), PushError> {
        match self.feed.take() {
            Some(feed) => self.submit(feed),
            None => Ok(()),
        }
    }

    fn submit(&self, feed: Feed) -> Result<(), PushError> {
        if feed.record_count() == 0 {
            return Ok(());
        }
        let payload = feed.into_payload();
        if let Some(log) = payload.log() {
            logging::trace_feed_log!(feed_id = %payload.feed_id(), "{log}");
        }
        logging::trace_push!(
            feed_id = %payload.feed_id(),
            records = payload.record_count(),
            bytes = payload.len(),
            "queued feed"
        );
        self.sender.submit(payload)
    }
}

fn append(
    feed: &mut Feed,
    document: &dyn Document,
    content: Content,
    encoding: ContentEncoding,
) -> Result<(), RecordError> {
    match content {
        Content::None => feed.add_record(document, None, encoding),
        Content::Alternate(bytes) => {
            let mut alternate = bytes.as_slice();
            feed.add_record(document, Some(&mut alternate), encoding)
        }
        Content::Stream { value, alternate } => {
            let mut reader = value.open().map_err(RecordError::Content)?;
            let mut first = [0u8; 1];
            let read = read_first(&mut reader, &mut first).map_err(RecordError::Content)?;
            if read == 0 {
                let mut alternate = alternate.as_slice();
                return feed.add_record(document, Some(&mut alternate), encoding);
            }

            let mut stream = (&first[..read]).chain(reader);
            match feed.add_record(document, Some(&mut stream), encoding) {
                Err(RecordError::ContentTooLarge { limit }) => {
                    logging::warn_push!(limit, "content too large; pushing alternate content");
                    let mut alternate = alternate.as_slice();
                    feed.add_record(document, Some(&mut alternate), encoding)
                }
                other => other,
            }
        }
    }
}

fn read_first(reader: &mut dyn Read, buf: &mut [u8]) -> io::Result<usize> {
    loop {
        match reader.read(buf) {
            Err(error) if error.kind() == io::ErrorKind::Interrupted => {}
            other => return other,
        }
    }
}

impl Pusher for DocPusher {
    fn take(&mut self, document: &dyn Document) -> Result<PusherStatus, PushError> {
        if self.disabled {
            return Ok(PusherStatus::Disabled);
        }
        if !self.sender.is_running() {
            logging::warn_push!(data_source = %self.data_source, "feed sender stopped; disabling pusher");
            self.disabled = true;
            return Ok(PusherStatus::Disabled);
        }
        if let Some(error) = self.sender.take_error() {
            if !error.is_retryable() {
                self.disabled = true;
            }
            return Err(PushError::Feed(error));
        }

        self.accept(document)?;
        Ok(self.status())
    }

    fn flush(&mut self) -> Result<(), PushError> {
        if self.disabled {
            return match self.feed.take() {
                Some(feed) if feed.record_count() > 0 => {
                    let records = feed.record_count();
                    logging::warn_push!(
                        data_source = %self.data_source,
                        feed_id = %feed.feed_id(),
                        records,
                        "pusher disabled; dropping open feed"
                    );
                    Err(PushError::Discarded { records })
                }
                _ => Ok(()),
            };
        }
        self.submit_open_feed()?;
        self.sender.wait_idle()?;
        if let Some(error) = self.sender.take_error() {
            return Err(PushError::Feed(error));
        }
        logging::trace_push!(data_source = %self.data_source, "flushed");
        Ok(())
    }

    fn cancel(&mut self) {
        if let Some(feed) = self.feed.take() {
            logging::trace_push!(
                feed_id = %feed.feed_id(),
                records = feed.record_count(),
                "discarded open feed"
            );
        }
        self.sender.cancel();
        self.disabled = true;
    }

    fn status(&self) -> PusherStatus {
        if self.disabled || !self.sender.is_running() {
            PusherStatus::Disabled
        } else if self.sender.in_flight_bytes() > self.config.max_in_flight_bytes {
            PusherStatus::LowMemory
        } else if self.sender.pending() > self.config.max_feeds_in_flight {
            PusherStatus::LocalFeedBacklog
        } else if self.connection.is_backlogged() {
            PusherStatus::GsaFeedBacklog
        } else {
            PusherStatus::Ok
        }
    }
}

impl Drop for DocPusher {
    fn drop(&mut self) {
        if let Some(feed) = self.feed.take().filter(|feed| feed.record_count() > 0) {
            logging::warn_push!(
                data_source = %self.data_source,
                feed_id = %feed.feed_id(),
                records = feed.record_count(),
                "pusher dropped with an unsubmitted feed"
            );
        }
    }
}

impl fmt::Debug for DocPusher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocPusher")
            .field("data_source", &self.data_source)
            .field("encoding", &self.encoding)
            .field("open_feed", &self.open_feed_id())
            .field("disabled", &self.disabled)
            .finish_non_exhaustive()
    }
}

/// Creates [`DocPusher`]s sharing one connection and configuration.
#[derive(Clone)]
pub struct DocPusherFactory {
    connection: Arc<dyn FeedConnection>,
    config: PusherConfig,
}

impl DocPusherFactory {
    /// Creates a factory for pushers delivering to `connection`.
    #[must_use]
    pub fn new(connection: Arc<dyn FeedConnection>, config: PusherConfig) -> Self {
        Self { connection, config }
    }

    /// Returns the configuration handed to new pushers.
    #[must_use]
    pub const fn config(&self) -> &PusherConfig {
        &self.config
    }
}

impl fmt::Debug for DocPusherFactory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DocPusherFactory")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl PusherFactory for DocPusherFactory {
    type Pusher = DocPusher;

    fn new_pusher(&self, data_source: &str) -> Result<DocPusher, PushError> {
        DocPusher::new(data_source, Arc::clone(&self.connection), self.config.clone())
    }
}
