use std::io::{self, Read};

use spi::{Document, FeedType};
use urls::UrlConstructor;
use uuid::Uuid;

use crate::buffer::FeedBuffer;
use crate::escape::escape_into;
use crate::record::build_head;
use crate::{ContentEncoding, FeedPayload, RecordError};

const XML_DECLARATION: &str = "<?xml version='1.0' encoding='UTF-8'?>\n";
const DOCTYPE: &str = "<!DOCTYPE gsafeed PUBLIC \"-//Google//DTD GSA Feeds//EN\" \"gsafeed.dtd\">\n";
const FOOTER: &str = "</group>\n</gsafeed>\n";

/// Text standing in for content in the log-friendly copy of a feed.
pub const CONTENT_PLACEHOLDER: &str = "...content...";

/// One batch of records for a single data source and feed type.
///
/// The XML prologue and header are written on construction and the footer
/// on [`close`](Self::close). Records are appended in call order.
#[derive(Debug)]
pub struct Feed {
    feed_id: Uuid,
    data_source: String,
    feed_type: FeedType,
    max_size: usize,
    max_document_size: Option<u64>,
    urls: UrlConstructor,
    buffer: FeedBuffer,
    log: Option<String>,
    record_count: usize,
    closed: bool,
}

impl Feed {
    /// Creates a feed and writes its prologue.
    ///
    /// `max_size` is the size the feed should not grow past; it drives
    /// [`is_full`](Self::is_full) and does not reject records.
    #[must_use]
    pub fn new(data_source: impl Into<String>, feed_type: FeedType, max_size: usize) -> Self {
        let data_source = data_source.into();
        let urls = UrlConstructor::new(data_source.clone(), feed_type);
        let mut feed = Self {
            feed_id: Uuid::new_v4(),
            data_source,
            feed_type,
            max_size,
            max_document_size: None,
            urls,
            buffer: FeedBuffer::with_capacity(max_size.clamp(1024, 1024 * 1024)),
            log: None,
            record_count: 0,
            closed: false,
        };
        let prologue = feed.prologue();
        feed.buffer.extend_from_slice(prologue.as_bytes());
        feed
    }

    /// Keeps a log-friendly copy of every record, with content replaced by
    /// [`CONTENT_PLACEHOLDER`].
    #[must_use]
    pub fn with_log(mut self) -> Self {
        let mut log = String::from_utf8_lossy(self.buffer.as_slice()).into_owned();
        log.reserve(4096);
        self.log = Some(log);
        self
    }

    /// Replaces the URL constructor, typically to supply a content URL
    /// prefix.
    #[must_use]
    pub fn with_url_constructor(mut self, urls: UrlConstructor) -> Self {
        self.urls = urls;
        self
    }

    /// Rejects content streams longer than `limit` bytes.
    #[must_use]
    pub const fn with_max_document_size(mut self, limit: u64) -> Self {
        self.max_document_size = Some(limit);
        self
    }

    fn prologue(&self) -> String {
        let mut text = String::with_capacity(256);
        text.push_str(XML_DECLARATION);
        text.push_str(DOCTYPE);
        text.push_str("<gsafeed>\n<header>\n<datasource>");
        escape_into(&mut text, &self.data_source);
        text.push_str("</datasource>\n<feedtype>");
        text.push_str(self.feed_type.xml_feed_type());
        text.push_str("</feedtype>\n</header>\n<group>\n");
        text
    }

    /// Returns the unique id of this feed.
    #[must_use]
    pub const fn feed_id(&self) -> Uuid {
        self.feed_id
    }

    /// Returns the data source named in the header.
    #[must_use]
    pub fn data_source(&self) -> &str {
        &self.data_source
    }

    /// Returns the feed type the feed was created for.
    #[must_use]
    pub const fn feed_type(&self) -> FeedType {
        self.feed_type
    }

    /// Returns the number of records added.
    #[must_use]
    pub const fn record_count(&self) -> usize {
        self.record_count
    }

    /// Returns the current size in bytes.
    #[must_use]
    pub fn size(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the configured maximum size.
    #[must_use]
    pub const fn max_size(&self) -> usize {
        self.max_size
    }

    /// Returns `true` once [`close`](Self::close) has run.
    #[must_use]
    pub const fn is_closed(&self) -> bool {
        self.closed
    }

    /// Returns the serialized bytes so far.
    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    /// Returns the log-friendly copy, when enabled.
    #[must_use]
    pub fn log(&self) -> Option<&str> {
        self.log.as_deref()
    }

    /// Returns `true` when another record of average size would likely push
    /// the feed past its maximum.
    ///
    /// With `avg` the mean record size and `remaining` the bytes left, the
    /// feed is full when `remaining < 3 * avg`, not full when
    /// `remaining > 10 * avg`, and otherwise full when less than a tenth of
    /// the maximum remains. An empty feed is never full.
    #[must_use]
    pub fn is_full(&self) -> bool {
        if self.record_count == 0 {
            return false;
        }
        let size = self.size();
        let average = size / self.record_count;
        let remaining = self.max_size.saturating_sub(size);

        if remaining < average.saturating_mul(3) {
            true
        } else if remaining > average.saturating_mul(10) {
            false
        } else {
            remaining < self.max_size / 10
        }
    }

    /// Appends the record for `document`.
    ///
    /// `content` is streamed straight into the feed in `encoding` when the
    /// record may carry content; deletes and `metadata-and-url` feeds never
    /// read it. On any error the feed is left untouched.
    pub fn add_record(
        &mut self,
        document: &dyn Document,
        content: Option<&mut dyn Read>,
        encoding: ContentEncoding,
    ) -> Result<(), RecordError> {
        if self.closed {
            return Err(RecordError::Closed);
        }

        let mark = self.buffer.len();
        let log_mark = self.log.as_ref().map(String::len);

        let result = self.write_record(document, content, encoding);
        match result {
            Ok(url) => {
                self.record_count += 1;
                logging::trace_record!(
                    feed_id = %self.feed_id,
                    %url,
                    size = self.buffer.len() - mark,
                    "added record"
                );
                Ok(())
            }
            Err(error) => {
                self.buffer.truncate(mark);
                if let (Some(log), Some(log_mark)) = (self.log.as_mut(), log_mark) {
                    log.truncate(log_mark);
                }
                Err(error)
            }
        }
    }

    fn write_record(
        &mut self,
        document: &dyn Document,
        content: Option<&mut dyn Read>,
        encoding: ContentEncoding,
    ) -> Result<String, RecordError> {
        let head = build_head(document, &self.urls, self.feed_type.is_metadata_and_url())?;
        self.buffer.extend_from_slice(head.xml.as_bytes());
        self.append_log(&head.xml);

        if let Some(content) = content.filter(|_| head.content_allowed) {
            let open = format!("\n<content encoding=\"{encoding}\">");
            self.buffer.extend_from_slice(open.as_bytes());
            self.append_log(&open);

            let copied = match self.max_document_size {
                Some(limit) => {
                    let mut limited = LimitedReader::new(content, limit);
                    let copied = encoding.encode(&mut limited, &mut self.buffer);
                    if limited.exceeded {
                        return Err(RecordError::ContentTooLarge { limit });
                    }
                    copied
                }
                None => encoding.encode(content, &mut self.buffer),
            }
            .map_err(RecordError::Content)?;
            logging::trace_record!(bytes = copied, %encoding, "streamed content");

            self.buffer.extend_from_slice(b"</content>");
            self.append_log(CONTENT_PLACEHOLDER);
            self.append_log("</content>");
        }

        self.buffer.extend_from_slice(b"\n</record>\n");
        self.append_log("\n</record>\n");
        Ok(head.url)
    }

    fn append_log(&mut self, text: &str) {
        if let Some(log) = self.log.as_mut() {
            log.push_str(text);
        }
    }

    /// Writes the footer. Further calls have no effect.
    pub fn close(&mut self) {
        if self.closed {
            return;
        }
        self.buffer.extend_from_slice(FOOTER.as_bytes());
        self.append_log(FOOTER);
        self.closed = true;
    }

    /// Closes the feed and hands over its bytes.
    #[must_use]
    pub fn into_payload(mut self) -> FeedPayload {
        self.close();
        FeedPayload {
            feed_id: self.feed_id,
            data_source: self.data_source,
            feed_type: self.feed_type.xml_feed_type(),
            bytes: self.buffer.into_vec(),
            record_count: self.record_count,
            log: self.log,
        }
    }
}

/// Reader that stops after `limit` bytes and flags whether more remained.
struct LimitedReader<'a> {
    inner: &'a mut dyn Read,
    remaining: u64,
    exceeded: bool,
}

impl<'a> LimitedReader<'a> {
    fn new(inner: &'a mut dyn Read, limit: u64) -> Self {
        Self {
            inner,
            remaining: limit,
            exceeded: false,
        }
    }
}

impl Read for LimitedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 {
            let mut probe = [0u8; 1];
            if self.inner.read(&mut probe)? > 0 {
                self.exceeded = true;
            }
            return Ok(0);
        }
        let max = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let read = self.inner.read(&mut buf[..max])?;
        self.remaining -= read as u64;
        Ok(read)
    }
}
