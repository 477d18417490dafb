//! Feed delivery over the appliance's HTTP feed port.

use std::sync::OnceLock;
use std::time::Duration;

use feed::FeedPayload;
use reqwest::blocking::{Client, multipart};
use url::Url;

use crate::backlog::{
    BacklogMonitor, DEFAULT_BACKLOG_CEILING, DEFAULT_BACKLOG_FLOOR, DEFAULT_BACKLOG_INTERVAL,
};
use crate::connection::DEFAULT_CONTENT_ENCODINGS;
use crate::{FeedConnection, FeedError, response};

/// Path accepting feed submissions.
pub const FEED_PATH: &str = "xmlfeed";
/// Path reporting the number of unprocessed feed items.
pub const BACKLOG_PATH: &str = "getbacklogcount";
/// Path reporting the feed DTD version.
pub const DTD_VERSION_PATH: &str = "getdtdversion";
/// Path reporting accepted content encodings.
pub const CONTENT_ENCODINGS_PATH: &str = "getcontentencodings";

/// First DTD version that understands inherited ACLs.
pub const INHERITED_ACL_DTD_VERSION: (u32, u32) = (6, 14);

/// Settings for [`HttpFeedConnection`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HttpConfig {
    /// Base URL of the appliance feed port, e.g. `http://gsa:19900/`.
    pub base_url: String,
    /// Timeout applied to every request.
    pub timeout: Duration,
    /// Backlog count at which feeding pauses.
    pub backlog_ceiling: u64,
    /// Backlog count below which feeding resumes.
    pub backlog_floor: u64,
    /// Minimum time between backlog polls.
    pub backlog_interval: Duration,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:19900/".to_owned(),
            timeout: Duration::from_secs(60),
            backlog_ceiling: DEFAULT_BACKLOG_CEILING,
            backlog_floor: DEFAULT_BACKLOG_FLOOR,
            backlog_interval: DEFAULT_BACKLOG_INTERVAL,
        }
    }
}

impl HttpConfig {
    /// Creates a configuration for the appliance at `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the backlog ceiling and floor.
    #[must_use]
    pub const fn with_backlog_thresholds(mut self, ceiling: u64, floor: u64) -> Self {
        self.backlog_ceiling = ceiling;
        self.backlog_floor = floor;
        self
    }

    /// Sets the minimum time between backlog polls.
    #[must_use]
    pub const fn with_backlog_interval(mut self, interval: Duration) -> Self {
        self.backlog_interval = interval;
        self
    }
}

/// Delivers feeds with multipart `POST`s to `<base>/xmlfeed`.
#[derive(Debug)]
pub struct HttpFeedConnection {
    client: Client,
    base: Url,
    backlog: BacklogMonitor,
    content_encodings: OnceLock<String>,
    inherited_acls: OnceLock<bool>,
}

impl HttpFeedConnection {
    /// Builds a connection from `config`.
    pub fn new(config: &HttpConfig) -> Result<Self, FeedError> {
        let mut base = Url::parse(&config.base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            base,
            backlog: BacklogMonitor::new(
                config.backlog_ceiling,
                config.backlog_floor,
                config.backlog_interval,
            ),
            content_encodings: OnceLock::new(),
            inherited_acls: OnceLock::new(),
        })
    }

    /// Returns the base URL requests are made against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn endpoint(&self, path: &str) -> Result<Url, FeedError> {
        Ok(self.base.join(path)?)
    }

    fn get_text(&self, path: &str) -> Result<String, FeedError> {
        let response = self.client.get(self.endpoint(path)?).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }
        Ok(response.text()?.trim().to_owned())
    }

    /// Fetches the appliance's unprocessed feed item count.
    pub fn backlog_count(&self) -> Result<u64, FeedError> {
        let text = self.get_text(BACKLOG_PATH)?;
        text.parse()
            .map_err(|_| FeedError::Rejected(format!("unexpected backlog count '{text}'")))
    }
}

impl FeedConnection for HttpFeedConnection {
    fn send_data(&self, payload: &FeedPayload) -> Result<String, FeedError> {
        let data = multipart::Part::bytes(payload.bytes().to_vec())
            .file_name("feed.xml")
            .mime_str("text/xml")?;
        let form = multipart::Form::new()
            .text("datasource", payload.data_source().to_owned())
            .text("feedtype", payload.feed_type())
            .part("data", data);

        logging::trace_send!(
            feed_id = %payload.feed_id(),
            records = payload.record_count(),
            bytes = payload.len(),
            "posting feed"
        );
        let response = self
            .client
            .post(self.endpoint(FEED_PATH)?)
            .multipart(form)
            .send()?;
        let status = response.status();
        let body = response.text()?;
        if !status.is_success() {
            return Err(FeedError::Status {
                status: status.as_u16(),
            });
        }

        response::classify(&body)?;
        logging::trace_send!(feed_id = %payload.feed_id(), "feed accepted");
        Ok(body.trim().to_owned())
    }

    fn is_backlogged(&self) -> bool {
        self.backlog.check(|| match self.backlog_count() {
            Ok(count) => Some(count),
            Err(error) => {
                logging::warn_send!(%error, "cannot read appliance backlog");
                None
            }
        })
    }

    fn content_encodings(&self) -> String {
        self.content_encodings
            .get_or_init(|| match self.get_text(CONTENT_ENCODINGS_PATH) {
                Ok(text) if !text.is_empty() => text,
                Ok(_) => DEFAULT_CONTENT_ENCODINGS.to_owned(),
                Err(error) => {
                    logging::warn_send!(%error, "cannot read content encodings");
                    DEFAULT_CONTENT_ENCODINGS.to_owned()
                }
            })
            .clone()
    }

    fn supports_inherited_acls(&self) -> bool {
        *self
            .inherited_acls
            .get_or_init(|| match self.get_text(DTD_VERSION_PATH) {
                Ok(version) => supports_inherited_acls(&version),
                Err(error) => {
                    logging::warn_send!(%error, "cannot read DTD version");
                    false
                }
            })
    }
}

/// Returns `true` when a DTD version string is at least
/// [`INHERITED_ACL_DTD_VERSION`].
#[must_use]
pub fn supports_inherited_acls(version: &str) -> bool {
    let mut parts = version.trim().split('.').map(|part| part.trim().parse::<u32>());
    match (parts.next(), parts.next()) {
        (Some(Ok(major)), Some(Ok(minor))) => (major, minor) >= INHERITED_ACL_DTD_VERSION,
        (Some(Ok(major)), None) => major > INHERITED_ACL_DTD_VERSION.0,
        _ => false,
    }
}

#[cfg(test)]
mod tests;
