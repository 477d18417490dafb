//! Record head construction: the `<record>` start tag and `<metadata>`.

use filters::acl::{merged_acl, role_prefix};
use spi::{
    ActionType, Document, find_boolean, find_date, find_string, names,
};
use time::UtcOffset;
use time::macros::format_description;
use urls::UrlConstructor;

use crate::RecordError;
use crate::escape::push_attribute;

/// `authmethod` value marking a record that needs connector authorization.
pub const AUTHMETHOD_HTTPBASIC: &str = "httpbasic";

/// Serialized start of one record.
#[derive(Debug)]
pub(crate) struct RecordHead {
    pub(crate) url: String,
    pub(crate) xml: String,
    pub(crate) content_allowed: bool,
}

/// Builds the record start tag and metadata block for `document`.
///
/// `metadata_and_url` is the feed's header type; such feeds never carry
/// content and accept the crawl hints.
pub(crate) fn build_head(
    document: &dyn Document,
    urls: &UrlConstructor,
    metadata_and_url: bool,
) -> Result<RecordHead, RecordError> {
    let url = urls.record_url(document)?;
    let display_url = find_string(document, names::DISPLAYURL)?;
    let action = resolve_action(document)?;
    let lock = find_boolean(document, names::LOCK)?.unwrap_or(false);
    let pagerank = find_string(document, names::PAGERANK)?;
    let mimetype = find_string(document, names::MIMETYPE)?;
    let last_modified = find_date(document, names::LASTMODIFIED)?;
    let is_public = find_boolean(document, names::ISPUBLIC)?;

    let mut xml = String::with_capacity(512);
    xml.push_str("<record");
    push_attribute(&mut xml, "url", &url);
    if let Some(display_url) = display_url.as_deref() {
        push_attribute(&mut xml, "displayurl", display_url);
    }
    if let Some(action) = action {
        push_attribute(&mut xml, "action", action.as_str());
    }
    push_attribute(
        &mut xml,
        "mimetype",
        mimetype.as_deref().unwrap_or(names::DEFAULT_MIMETYPE),
    );
    if let Some(date) = last_modified {
        let formatted = date
            .to_offset(UtcOffset::UTC)
            .format(format_description!(
                "[weekday repr:short], [day] [month repr:short] [year] [hour]:[minute]:[second] GMT"
            ));
        match formatted {
            Ok(text) => push_attribute(&mut xml, "last-modified", &text),
            Err(error) => logging::warn_record!(%url, %error, "cannot format last-modified"),
        }
    }
    if lock {
        push_attribute(&mut xml, "lock", "true");
    }
    if let Some(pagerank) = pagerank.as_deref() {
        push_attribute(&mut xml, "pagerank", pagerank);
    }
    if is_public == Some(false) {
        push_attribute(&mut xml, "authmethod", AUTHMETHOD_HTTPBASIC);
    }
    if metadata_and_url {
        if find_boolean(document, names::CRAWL_IMMEDIATELY)? == Some(true) {
            push_attribute(&mut xml, "crawl-immediately", "true");
        }
        if find_boolean(document, names::CRAWL_ONCE)? == Some(true) {
            push_attribute(&mut xml, "crawl-once", "true");
        }
    }
    xml.push('>');

    let is_delete = action == Some(ActionType::Delete);
    if !is_delete {
        push_metadata(&mut xml, document)?;
    }

    Ok(RecordHead {
        url,
        xml,
        content_allowed: !is_delete && !metadata_and_url,
    })
}

fn resolve_action(document: &dyn Document) -> Result<Option<ActionType>, RecordError> {
    let Some(raw) = find_string(document, names::ACTION)? else {
        return Ok(None);
    };
    match raw.parse() {
        Ok(action) => Ok(Some(action)),
        Err(_) => {
            logging::warn_record!(action = %raw, "ignoring invalid action");
            Ok(None)
        }
    }
}

/// Properties that never become `<meta>` elements.
fn skipped_in_metadata(name: &str) -> bool {
    matches!(
        name,
        names::CONTENT
            | names::DOCID
            | names::LOCK
            | names::PAGERANK
            | names::CRAWL_IMMEDIATELY
            | names::CRAWL_ONCE
    ) || names::is_role_property(name)
}

fn push_metadata(xml: &mut String, document: &dyn Document) -> Result<(), RecordError> {
    let mut entries = String::new();
    for name in document.property_names()? {
        if skipped_in_metadata(&name) {
            continue;
        }
        let property = if role_prefix(&name).is_some() {
            merged_acl(document, &name)?
        } else {
            document.find_property(&name)?
        };
        let Some(property) = property else {
            continue;
        };

        for value in &property {
            let content = value.to_string();
            if content.is_empty() {
                continue;
            }
            entries.push_str("<meta");
            push_attribute(&mut entries, "name", &name);
            push_attribute(&mut entries, "content", &content);
            entries.push_str("/>\n");
        }
    }

    if !entries.is_empty() {
        xml.push_str("\n<metadata>\n");
        xml.push_str(&entries);
        xml.push_str("</metadata>");
    }
    Ok(())
}
