use std::collections::BTreeSet;

use spi::{Document, Property, RepositoryError, names};
use urls::{UrlConstructor, UrlError};

use crate::DocumentFilter;

/// Synthesises `google:aclinheritfrom` from the
/// `google:aclinheritfrom:docid` triple.
///
/// The docid, feed type and fragment properties used for the fabrication are
/// hidden from the filtered view so the feed only carries the URL.
#[derive(Clone, Debug)]
pub struct AclInheritFromDocidFilter {
    urls: UrlConstructor,
}

const HIDDEN: [&str; 3] = [
    names::ACLINHERITFROM_DOCID,
    names::ACLINHERITFROM_FEEDTYPE,
    names::ACLINHERITFROM_FRAGMENT,
];

impl AclInheritFromDocidFilter {
    /// Creates a filter fabricating URLs with `urls`.
    #[must_use]
    pub const fn new(urls: UrlConstructor) -> Self {
        Self { urls }
    }
}

impl DocumentFilter for AclInheritFromDocidFilter {
    fn find_property(
        &self,
        source: &dyn Document,
        name: &str,
    ) -> Result<Option<Property>, RepositoryError> {
        if HIDDEN.contains(&name) {
            return Ok(None);
        }
        if name != names::ACLINHERITFROM {
            return source.find_property(name);
        }

        match self.urls.inherit_from_url(source) {
            Ok(Some(url)) => {
                logging::trace_acl!(%url, "synthesised inherit-from URL");
                Ok(Some(Property::single(url)))
            }
            Ok(None) => source.find_property(name),
            Err(UrlError::Repository(error)) => Err(error),
            Err(error) => Err(RepositoryError::Document(error.to_string())),
        }
    }

    fn property_names(&self, source: &dyn Document) -> Result<BTreeSet<String>, RepositoryError> {
        let mut visible = source.property_names()?;
        if visible.contains(names::ACLINHERITFROM_DOCID) {
            visible.insert(names::ACLINHERITFROM.to_owned());
        }
        visible.retain(|name| !HIDDEN.contains(&name.as_str()));
        Ok(visible)
    }
}
