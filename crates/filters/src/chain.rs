use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use spi::{Document, RepositoryError, names};
use urls::UrlConstructor;

use crate::{
    AclInheritFromDocidFilter, AclRolesFilter, DocumentFilter, FilteredDocument, StripAclFilter,
    StripMode,
};

type Predicate = Box<dyn Fn(&BTreeSet<String>) -> bool + Send + Sync>;

struct Stage {
    name: &'static str,
    applies: Predicate,
    filter: Arc<dyn DocumentFilter>,
}

/// Ordered list of conditional filters.
///
/// [`compose`](Self::compose) checks each stage's predicate against the
/// source document's property names and stacks the filters of matching
/// stages, first stage innermost.
#[derive(Default)]
pub struct DocumentFilterChain {
    stages: Vec<Stage>,
}

impl DocumentFilterChain {
    /// Creates an empty chain; composing with it yields the source unchanged.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the standard ACL chain.
    ///
    /// Inherit-from synthesis applies when `google:aclinheritfrom` is absent
    /// and `google:aclinheritfrom:docid` is present. Role merging applies when
    /// any per-scope role property is present. When `strip` is set, ACL
    /// properties selected by the mode are then removed from every document.
    #[must_use]
    pub fn acl(urls: UrlConstructor, strip: Option<StripMode>) -> Self {
        let chain = Self::new()
            .with_stage(
                "acl-inherit-from-docid",
                |present| {
                    !present.contains(names::ACLINHERITFROM)
                        && present.contains(names::ACLINHERITFROM_DOCID)
                },
                AclInheritFromDocidFilter::new(urls),
            )
            .with_stage(
                "acl-roles",
                |present| present.iter().any(|name| names::is_role_property(name)),
                AclRolesFilter,
            );

        match strip {
            Some(mode) => chain.with_filter("strip-acl", StripAclFilter::new(mode)),
            None => chain,
        }
    }

    /// Appends a stage that applies when `applies` accepts the source
    /// document's property names.
    #[must_use]
    pub fn with_stage<P, F>(mut self, name: &'static str, applies: P, filter: F) -> Self
    where
        P: Fn(&BTreeSet<String>) -> bool + Send + Sync + 'static,
        F: DocumentFilter + 'static,
    {
        self.stages.push(Stage {
            name,
            applies: Box::new(applies),
            filter: Arc::new(filter),
        });
        self
    }

    /// Appends a stage that applies to every document.
    #[must_use]
    pub fn with_filter<F>(self, name: &'static str, filter: F) -> Self
    where
        F: DocumentFilter + 'static,
    {
        self.with_stage(name, |_| true, filter)
    }

    /// Returns the stage names in application order.
    pub fn stage_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.stages.iter().map(|stage| stage.name)
    }

    /// Stacks the applicable filters over `source`.
    ///
    /// Fails only when listing the source's property names fails.
    pub fn compose<'a>(
        &self,
        source: &'a dyn Document,
    ) -> Result<FilteredDocument<'a>, RepositoryError> {
        if self.stages.is_empty() {
            return Ok(FilteredDocument::new(source, Vec::new()));
        }

        let present = source.property_names()?;
        let filters: Vec<Arc<dyn DocumentFilter>> = self
            .stages
            .iter()
            .filter(|stage| (stage.applies)(&present))
            .inspect(|stage| logging::trace_acl!(stage = stage.name, "filter applies"))
            .map(|stage| Arc::clone(&stage.filter))
            .collect();

        Ok(FilteredDocument::new(source, filters))
    }
}

impl fmt::Debug for DocumentFilterChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.stages.iter().map(|stage| stage.name))
            .finish()
    }
}

#[cfg(test)]
mod tests;
