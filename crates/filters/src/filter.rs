use std::collections::BTreeSet;
use std::fmt;
use std::sync::Arc;

use spi::{Document, Property, RepositoryError};

/// A lazy document transform.
///
/// Implementations answer lookups for the document they wrap. `source` is
/// the document as seen after every filter applied before this one.
pub trait DocumentFilter: fmt::Debug + Send + Sync {
    /// Looks up `name` on the filtered view of `source`.
    fn find_property(
        &self,
        source: &dyn Document,
        name: &str,
    ) -> Result<Option<Property>, RepositoryError>;

    /// Returns the property names visible on the filtered view of `source`.
    fn property_names(&self, source: &dyn Document) -> Result<BTreeSet<String>, RepositoryError>;
}

/// A source document viewed through a stack of filters.
pub struct FilteredDocument<'a> {
    source: &'a dyn Document,
    filters: Vec<Arc<dyn DocumentFilter>>,
}

impl<'a> FilteredDocument<'a> {
    pub(crate) fn new(source: &'a dyn Document, filters: Vec<Arc<dyn DocumentFilter>>) -> Self {
        Self { source, filters }
    }

    /// Returns the number of filters stacked on the source.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.filters.len()
    }

    /// Returns `true` when lookups reach the source directly.
    #[must_use]
    pub fn is_passthrough(&self) -> bool {
        self.filters.is_empty()
    }

    fn view(&self) -> Layer<'_> {
        Layer {
            source: self.source,
            filters: &self.filters,
        }
    }
}

impl fmt::Debug for FilteredDocument<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FilteredDocument")
            .field("filters", &self.filters)
            .finish_non_exhaustive()
    }
}

impl Document for FilteredDocument<'_> {
    fn find_property(&self, name: &str) -> Result<Option<Property>, RepositoryError> {
        self.view().find_property(name)
    }

    fn property_names(&self) -> Result<BTreeSet<String>, RepositoryError> {
        self.view().property_names()
    }
}

// The source plus a prefix of the filter stack; the last filter is outermost.
struct Layer<'a> {
    source: &'a dyn Document,
    filters: &'a [Arc<dyn DocumentFilter>],
}

impl Document for Layer<'_> {
    fn find_property(&self, name: &str) -> Result<Option<Property>, RepositoryError> {
        match self.filters.split_last() {
            None => self.source.find_property(name),
            Some((outer, inner)) => outer.find_property(
                &Layer {
                    source: self.source,
                    filters: inner,
                },
                name,
            ),
        }
    }

    fn property_names(&self) -> Result<BTreeSet<String>, RepositoryError> {
        match self.filters.split_last() {
            None => self.source.property_names(),
            Some((outer, inner)) => outer.property_names(&Layer {
                source: self.source,
                filters: inner,
            }),
        }
    }
}
