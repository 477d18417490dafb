use std::collections::BTreeSet;

use spi::{Document, Property, RepositoryError, names};

use crate::DocumentFilter;

/// Which ACL properties a [`StripAclFilter`] removes.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum StripMode {
    /// Every ACL property, including roles and inheritance.
    #[default]
    All,
    /// Only the inheritance properties, for appliances that do not
    /// understand inherited ACLs.
    Inheritance,
}

impl StripMode {
    fn strips(self, name: &str) -> bool {
        match self {
            Self::All => names::is_acl_property(name),
            Self::Inheritance => matches!(
                name,
                names::ACLINHERITFROM
                    | names::ACLINHERITFROM_DOCID
                    | names::ACLINHERITFROM_FEEDTYPE
                    | names::ACLINHERITFROM_FRAGMENT
                    | names::ACLINHERITANCETYPE
            ),
        }
    }
}

/// Hides ACL properties from the filtered view.
#[derive(Clone, Copy, Debug, Default)]
pub struct StripAclFilter {
    mode: StripMode,
}

impl StripAclFilter {
    /// Creates a filter stripping the properties selected by `mode`.
    #[must_use]
    pub const fn new(mode: StripMode) -> Self {
        Self { mode }
    }

    /// Returns the strip mode.
    #[must_use]
    pub const fn mode(&self) -> StripMode {
        self.mode
    }
}

impl DocumentFilter for StripAclFilter {
    fn find_property(
        &self,
        source: &dyn Document,
        name: &str,
    ) -> Result<Option<Property>, RepositoryError> {
        if self.mode.strips(name) {
            Ok(None)
        } else {
            source.find_property(name)
        }
    }

    fn property_names(&self, source: &dyn Document) -> Result<BTreeSet<String>, RepositoryError> {
        let mut visible = source.property_names()?;
        visible.retain(|name| !self.mode.strips(name));
        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spi::SimpleDocument;

    fn source() -> SimpleDocument {
        SimpleDocument::new()
            .with_string(names::DOCID, "1")
            .with_strings(names::ACLUSERS, ["joe"])
            .with_strings(names::user_roles("joe"), ["reader"])
            .with_string(names::ACLINHERITFROM, "http://parent/")
            .with_string(names::ACLINHERITANCETYPE, "parent-overrides")
    }

    #[test]
    fn all_mode_removes_every_acl_property() {
        let filter = StripAclFilter::default();
        let visible: Vec<String> = filter.property_names(&source()).unwrap().into_iter().collect();
        assert_eq!(visible, [names::DOCID]);
        assert!(
            filter
                .find_property(&source(), names::ACLUSERS)
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn inheritance_mode_keeps_scopes() {
        let filter = StripAclFilter::new(StripMode::Inheritance);
        let source = source();
        let visible = filter.property_names(&source).unwrap();
        assert!(visible.contains(names::ACLUSERS));
        assert!(!visible.contains(names::ACLINHERITFROM));
        assert!(!visible.contains(names::ACLINHERITANCETYPE));
        assert!(
            filter
                .find_property(&source, names::ACLUSERS)
                .unwrap()
                .is_some()
        );
    }
}
