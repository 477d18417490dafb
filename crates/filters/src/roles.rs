use std::collections::BTreeSet;

use spi::{Document, Property, RepositoryError, names};

use crate::DocumentFilter;
use crate::acl::merged_acl;

/// Folds `google:user:roles:*` and `google:group:roles:*` properties into the
/// `google:aclusers` and `google:aclgroups` scope lists.
///
/// The role properties themselves are hidden from the filtered view.
#[derive(Clone, Copy, Debug, Default)]
pub struct AclRolesFilter;

impl DocumentFilter for AclRolesFilter {
    fn find_property(
        &self,
        source: &dyn Document,
        name: &str,
    ) -> Result<Option<Property>, RepositoryError> {
        match name {
            names::ACLUSERS | names::ACLGROUPS => merged_acl(source, name),
            _ if names::is_role_property(name) => Ok(None),
            _ => source.find_property(name),
        }
    }

    fn property_names(&self, source: &dyn Document) -> Result<BTreeSet<String>, RepositoryError> {
        let mut visible = source.property_names()?;
        visible.retain(|name| !names::is_role_property(name));
        Ok(visible)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spi::SimpleDocument;

    #[test]
    fn merges_roles_and_hides_role_properties() {
        let source = SimpleDocument::new()
            .with_string(names::DOCID, "1")
            .with_strings(names::ACLUSERS, ["joe", "mary"])
            .with_strings(names::user_roles("mary"), ["reader", "writer"])
            .with_strings(names::ACLGROUPS, ["staff"])
            .with_strings(names::group_roles("staff"), ["owner"]);

        let users: Vec<String> = AclRolesFilter
            .find_property(&source, names::ACLUSERS)
            .unwrap()
            .unwrap()
            .iter()
            .map(ToString::to_string)
            .collect();
        assert_eq!(users, ["joe", "mary=reader", "mary=writer"]);

        let groups = AclRolesFilter
            .find_property(&source, names::ACLGROUPS)
            .unwrap()
            .unwrap();
        assert_eq!(groups.first().unwrap().to_string(), "staff=owner");

        let visible = AclRolesFilter.property_names(&source).unwrap();
        assert!(visible.iter().all(|name| !names::is_role_property(name)));
        assert!(
            AclRolesFilter
                .find_property(&source, &names::user_roles("mary"))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn other_properties_pass_through() {
        let source = SimpleDocument::new().with_string("author", "joe");
        let author = AclRolesFilter.find_property(&source, "author").unwrap();
        assert_eq!(author.unwrap().first().unwrap().to_string(), "joe");
    }
}
