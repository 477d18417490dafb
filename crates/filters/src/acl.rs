//! ACL entry merging.
//!
//! Legacy connectors describe roles through one property per scope, for
//! example `google:user:roles:joe = [reader]`. The feed wants them folded into
//! the scope lists themselves as `scope=role` entries. [`merge_entries`] does
//! the folding for an arbitrary role lookup and [`merged_acl`] applies it to
//! a document.

use spi::{Document, Property, RepositoryError, Value, names};

/// Returns the role property prefix paired with an ACL scope property, or
/// `None` when the property carries no roles (deny lists, inheritance).
#[must_use]
pub fn role_prefix(acl_property: &str) -> Option<&'static str> {
    match acl_property {
        names::ACLUSERS => Some(names::USER_ROLES_PREFIX),
        names::ACLGROUPS => Some(names::GROUP_ROLES_PREFIX),
        _ => None,
    }
}

/// Folds roles into a list of scopes.
///
/// Scopes are trimmed and blank ones dropped. A scope with roles expands to
/// one `scope=role` entry per non-blank role, in role order; a scope without
/// roles is kept bare. The output preserves scope order.
pub fn merge_entries<F>(scopes: &Property, mut roles_for: F) -> Result<Property, RepositoryError>
where
    F: FnMut(&str) -> Result<Option<Property>, RepositoryError>,
{
    let mut merged = Vec::with_capacity(scopes.len());
    for value in scopes {
        let text = value.to_string();
        let scope = text.trim();
        if scope.is_empty() {
            continue;
        }

        let roles: Vec<String> = roles_for(scope)?
            .map(|property| {
                property
                    .iter()
                    .map(|role| role.to_string().trim().to_owned())
                    .filter(|role| !role.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        if roles.is_empty() {
            merged.push(Value::string(scope));
        } else {
            merged.extend(
                roles
                    .into_iter()
                    .map(|role| Value::String(format!("{scope}={role}"))),
            );
        }
    }
    Ok(Property::new(merged))
}

/// Reads `acl_property` from `document` with its per-scope roles merged in.
///
/// Returns `Ok(None)` when the document lacks the property. Properties that
/// carry no roles are returned with blank scopes dropped.
pub fn merged_acl<D: Document + ?Sized>(
    document: &D,
    acl_property: &str,
) -> Result<Option<Property>, RepositoryError> {
    let Some(scopes) = document.find_property(acl_property)? else {
        return Ok(None);
    };

    let merged = match role_prefix(acl_property) {
        Some(prefix) => merge_entries(&scopes, |scope| {
            document.find_property(&format!("{prefix}{scope}"))
        })?,
        None => merge_entries(&scopes, |_| Ok(None))?,
    };
    Ok(Some(merged))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use spi::SimpleDocument;

    fn rendered(property: &Property) -> Vec<String> {
        property.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn roles_expand_in_scope_order() {
        let document = SimpleDocument::new()
            .with_strings(names::ACLUSERS, ["joe", "mary", "admin"])
            .with_strings(names::user_roles("joe"), ["reader"])
            .with_strings(names::user_roles("mary"), ["reader", "writer"])
            .with_strings(names::user_roles("admin"), ["owner"]);

        let merged = merged_acl(&document, names::ACLUSERS).unwrap().unwrap();
        assert_eq!(
            rendered(&merged),
            ["joe=reader", "mary=reader", "mary=writer", "admin=owner"]
        );
    }

    #[test]
    fn scopes_without_roles_stay_bare() {
        let document = SimpleDocument::new()
            .with_strings(names::ACLGROUPS, ["staff", "eng"])
            .with_strings(names::group_roles("eng"), ["writer"]);

        let merged = merged_acl(&document, names::ACLGROUPS).unwrap().unwrap();
        assert_eq!(rendered(&merged), ["staff", "eng=writer"]);
    }

    #[test]
    fn blank_scopes_and_roles_are_dropped() {
        let document = SimpleDocument::new()
            .with_strings(names::ACLUSERS, [" joe ", "  ", ""])
            .with_strings(names::user_roles("joe"), ["", "reader"]);

        let merged = merged_acl(&document, names::ACLUSERS).unwrap().unwrap();
        assert_eq!(rendered(&merged), ["joe=reader"]);
    }

    #[test]
    fn user_roles_do_not_leak_into_groups() {
        let document = SimpleDocument::new()
            .with_strings(names::ACLGROUPS, ["joe"])
            .with_strings(names::user_roles("joe"), ["reader"]);

        let merged = merged_acl(&document, names::ACLGROUPS).unwrap().unwrap();
        assert_eq!(rendered(&merged), ["joe"]);
    }

    #[test]
    fn deny_lists_carry_no_roles() {
        assert_eq!(role_prefix(names::ACLDENYUSERS), None);
        let document = SimpleDocument::new()
            .with_strings(names::ACLDENYUSERS, ["joe"])
            .with_strings(names::user_roles("joe"), ["reader"]);

        let merged = merged_acl(&document, names::ACLDENYUSERS).unwrap().unwrap();
        assert_eq!(rendered(&merged), ["joe"]);
    }

    #[test]
    fn missing_property_is_absent() {
        let document = SimpleDocument::new();
        assert!(merged_acl(&document, names::ACLUSERS).unwrap().is_none());
    }

    #[test]
    fn role_lookup_errors_propagate() {
        let scopes = Property::single("joe");
        let err = merge_entries(&scopes, |_| {
            Err(RepositoryError::Transient("roles unavailable".into()))
        })
        .unwrap_err();
        assert!(err.is_transient());
    }

    proptest! {
        #[test]
        fn merge_preserves_scope_order(scopes in prop::collection::vec("[a-z]{1,8}", 0..12)) {
            let property: Property = scopes.iter().map(|s| Value::string(s.as_str())).collect();
            let merged = merge_entries(&property, |scope| {
                Ok(Some(Property::single(format!("{scope}-role"))))
            }).unwrap();

            let expected: Vec<String> = scopes.iter().map(|s| format!("{s}={s}-role")).collect();
            prop_assert_eq!(rendered(&merged), expected);
        }
    }
}
