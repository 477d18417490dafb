use std::collections::BTreeSet;

use time::OffsetDateTime;

use crate::{Property, RepositoryError, Value, names};

/// Read-only view of a repository document.
///
/// Implementations are owned by the connector that produced the document.
/// Both accessors may fail with a [`RepositoryError`]; callers must pass
/// transient failures through unchanged.
pub trait Document {
    /// Looks up a property by name. Absent properties yield `Ok(None)`.
    fn find_property(&self, name: &str) -> Result<Option<Property>, RepositoryError>;

    /// Returns the names of every property present on the document.
    fn property_names(&self) -> Result<BTreeSet<String>, RepositoryError>;
}

impl<D: Document + ?Sized> Document for &D {
    fn find_property(&self, name: &str) -> Result<Option<Property>, RepositoryError> {
        (**self).find_property(name)
    }

    fn property_names(&self) -> Result<BTreeSet<String>, RepositoryError> {
        (**self).property_names()
    }
}

impl<D: Document + ?Sized> Document for Box<D> {
    fn find_property(&self, name: &str) -> Result<Option<Property>, RepositoryError> {
        (**self).find_property(name)
    }

    fn property_names(&self) -> Result<BTreeSet<String>, RepositoryError> {
        (**self).property_names()
    }
}

/// Returns the first value of a property, if the property exists and has one.
pub fn find_first<D: Document + ?Sized>(
    document: &D,
    name: &str,
) -> Result<Option<Value>, RepositoryError> {
    Ok(document
        .find_property(name)?
        .and_then(|property| property.into_values().into_iter().next()))
}

/// Returns the first value of a property rendered as text.
///
/// Empty strings are reported as absent.
pub fn find_string<D: Document + ?Sized>(
    document: &D,
    name: &str,
) -> Result<Option<String>, RepositoryError> {
    Ok(find_first(document, name)?
        .map(|value| value.to_string())
        .filter(|text| !text.is_empty()))
}

/// Returns the first value of a property interpreted as a boolean.
pub fn find_boolean<D: Document + ?Sized>(
    document: &D,
    name: &str,
) -> Result<Option<bool>, RepositoryError> {
    Ok(find_first(document, name)?.and_then(|value| value.to_boolean()))
}

/// Returns the first value of a property when it is date typed.
pub fn find_date<D: Document + ?Sized>(
    document: &D,
    name: &str,
) -> Result<Option<OffsetDateTime>, RepositoryError> {
    Ok(find_first(document, name)?.and_then(|value| value.as_date()))
}

/// Returns `true` when the document is a free-standing ACL document.
pub fn is_acl_document<D: Document + ?Sized>(document: &D) -> Result<bool, RepositoryError> {
    Ok(find_string(document, names::DOCUMENTTYPE)?
        .is_some_and(|kind| kind.eq_ignore_ascii_case(names::DOCUMENTTYPE_ACL)))
}
