use std::collections::{BTreeMap, BTreeSet};

use time::OffsetDateTime;

use crate::{BinaryValue, Document, Property, RepositoryError, Value, names};

/// In-memory [`Document`] built from explicit properties.
///
/// Connectors that already hold all metadata in memory can hand a
/// `SimpleDocument` to the pipeline directly; tests use it as a fixture.
#[derive(Clone, Debug, Default)]
pub struct SimpleDocument {
    properties: BTreeMap<String, Property>,
}

impl SimpleDocument {
    /// Creates an empty document.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts or replaces a property.
    pub fn insert(&mut self, name: impl Into<String>, property: Property) {
        self.properties.insert(name.into(), property);
    }

    /// Removes a property, returning it when present.
    pub fn remove(&mut self, name: &str) -> Option<Property> {
        self.properties.remove(name)
    }

    /// Adds a property and returns the document.
    #[must_use]
    pub fn with_property(mut self, name: impl Into<String>, property: Property) -> Self {
        self.insert(name, property);
        self
    }

    /// Adds a single-valued string property.
    #[must_use]
    pub fn with_string(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with_property(name, Property::single(Value::String(value.into())))
    }

    /// Adds a multi-valued string property.
    #[must_use]
    pub fn with_strings<I, S>(self, name: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let property = values
            .into_iter()
            .map(|value| Value::String(value.into()))
            .collect();
        self.with_property(name, property)
    }

    /// Adds a boolean property.
    #[must_use]
    pub fn with_boolean(self, name: impl Into<String>, value: bool) -> Self {
        self.with_property(name, Property::single(value))
    }

    /// Adds a date property.
    #[must_use]
    pub fn with_date(self, name: impl Into<String>, value: OffsetDateTime) -> Self {
        self.with_property(name, Property::single(value))
    }

    /// Attaches in-memory content under [`names::CONTENT`].
    #[must_use]
    pub fn with_content(self, bytes: impl Into<Vec<u8>>) -> Self {
        self.with_binary(names::CONTENT, BinaryValue::from_bytes(bytes))
    }

    /// Adds a binary property.
    #[must_use]
    pub fn with_binary(self, name: impl Into<String>, value: BinaryValue) -> Self {
        self.with_property(name, Property::single(Value::Binary(value)))
    }
}

impl Document for SimpleDocument {
    fn find_property(&self, name: &str) -> Result<Option<Property>, RepositoryError> {
        Ok(self.properties.get(name).cloned())
    }

    fn property_names(&self) -> Result<BTreeSet<String>, RepositoryError> {
        Ok(self.properties.keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_replaces_existing_properties() {
        let document = SimpleDocument::new()
            .with_string(names::TITLE, "first")
            .with_string(names::TITLE, "second");
        let title = document.find_property(names::TITLE).unwrap().unwrap();
        assert_eq!(title.len(), 1);
        assert_eq!(title.first().and_then(Value::as_str), Some("second"));
    }

    #[test]
    fn property_names_are_sorted() {
        let document = SimpleDocument::new()
            .with_string("zeta", "z")
            .with_string("alpha", "a");
        let names: Vec<String> = document.property_names().unwrap().into_iter().collect();
        assert_eq!(names, ["alpha", "zeta"]);
    }

    #[test]
    fn remove_drops_property() {
        let mut document = SimpleDocument::new().with_content(b"data".to_vec());
        assert!(document.remove(names::CONTENT).is_some());
        assert!(document.find_property(names::CONTENT).unwrap().is_none());
    }
}
