//! Object schemas: properties, `allOf` composition, and discriminators
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

use indexmap::IndexMap;

use crate::definitions::Definitions;
use crate::schema::{Metadata, Property, Reference, SchemaOrRef};
use crate::{Error, Result};

/// Polymorphism support: the property whose value selects the concrete
/// inheriting schema
///
/// When `mapping` has no entry for a discriminator value, the value itself
/// is tried as a schema name.
#[derive(Debug, Clone, Default)]
pub struct Discriminator {
    pub property_name: String,
    pub mapping: IndexMap<String, String>,
}

impl Discriminator {
    pub fn new(property_name: impl Into<String>) -> Self {
        Discriminator {
            property_name: property_name.into(),
            mapping: IndexMap::new(),
        }
    }

    pub fn map(mut self, value: impl Into<String>, schema_name: impl Into<String>) -> Self {
        self.mapping.insert(value.into(), schema_name.into());
        self
    }

    /// The schema name a discriminator value selects
    pub fn resolve<'a>(&'a self, value: &'a str) -> &'a str {
        self.mapping.get(value).map(String::as_str).unwrap_or(value)
    }
}

/// A schema for JSON objects
#[derive(Debug, Clone, Default)]
pub struct ObjectSchema {
    pub meta: Metadata,
    pub(crate) properties: IndexMap<String, Property>,
    pub(crate) all_of: Vec<Reference>,
    pub discriminator: Option<Discriminator>,
    pub additional_properties: Option<Box<SchemaOrRef>>,
}

impl ObjectSchema {
    pub fn new() -> Self {
        ObjectSchema::default()
    }

    /// Store a property under its name, preserving insertion order
    ///
    /// Order is significant: it drives stable document output and the
    /// ordering of `required` lists.
    pub fn add_property(&mut self, property: Property) -> Result<()> {
        if self.properties.contains_key(&property.name) {
            return Err(Error::definition(format!(
                "property already defined: '{}'",
                property.name
            )));
        }
        self.properties.insert(property.name.clone(), property);
        Ok(())
    }

    /// Replace or add a property, used when overlaying inherited properties
    pub fn set_property(&mut self, property: Property) {
        self.properties.insert(property.name.clone(), property);
    }

    /// Append a reference contributing inherited properties
    pub fn add_all_of(&mut self, reference: Reference) {
        self.all_of.push(reference);
    }

    /// This schema's own properties, excluding anything inherited
    pub fn own_properties(&self) -> &IndexMap<String, Property> {
        &self.properties
    }

    pub fn all_of(&self) -> &[Reference] {
        &self.all_of
    }

    /// The effective property map after `allOf` composition
    ///
    /// Inherited property maps merge in declaration order, then this
    /// schema's own properties overlay them; own properties win on name
    /// collision while keeping the inherited position.
    pub fn properties(&self, definitions: &Definitions) -> Result<IndexMap<String, Property>> {
        let mut visiting = Vec::new();
        self.merged_properties(definitions, &mut visiting)
    }

    fn merged_properties(
        &self,
        definitions: &Definitions,
        visiting: &mut Vec<String>,
    ) -> Result<IndexMap<String, Property>> {
        let mut merged = IndexMap::new();
        for reference in &self.all_of {
            if visiting.iter().any(|name| name == &reference.name) {
                return Err(Error::CircularReference {
                    name: reference.name.clone(),
                });
            }
            let target = definitions.find_schema(&reference.name)?;
            let object = target.as_object().ok_or_else(|| {
                Error::definition(format!(
                    "allOf reference '{}' does not resolve to an object schema",
                    reference.name
                ))
            })?;

            visiting.push(reference.name.clone());
            let inherited = object.merged_properties(definitions, visiting)?;
            visiting.pop();

            for (name, property) in inherited {
                merged.insert(name, property);
            }
        }
        for (name, property) in &self.properties {
            merged.insert(name.clone(), property.clone());
        }
        Ok(merged)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{Schema, StringSchema};

    fn object_with(properties: &[&str]) -> ObjectSchema {
        let mut schema = ObjectSchema::new();
        for name in properties {
            schema
                .add_property(Property::new(*name, Schema::String(StringSchema::new())))
                .unwrap();
        }
        schema
    }

    #[test]
    fn test_duplicate_property_rejected() {
        let mut schema = object_with(&["a"]);
        let result = schema.add_property(Property::new("a", Schema::String(StringSchema::new())));
        assert!(result.is_err());
    }

    #[test]
    fn test_all_of_merge_order_and_overlay() {
        let definitions = Definitions::new();
        definitions
            .add_schema("Foo", Schema::Object(object_with(&["a"])))
            .unwrap();

        let mut bar = object_with(&["b"]);
        bar.add_all_of(Reference::schema("Foo"));
        let properties = bar.properties(&definitions).unwrap();
        let names: Vec<_> = properties.keys().cloned().collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_own_property_wins_on_collision() {
        let definitions = Definitions::new();
        definitions
            .add_schema("Foo", Schema::Object(object_with(&["a"])))
            .unwrap();

        let mut bar = ObjectSchema::new();
        bar.add_all_of(Reference::schema("Foo"));
        let own = Property::new("a", Schema::String(StringSchema::new())).read_only();
        bar.add_property(own).unwrap();

        let properties = bar.properties(&definitions).unwrap();
        assert!(properties["a"].read_only);
    }

    #[test]
    fn test_circular_all_of_detected() {
        let definitions = Definitions::new();

        let mut foo = ObjectSchema::new();
        foo.add_all_of(Reference::schema("Bar"));
        let mut bar = ObjectSchema::new();
        bar.add_all_of(Reference::schema("Foo"));

        definitions.add_schema("Foo", Schema::Object(foo)).unwrap();
        definitions.add_schema("Bar", Schema::Object(bar)).unwrap();

        let foo = definitions.find_schema("Foo").unwrap();
        let result = foo.as_object().unwrap().properties(&definitions);
        match result {
            Err(Error::CircularReference { name }) => assert_eq!(name, "Bar"),
            other => panic!("expected circular reference error, got {other:?}"),
        }
    }

    #[test]
    fn test_discriminator_mapping_fallback() {
        let discriminator = Discriminator::new("kind").map("dog", "Dog");
        assert_eq!(discriminator.resolve("dog"), "Dog");
        assert_eq!(discriminator.resolve("Cat"), "Cat");
    }
}
