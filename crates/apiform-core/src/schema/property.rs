//! Named members of object schemas

use crate::definitions::Definitions;
use crate::schema::SchemaOrRef;
use crate::Result;

/// A named property of an object schema
///
/// `source` is an alternate attribute-access chain used when wrapping host
/// values for serialization (for example, `["user", "name"]` digs two levels
/// into the raw value instead of reading the property's own key).
#[derive(Debug, Clone)]
pub struct Property {
    pub name: String,
    pub schema: SchemaOrRef,
    pub read_only: bool,
    pub write_only: bool,
    pub source: Vec<String>,
}

impl Property {
    pub fn new(name: impl Into<String>, schema: impl Into<SchemaOrRef>) -> Self {
        Property {
            name: name.into(),
            schema: schema.into(),
            read_only: false,
            write_only: false,
            source: Vec::new(),
        }
    }

    pub fn read_only(mut self) -> Self {
        self.read_only = true;
        self
    }

    pub fn write_only(mut self) -> Self {
        self.write_only = true;
        self
    }

    pub fn with_source(mut self, source: Vec<String>) -> Self {
        self.source = source;
        self
    }

    /// Whether this property belongs in a `required` list, after reference
    /// resolution and existence tightening
    pub fn required(&self, definitions: &Definitions) -> Result<bool> {
        Ok(self.schema.resolve(definitions)?.existence().required())
    }
}
