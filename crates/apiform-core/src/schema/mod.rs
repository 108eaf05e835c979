//! The polymorphic schema type hierarchy
//!
//! Schemas are built once at declaration time, registered in a
//! [`crate::definitions::Definitions`] registry, and treated as immutable
//! afterwards. The module is organized into focused submodules:
//! - `metadata`: the base fields shared by every schema kind
//! - `object` / `array` / `numeric` / `string_type`: the concrete kinds
//! - `reference`: named pointers to reusable components and the
//!   existence-overriding [`Delegator`] wrapper
//! - `property`: named members of object schemas
//! - `build`: declaration from nested option maps
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde_json::Value;

use crate::definitions::Definitions;
use crate::existence::Existence;
use crate::{Error, Result};

pub mod array;
pub mod build;
pub mod metadata;
pub mod numeric;
pub mod object;
pub mod property;
pub mod reference;
pub mod string_type;

pub use array::ArraySchema;
pub use build::schema_from_value;
pub use metadata::Metadata;
pub use numeric::NumericSchema;
pub use object::{Discriminator, ObjectSchema};
pub use property::Property;
pub use reference::{Delegator, Reference};
pub use string_type::{StringFormat, StringSchema};

/// The JSON type a schema constrains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SchemaType {
    Array,
    Boolean,
    Integer,
    Number,
    Object,
    String,
}

impl SchemaType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SchemaType::Array => "array",
            SchemaType::Boolean => "boolean",
            SchemaType::Integer => "integer",
            SchemaType::Number => "number",
            SchemaType::Object => "object",
            SchemaType::String => "string",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SchemaType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "array" => Ok(SchemaType::Array),
            "boolean" => Ok(SchemaType::Boolean),
            "integer" => Ok(SchemaType::Integer),
            "number" => Ok(SchemaType::Number),
            "object" => Ok(SchemaType::Object),
            "string" => Ok(SchemaType::String),
            other => Err(Error::definition(format!("unsupported type: '{other}'"))),
        }
    }
}

/// A callable applied to a scalar value after casting
#[derive(Clone)]
pub struct Conversion(Arc<dyn Fn(Value) -> Value + Send + Sync>);

impl Conversion {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Conversion(Arc::new(f))
    }

    pub fn apply(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Conversion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Conversion(..)")
    }
}

/// A schema for booleans, carrying only the common attributes
#[derive(Debug, Clone, Default)]
pub struct BaseSchema {
    pub meta: Metadata,
}

impl BaseSchema {
    pub fn new() -> Self {
        BaseSchema::default()
    }
}

/// A concrete schema node
#[derive(Debug, Clone)]
pub enum Schema {
    Base(BaseSchema),
    Array(ArraySchema),
    Numeric(NumericSchema),
    String(StringSchema),
    Object(ObjectSchema),
}

impl Schema {
    /// The common attribute block shared by every kind
    pub fn metadata(&self) -> &Metadata {
        match self {
            Schema::Base(s) => &s.meta,
            Schema::Array(s) => &s.meta,
            Schema::Numeric(s) => &s.meta,
            Schema::String(s) => &s.meta,
            Schema::Object(s) => &s.meta,
        }
    }

    pub fn metadata_mut(&mut self) -> &mut Metadata {
        match self {
            Schema::Base(s) => &mut s.meta,
            Schema::Array(s) => &mut s.meta,
            Schema::Numeric(s) => &mut s.meta,
            Schema::String(s) => &mut s.meta,
            Schema::Object(s) => &mut s.meta,
        }
    }

    pub fn schema_type(&self) -> SchemaType {
        match self {
            Schema::Base(_) => SchemaType::Boolean,
            Schema::Array(_) => SchemaType::Array,
            Schema::Numeric(s) => s.schema_type(),
            Schema::String(_) => SchemaType::String,
            Schema::Object(_) => SchemaType::Object,
        }
    }

    pub fn existence(&self) -> Existence {
        self.metadata().existence
    }

    /// Whether this schema renders as nullable
    pub fn nullable(&self) -> bool {
        self.existence().nullable()
    }

    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match self {
            Schema::Object(s) => Some(s),
            _ => None,
        }
    }
}

/// An inline schema or a named reference to one
#[derive(Debug, Clone)]
pub enum SchemaOrRef {
    Inline(Arc<Schema>),
    Ref(Reference),
}

impl SchemaOrRef {
    pub fn inline(schema: Schema) -> Self {
        SchemaOrRef::Inline(Arc::new(schema))
    }

    pub fn reference(name: impl Into<String>) -> Self {
        SchemaOrRef::Ref(Reference::schema(name))
    }

    /// Resolve to a concrete schema, applying existence tightening for
    /// references
    pub fn resolve(&self, definitions: &Definitions) -> Result<Delegator> {
        match self {
            SchemaOrRef::Inline(schema) => Ok(Delegator::new(schema.clone(), None)),
            SchemaOrRef::Ref(reference) => reference.resolve(definitions),
        }
    }
}

impl From<Schema> for SchemaOrRef {
    fn from(schema: Schema) -> Self {
        SchemaOrRef::inline(schema)
    }
}

impl From<Reference> for SchemaOrRef {
    fn from(reference: Reference) -> Self {
        SchemaOrRef::Ref(reference)
    }
}
