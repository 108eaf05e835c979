//! Array schemas with a single item schema

use crate::schema::{Metadata, Schema, SchemaOrRef, StringSchema};
use crate::validation::Rule;

/// A schema for JSON arrays
#[derive(Debug, Clone)]
pub struct ArraySchema {
    pub meta: Metadata,
    pub items: Box<SchemaOrRef>,
}

impl ArraySchema {
    pub fn new(items: impl Into<SchemaOrRef>) -> Self {
        ArraySchema {
            meta: Metadata::default(),
            items: Box::new(items.into()),
        }
    }

    pub fn min_items(mut self, limit: usize) -> Self {
        self.meta.add_validation(Rule::MinItems(limit));
        self
    }

    pub fn max_items(mut self, limit: usize) -> Self {
        self.meta.add_validation(Rule::MaxItems(limit));
        self
    }
}

impl Default for ArraySchema {
    fn default() -> Self {
        ArraySchema::new(Schema::String(StringSchema::new()))
    }
}
