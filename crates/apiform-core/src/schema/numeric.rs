//! Integer and number schemas

use serde_json::Number;

use crate::schema::{Conversion, Metadata, SchemaType};
use crate::validation::{Bound, Rule};
use crate::Result;

/// A schema for JSON numbers, integral or not
#[derive(Debug, Clone)]
pub struct NumericSchema {
    pub meta: Metadata,
    integer: bool,
    pub conversion: Option<Conversion>,
}

impl NumericSchema {
    pub fn integer() -> Self {
        NumericSchema {
            meta: Metadata::default(),
            integer: true,
            conversion: None,
        }
    }

    pub fn number() -> Self {
        NumericSchema {
            meta: Metadata::default(),
            integer: false,
            conversion: None,
        }
    }

    pub fn is_integer(&self) -> bool {
        self.integer
    }

    pub fn schema_type(&self) -> SchemaType {
        if self.integer {
            SchemaType::Integer
        } else {
            SchemaType::Number
        }
    }

    pub fn minimum(mut self, value: Number, exclusive: bool) -> Self {
        self.meta
            .add_validation(Rule::Minimum(Bound::new(value, exclusive)));
        self
    }

    pub fn maximum(mut self, value: Number, exclusive: bool) -> Self {
        self.meta
            .add_validation(Rule::Maximum(Bound::new(value, exclusive)));
        self
    }

    pub fn multiple_of(mut self, value: Number) -> Result<Self> {
        self.meta.add_validation(Rule::multiple_of(value)?);
        Ok(self)
    }

    pub fn with_conversion(mut self, conversion: Conversion) -> Self {
        self.conversion = Some(conversion);
        self
    }
}
