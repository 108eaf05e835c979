//! Document renderers for JSON Schema and OpenAPI output
//!
//! Two independent walks over the same schema graph. The OpenAPI walk is
//! version-polymorphic; the version differences that matter (nullable
//! representation, exclusive-bound keywords, reference prefixes, parameter
//! explosion, request-body modeling) branch explicitly instead of hiding
//! behind shared helpers.
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::str::FromStr;

use crate::schema::{Schema, SchemaType};
use crate::{Error, Result};

pub mod json_schema;
pub mod openapi;

pub use openapi::OpenApiDocument;

/// The OpenAPI specification versions documents render into
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpenApiVersion {
    V2_0,
    V3_0,
    V3_1,
}

impl OpenApiVersion {
    /// The version string the rendered envelope carries
    pub fn as_str(&self) -> &'static str {
        match self {
            OpenApiVersion::V2_0 => "2.0",
            OpenApiVersion::V3_0 => "3.0.3",
            OpenApiVersion::V3_1 => "3.1.0",
        }
    }

    /// Where schema references point in documents of this version
    pub(crate) fn ref_prefix(&self) -> &'static str {
        match self {
            OpenApiVersion::V2_0 => "#/definitions/",
            OpenApiVersion::V3_0 | OpenApiVersion::V3_1 => "#/components/schemas/",
        }
    }
}

impl fmt::Display for OpenApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OpenApiVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "2.0" => Ok(OpenApiVersion::V2_0),
            "3.0" => Ok(OpenApiVersion::V3_0),
            "3.1" | "3.1.0" => Ok(OpenApiVersion::V3_1),
            other if other.starts_with("3.0.") => Ok(OpenApiVersion::V3_0),
            other => Err(Error::UnsupportedVersion {
                version: other.to_string(),
            }),
        }
    }
}

/// Reject rules registered under keywords the schema type cannot carry
pub(crate) fn ensure_keywords(schema: &Schema) -> Result<()> {
    let schema_type = schema.schema_type();
    for keyword in schema.metadata().validations.keys() {
        let supported = match *keyword {
            "minLength" | "maxLength" | "pattern" => schema_type == SchemaType::String,
            "minItems" | "maxItems" => schema_type == SchemaType::Array,
            "minimum" | "maximum" | "multipleOf" => {
                matches!(schema_type, SchemaType::Integer | SchemaType::Number)
            }
            _ => true,
        };
        if !supported {
            return Err(Error::UnsupportedKeyword {
                keyword,
                schema_type: schema_type.to_string(),
            });
        }
    }
    Ok(())
}
