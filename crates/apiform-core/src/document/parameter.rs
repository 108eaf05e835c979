//! Request parameters and their locations

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde_json::Value;

use crate::definitions::Definitions;
use crate::schema::SchemaOrRef;
use crate::{Error, Result};

/// Where a parameter travels in the request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParameterLocation {
    Query,
    Header,
    Path,
    Cookie,
}

impl ParameterLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Query => "query",
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Cookie => "cookie",
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ParameterLocation {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "query" => Ok(ParameterLocation::Query),
            "header" => Ok(ParameterLocation::Header),
            "path" => Ok(ParameterLocation::Path),
            "cookie" => Ok(ParameterLocation::Cookie),
            other => Err(Error::definition(format!(
                "unsupported parameter location: '{other}'"
            ))),
        }
    }
}

/// A named request parameter with a schema
#[derive(Debug, Clone)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub description: Option<String>,
    pub schema: SchemaOrRef,
    /// Forces or suppresses object flattening in query strings; version
    /// defaults apply when unset
    pub explode: Option<bool>,
    pub deprecated: bool,
    pub extensions: IndexMap<String, Value>,
}

impl Parameter {
    pub fn new(
        name: impl Into<String>,
        location: ParameterLocation,
        schema: impl Into<SchemaOrRef>,
    ) -> Self {
        Parameter {
            name: name.into(),
            location,
            description: None,
            schema: schema.into(),
            explode: None,
            deprecated: false,
            extensions: IndexMap::new(),
        }
    }

    /// Shorthand for the common case of a query parameter
    pub fn query(name: impl Into<String>, schema: impl Into<SchemaOrRef>) -> Self {
        Parameter::new(name, ParameterLocation::Query, schema)
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn deprecated(mut self) -> Self {
        self.deprecated = true;
        self
    }

    /// Path parameters are always required; otherwise the schema's effective
    /// existence decides
    pub fn required(&self, definitions: &Definitions) -> Result<bool> {
        if self.location == ParameterLocation::Path {
            return Ok(true);
        }
        Ok(self.schema.resolve(definitions)?.existence().required())
    }
}

/// A parameter given inline or by reference to a reusable one
#[derive(Debug, Clone)]
pub enum ParameterOrRef {
    Inline(Parameter),
    Ref(String),
}

impl ParameterOrRef {
    pub fn resolve(&self, definitions: &Definitions) -> Result<Parameter> {
        match self {
            ParameterOrRef::Inline(parameter) => Ok(parameter.clone()),
            ParameterOrRef::Ref(name) => Ok((*definitions.find_parameter(name)?).clone()),
        }
    }
}

impl From<Parameter> for ParameterOrRef {
    fn from(parameter: Parameter) -> Self {
        ParameterOrRef::Inline(parameter)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::existence::Existence;
    use crate::schema::{Schema, StringSchema};

    #[test]
    fn test_path_parameters_always_required() {
        let definitions = Definitions::new();
        let schema = Schema::String(StringSchema::new());
        let parameter = Parameter::new("id", ParameterLocation::Path, schema);
        assert!(parameter.required(&definitions).unwrap());
    }

    #[test]
    fn test_query_parameter_required_follows_existence() {
        let definitions = Definitions::new();
        let mut schema = StringSchema::new();
        schema.meta.existence = Existence::Present;
        let required = Parameter::query("q", Schema::String(schema));
        assert!(required.required(&definitions).unwrap());

        let optional = Parameter::query("page", Schema::String(StringSchema::new()));
        assert!(!optional.required(&definitions).unwrap());
    }

    #[test]
    fn test_unresolved_parameter_reference() {
        let definitions = Definitions::new();
        let by_ref = ParameterOrRef::Ref("missing".into());
        assert!(by_ref.resolve(&definitions).is_err());
    }
}
