//! Operations: the method+path units documents are built from

use std::fmt;
use std::str::FromStr;

use indexmap::IndexMap;
use serde_json::Value;

use crate::definitions::Definitions;
use crate::document::{
    ExternalDocs, Parameter, ParameterOrRef, RequestBodyOrRef, ResponseOrRef, SecurityRequirement,
};
use crate::dom::{self, Node};
use crate::schema::{ObjectSchema, Property, Schema, SchemaOrRef};
use crate::{Error, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
    Head,
    Options,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Patch => "patch",
            HttpMethod::Delete => "delete",
            HttpMethod::Head => "head",
            HttpMethod::Options => "options",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HttpMethod {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "get" => Ok(HttpMethod::Get),
            "post" => Ok(HttpMethod::Post),
            "put" => Ok(HttpMethod::Put),
            "patch" => Ok(HttpMethod::Patch),
            "delete" => Ok(HttpMethod::Delete),
            "head" => Ok(HttpMethod::Head),
            "options" => Ok(HttpMethod::Options),
            other => Err(Error::definition(format!(
                "unsupported HTTP method: '{other}'"
            ))),
        }
    }
}

/// One API operation
///
/// `name` keys the operation in its registry and doubles as the
/// `operationId` in rendered documents. Responses are keyed by status code
/// string (`"200"`, `"default"`). `consumes`, `produces`, and `schemes`
/// only affect OpenAPI 2.0 output, where they aggregate at the document
/// root.
#[derive(Debug, Clone)]
pub struct Operation {
    pub name: String,
    pub method: HttpMethod,
    pub path: String,
    pub summary: Option<String>,
    pub description: Option<String>,
    pub tags: Vec<String>,
    pub deprecated: bool,
    pub parameters: Vec<ParameterOrRef>,
    pub request_body: Option<RequestBodyOrRef>,
    pub responses: IndexMap<String, ResponseOrRef>,
    pub security: Vec<SecurityRequirement>,
    pub consumes: Vec<String>,
    pub produces: Vec<String>,
    pub schemes: Vec<String>,
    pub external_docs: Option<ExternalDocs>,
    pub extensions: IndexMap<String, Value>,
}

impl Operation {
    pub fn new(name: impl Into<String>, method: HttpMethod, path: impl Into<String>) -> Self {
        Operation {
            name: name.into(),
            method,
            path: path.into(),
            summary: None,
            description: None,
            tags: Vec::new(),
            deprecated: false,
            parameters: Vec::new(),
            request_body: None,
            responses: IndexMap::new(),
            security: Vec::new(),
            consumes: Vec::new(),
            produces: Vec::new(),
            schemes: Vec::new(),
            external_docs: None,
            extensions: IndexMap::new(),
        }
    }

    pub fn add_parameter(&mut self, parameter: impl Into<ParameterOrRef>) {
        self.parameters.push(parameter.into());
    }

    pub fn set_request_body(&mut self, body: impl Into<RequestBodyOrRef>) {
        self.request_body = Some(body.into());
    }

    pub fn add_response(&mut self, status: impl Into<String>, response: impl Into<ResponseOrRef>) {
        self.responses.insert(status.into(), response.into());
    }

    /// All parameters with references resolved, in declaration order
    pub fn resolved_parameters(&self, definitions: &Definitions) -> Result<Vec<Parameter>> {
        self.parameters
            .iter()
            .map(|parameter| parameter.resolve(definitions))
            .collect()
    }

    /// A synthetic object schema with one property per declared parameter
    ///
    /// Wrapping raw request parameters against this schema gives nested
    /// validation paths and the per-parameter existence checks for free.
    pub fn parameter_schema(&self, definitions: &Definitions) -> Result<Schema> {
        let mut object = ObjectSchema::new();
        for parameter in self.resolved_parameters(definitions)? {
            object.add_property(Property::new(parameter.name, parameter.schema))?;
        }
        Ok(Schema::Object(object))
    }

    /// Wrap raw request parameters into a validatable node tree
    pub fn wrap_parameters(&self, raw: &Value, definitions: &Definitions) -> Result<Node> {
        let schema = SchemaOrRef::from(self.parameter_schema(definitions)?);
        dom::wrap(raw, &schema, definitions)
    }
}
