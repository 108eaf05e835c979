//! The typed OpenAPI component model
//!
//! These are the structs the renderers and the definitions registry share:
//! document metadata, parameters, request bodies, responses, operations, and
//! security schemes. The host framework's declaration layer constructs them;
//! this crate validates request values through them and renders them into
//! OpenAPI documents.
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

mod info;
mod operation;
mod parameter;
mod response;
mod security;

pub use info::{Contact, Info, License};
pub use operation::{HttpMethod, Operation};
pub use parameter::{Parameter, ParameterLocation, ParameterOrRef};
pub use response::{Header, RequestBody, RequestBodyOrRef, Response, ResponseOrRef};
pub use security::{SecurityScheme, SecuritySchemeKind};

use indexmap::IndexMap;
use serde_json::Value;

/// A link to external documentation
#[derive(Debug, Clone)]
pub struct ExternalDocs {
    pub url: String,
    pub description: Option<String>,
}

impl ExternalDocs {
    pub fn new(url: impl Into<String>) -> Self {
        ExternalDocs {
            url: url.into(),
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A server the API is reachable at (OpenAPI 3.x only)
#[derive(Debug, Clone)]
pub struct Server {
    pub url: String,
    pub description: Option<String>,
    pub extensions: IndexMap<String, Value>,
}

impl Server {
    pub fn new(url: impl Into<String>) -> Self {
        Server {
            url: url.into(),
            description: None,
            extensions: IndexMap::new(),
        }
    }
}

/// A grouping tag operations can carry
#[derive(Debug, Clone)]
pub struct Tag {
    pub name: String,
    pub description: Option<String>,
    pub external_docs: Option<ExternalDocs>,
    pub extensions: IndexMap<String, Value>,
}

impl Tag {
    pub fn new(name: impl Into<String>) -> Self {
        Tag {
            name: name.into(),
            description: None,
            external_docs: None,
            extensions: IndexMap::new(),
        }
    }
}

/// One security requirement: scheme name to required scopes
pub type SecurityRequirement = IndexMap<String, Vec<String>>;
