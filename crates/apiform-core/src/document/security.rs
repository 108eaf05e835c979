//! Security scheme components

use indexmap::IndexMap;
use serde_json::Value;

use crate::document::ParameterLocation;

/// The concrete mechanism a security scheme uses
#[derive(Debug, Clone)]
pub enum SecuritySchemeKind {
    /// A key carried in a header, query, or cookie parameter
    ApiKey {
        name: String,
        location: ParameterLocation,
    },
    /// An HTTP authentication scheme such as `basic` or `bearer`
    Http {
        scheme: String,
        bearer_format: Option<String>,
    },
}

#[derive(Debug, Clone)]
pub struct SecurityScheme {
    pub kind: SecuritySchemeKind,
    pub description: Option<String>,
    pub extensions: IndexMap<String, Value>,
}

impl SecurityScheme {
    pub fn api_key(name: impl Into<String>, location: ParameterLocation) -> Self {
        SecurityScheme {
            kind: SecuritySchemeKind::ApiKey {
                name: name.into(),
                location,
            },
            description: None,
            extensions: IndexMap::new(),
        }
    }

    pub fn http(scheme: impl Into<String>) -> Self {
        SecurityScheme {
            kind: SecuritySchemeKind::Http {
                scheme: scheme.into(),
                bearer_format: None,
            },
            description: None,
            extensions: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}
