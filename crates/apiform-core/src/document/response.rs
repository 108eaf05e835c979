//! Request bodies and responses

use indexmap::IndexMap;
use serde_json::Value;

use crate::definitions::Definitions;
use crate::schema::SchemaOrRef;
use crate::Result;

pub const DEFAULT_CONTENT_TYPE: &str = "application/json";

/// The request payload of an operation
#[derive(Debug, Clone)]
pub struct RequestBody {
    pub description: Option<String>,
    pub schema: SchemaOrRef,
    pub content_type: String,
    pub extensions: IndexMap<String, Value>,
}

impl RequestBody {
    pub fn new(schema: impl Into<SchemaOrRef>) -> Self {
        RequestBody {
            description: None,
            schema: schema.into(),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            extensions: IndexMap::new(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = content_type.into();
        self
    }

    pub fn required(&self, definitions: &Definitions) -> Result<bool> {
        Ok(self.schema.resolve(definitions)?.existence().required())
    }
}

/// A response header schema
#[derive(Debug, Clone)]
pub struct Header {
    pub description: Option<String>,
    pub schema: SchemaOrRef,
}

/// One response of an operation, keyed by status in the operation
#[derive(Debug, Clone)]
pub struct Response {
    pub description: Option<String>,
    /// Absent for bodiless responses such as 204
    pub schema: Option<SchemaOrRef>,
    pub content_type: String,
    pub headers: IndexMap<String, Header>,
    pub extensions: IndexMap<String, Value>,
}

impl Response {
    pub fn new(schema: impl Into<SchemaOrRef>) -> Self {
        Response {
            description: None,
            schema: Some(schema.into()),
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            headers: IndexMap::new(),
            extensions: IndexMap::new(),
        }
    }

    /// A response without a body
    pub fn empty() -> Self {
        Response {
            description: None,
            schema: None,
            content_type: DEFAULT_CONTENT_TYPE.to_string(),
            headers: IndexMap::new(),
            extensions: IndexMap::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn add_header(&mut self, name: impl Into<String>, header: Header) {
        self.headers.insert(name.into(), header);
    }
}

/// A request body given inline or by reference
#[derive(Debug, Clone)]
pub enum RequestBodyOrRef {
    Inline(RequestBody),
    Ref(String),
}

impl RequestBodyOrRef {
    pub fn resolve(&self, definitions: &Definitions) -> Result<RequestBody> {
        match self {
            RequestBodyOrRef::Inline(body) => Ok(body.clone()),
            RequestBodyOrRef::Ref(name) => Ok((*definitions.find_request_body(name)?).clone()),
        }
    }
}

impl From<RequestBody> for RequestBodyOrRef {
    fn from(body: RequestBody) -> Self {
        RequestBodyOrRef::Inline(body)
    }
}

/// A response given inline or by reference
#[derive(Debug, Clone)]
pub enum ResponseOrRef {
    Inline(Response),
    Ref(String),
}

impl ResponseOrRef {
    pub fn resolve(&self, definitions: &Definitions) -> Result<Response> {
        match self {
            ResponseOrRef::Inline(response) => Ok(response.clone()),
            ResponseOrRef::Ref(name) => Ok((*definitions.find_response(name)?).clone()),
        }
    }
}

impl From<Response> for ResponseOrRef {
    fn from(response: Response) -> Self {
        ResponseOrRef::Inline(response)
    }
}
