//! Apiform Core - Declarative schema and API-definition engine
//!
//! This crate turns a tree of typed schema definitions into three things:
//! runtime validation of JSON-like values, typed casting of raw scalar
//! input, and rendered JSON Schema or OpenAPI (2.0/3.0/3.1) documents.
//!
//! # Main Components
//!
//! - **Existence Lattice**: one ordered value unifying required, nullable,
//!   and empty-allowed semantics
//! - **Schema Hierarchy**: object/array/string/numeric/boolean nodes plus
//!   references with existence tightening
//! - **Definitions Registry**: named reusable components with inheritance
//!   and cycle-checked inclusion
//! - **Value Wrapping**: raw input paired with schemas into self-validating,
//!   self-converting typed nodes
//! - **Renderers**: JSON Schema and version-sensitive OpenAPI output
//!
//! # Example
//!
//! ```
//! use apiform_core::{wrap, Definitions, Result};
//! use apiform_core::schema::schema_from_value;
//! use serde_json::json;
//!
//! fn example() -> Result<()> {
//!     let definitions = Definitions::new();
//!     let schema = schema_from_value(&json!({
//!         "type": "string",
//!         "existence": true,
//!     }))?;
//!     let node = wrap(&json!("hi"), &schema, &definitions)?;
//!     assert!(node.valid());
//!     Ok(())
//! }
//! ```

pub mod definitions;
pub mod document;
pub mod dom;
pub mod error;
pub mod existence;
pub mod render;
pub mod schema;
pub mod validation;

// Re-export main types for convenience
pub use definitions::Definitions;
pub use dom::{wrap, Node};
pub use error::{Error, Result};
pub use existence::Existence;
pub use render::{OpenApiDocument, OpenApiVersion};
pub use schema::{Delegator, Reference, Schema, SchemaOrRef};
pub use validation::{ErrorKind, Errors, Path, ValidationError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
