//! Error types for the Apiform core library
//!
//! Declaration, reference, and rendering failures are exceptions that unwind
//! to the caller. Validation failures are *not* represented here: they
//! accumulate in [`crate::validation::Errors`] during a validation pass.

use thiserror::Error;

/// Main error type for schema declaration, resolution, and rendering
#[derive(Error, Debug)]
pub enum Error {
    /// Declaration-time errors: invalid option keys, malformed rule
    /// parameters, unsupported types or formats, duplicate names
    #[error("definition error: {message}")]
    Definition { message: String },

    /// A named reference that cannot be resolved anywhere in the
    /// definitions chain
    #[error("reference can't be resolved: {name}")]
    Reference { name: String },

    /// A cyclic `allOf` chain detected while merging object properties
    #[error("circular reference detected while resolving '{name}'")]
    CircularReference { name: String },

    /// Including a definitions registry would close an inclusion cycle
    #[error("circular dependency: definitions already include the current definitions")]
    CircularInclusion,

    /// An OpenAPI version string the renderers do not understand
    #[error("unsupported OpenAPI version: {version}")]
    UnsupportedVersion { version: String },

    /// A keyword was attached to a schema type that cannot carry it
    #[error("keyword '{keyword}' is not supported by '{schema_type}' schemas")]
    UnsupportedKeyword {
        keyword: &'static str,
        schema_type: String,
    },

    /// A discriminator value that maps to no registered schema
    #[error("inheriting schema not found for discriminator value '{value}'")]
    UndefinedVariant { value: String },
}

/// Convenience type alias for Results using our Error type
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a declaration-time definition error
    pub fn definition(message: impl Into<String>) -> Self {
        Error::Definition {
            message: message.into(),
        }
    }

    /// Create an unresolved-reference error
    pub fn reference(name: impl Into<String>) -> Self {
        Error::Reference { name: name.into() }
    }
}
