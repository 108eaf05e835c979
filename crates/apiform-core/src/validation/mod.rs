//! Validation rules and structured error collection
//!
//! The module is organized into focused submodules:
//! - `path`: nested attribute paths for error reporting
//! - `errors`: error kinds with interpolation parameters and the collector
//! - `rules`: composable validation rules attached to schemas by keyword

pub mod errors;
pub mod path;
pub mod rules;

pub use errors::{ErrorKind, Errors, ValidationError};
pub use path::{Path, Segment};
pub use rules::{Bound, EnumValues, Predicate, Rule};
