//! Structured validation error collection
//!
//! Validation failures never raise. They accumulate in an [`Errors`]
//! collector as an attribute path plus an error kind with interpolation
//! parameters; the hosting layer is responsible for localized message
//! formatting and HTTP status mapping.
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

use std::fmt;

use serde::Serialize;

use super::Path;

/// The kind of a validation failure, with interpolation parameters
///
/// Serializes under its `code()` symbol so hosts can emit collected errors
/// directly.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A required value is absent, null, or blank below its threshold
    Blank,
    /// A value that cannot be cast or parsed into its declared type
    Invalid,
    /// A value outside an enumerated list
    Inclusion,
    /// A string longer than `maxLength`
    TooLong { count: usize },
    /// A string shorter than `minLength`
    TooShort { count: usize },
    /// An array with more than `maxItems` elements
    TooManyItems { count: usize },
    /// An array with fewer than `minItems` elements
    TooFewItems { count: usize },
    /// A number violating an exclusive minimum
    GreaterThan { count: f64 },
    /// A number violating an inclusive minimum
    GreaterThanOrEqualTo { count: f64 },
    /// A number violating an exclusive maximum
    LessThan { count: f64 },
    /// A number violating an inclusive maximum
    LessThanOrEqualTo { count: f64 },
    /// A number violating `multipleOf`
    NotAMultipleOf { count: f64 },
    /// A custom predicate failure with its reason
    SchemaMismatch { message: String },
}

impl ErrorKind {
    /// Stable symbol identifying this kind, usable as a localization key
    pub fn code(&self) -> &'static str {
        match self {
            ErrorKind::Blank => "blank",
            ErrorKind::Invalid => "invalid",
            ErrorKind::Inclusion => "inclusion",
            ErrorKind::TooLong { .. } => "too_long",
            ErrorKind::TooShort { .. } => "too_short",
            ErrorKind::TooManyItems { .. } => "too_many_items",
            ErrorKind::TooFewItems { .. } => "too_few_items",
            ErrorKind::GreaterThan { .. } => "greater_than",
            ErrorKind::GreaterThanOrEqualTo { .. } => "greater_than_or_equal_to",
            ErrorKind::LessThan { .. } => "less_than",
            ErrorKind::LessThanOrEqualTo { .. } => "less_than_or_equal_to",
            ErrorKind::NotAMultipleOf { .. } => "not_a_multiple_of",
            ErrorKind::SchemaMismatch { .. } => "schema_mismatch",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Blank => write!(f, "can't be blank"),
            ErrorKind::Invalid => write!(f, "is invalid"),
            ErrorKind::Inclusion => write!(f, "is not included in the list"),
            ErrorKind::TooLong { count } => {
                write!(f, "is too long (maximum is {count} characters)")
            }
            ErrorKind::TooShort { count } => {
                write!(f, "is too short (minimum is {count} characters)")
            }
            ErrorKind::TooManyItems { count } => {
                write!(f, "has too many items (maximum is {count})")
            }
            ErrorKind::TooFewItems { count } => {
                write!(f, "has too few items (minimum is {count})")
            }
            ErrorKind::GreaterThan { count } => write!(f, "must be greater than {count}"),
            ErrorKind::GreaterThanOrEqualTo { count } => {
                write!(f, "must be greater than or equal to {count}")
            }
            ErrorKind::LessThan { count } => write!(f, "must be less than {count}"),
            ErrorKind::LessThanOrEqualTo { count } => {
                write!(f, "must be less than or equal to {count}")
            }
            ErrorKind::NotAMultipleOf { count } => write!(f, "must be a multiple of {count}"),
            ErrorKind::SchemaMismatch { message } => write!(f, "{message}"),
        }
    }
}

/// A single validation failure at a nested attribute path
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    pub path: Path,
    pub kind: ErrorKind,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_root() {
            write!(f, "{}", self.kind)
        } else {
            write!(f, "'{}' {}", self.path, self.kind)
        }
    }
}

/// Collector for validation failures during one validation pass
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct Errors {
    entries: Vec<ValidationError>,
}

impl Errors {
    pub fn new() -> Self {
        Errors::default()
    }

    /// Record a failure at the given path
    pub fn add(&mut self, path: Path, kind: ErrorKind) {
        self.entries.push(ValidationError { path, kind });
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.entries.iter()
    }

    pub fn into_vec(self) -> Vec<ValidationError> {
        self.entries
    }

    /// Fold another collector's entries into this one
    pub fn merge(&mut self, other: Errors) {
        self.entries.extend(other.entries);
    }
}

impl fmt::Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, entry) in self.entries.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{entry}")?;
        }
        Ok(())
    }
}
