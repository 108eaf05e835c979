//! The existence lattice governing presence semantics
//!
//! One ordered value replaces the usual trio of independently settable
//! `required` / `nullable` / `allow_blank` flags. Every schema node owns
//! exactly one [`Existence`]; references may tighten it but never loosen it.
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

use serde_json::Value;

use crate::{Error, Result};

/// How strictly a value must be present
///
/// Levels are totally ordered: `AllowOmitted < AllowNil < AllowEmpty <
/// Present`. A threshold of `AllowNil` reads as "the key must exist, but its
/// value may be null"; `Present` reads as "the value must be non-blank".
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Existence {
    /// The key may be absent from input entirely
    #[default]
    AllowOmitted,
    /// The key must exist but its value may be null
    AllowNil,
    /// The value may be an empty collection or blank string
    AllowEmpty,
    /// The value must be present and non-blank
    Present,
}

impl Existence {
    /// Map a symbolic or boolean declaration token to a lattice level
    ///
    /// `true` / `"present"` map to [`Existence::Present`], `false` / `null` /
    /// `"allow_omitted"` to [`Existence::AllowOmitted`]; `"allow_null"` is
    /// accepted as an alias for `"allow_nil"`. Anything else is a
    /// declaration error.
    pub fn from_token(token: &Value) -> Result<Self> {
        match token {
            Value::Bool(true) => Ok(Existence::Present),
            Value::Bool(false) | Value::Null => Ok(Existence::AllowOmitted),
            Value::String(s) => match s.as_str() {
                "present" => Ok(Existence::Present),
                "allow_empty" => Ok(Existence::AllowEmpty),
                "allow_nil" | "allow_null" => Ok(Existence::AllowNil),
                "allow_omitted" => Ok(Existence::AllowOmitted),
                other => Err(Error::definition(format!(
                    "invalid existence: '{other}'"
                ))),
            },
            other => Err(Error::definition(format!("invalid existence: {other}"))),
        }
    }

    /// Classify a concrete value's own existence level
    ///
    /// Null classifies as [`Existence::AllowNil`]; blank strings, empty
    /// collections, and `false` classify as [`Existence::AllowEmpty`];
    /// everything else as [`Existence::Present`].
    pub fn of_value(value: &Value) -> Existence {
        match value {
            Value::Null => Existence::AllowNil,
            Value::Bool(false) => Existence::AllowEmpty,
            Value::String(s) if s.trim().is_empty() => Existence::AllowEmpty,
            Value::Array(items) if items.is_empty() => Existence::AllowEmpty,
            Value::Object(map) if map.is_empty() => Existence::AllowEmpty,
            _ => Existence::Present,
        }
    }

    /// Whether a candidate value meets or exceeds this threshold
    pub fn reach(&self, value: &Value) -> bool {
        Existence::of_value(value) >= *self
    }

    /// Whether a field at this level belongs in a `required` list
    pub fn required(&self) -> bool {
        *self >= Existence::AllowNil
    }

    /// Whether a field at this level renders as nullable
    pub fn nullable(&self) -> bool {
        *self <= Existence::AllowNil
    }
}
