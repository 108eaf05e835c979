//! Composable validation rules attached to schemas by keyword
//!
//! Each rule holds one immutable parameter, validates a runtime value into an
//! [`Errors`] collector, and knows how to render itself into JSON Schema and
//! OpenAPI keyword form. The exclusive-bound keywords differ across formats:
//! JSON Schema and OpenAPI 3.1 put the numeric limit directly into
//! `exclusiveMinimum`/`exclusiveMaximum`, while OpenAPI 3.0 and 2.0 keep the
//! limit under `minimum`/`maximum` and add a boolean sibling flag.
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use serde_json::{Map, Number, Value};

use crate::render::OpenApiVersion;
use crate::{Error, Result};

use super::{ErrorKind, Errors, Path};

/// A numeric bound, inclusive by default
#[derive(Debug, Clone)]
pub struct Bound {
    value: Number,
    exclusive: bool,
}

impl Bound {
    pub fn new(value: Number, exclusive: bool) -> Self {
        Bound { value, exclusive }
    }

    pub fn value(&self) -> &Number {
        &self.value
    }

    pub fn exclusive(&self) -> bool {
        self.exclusive
    }

    fn limit(&self) -> f64 {
        self.value.as_f64().unwrap_or(f64::NAN)
    }
}

/// An enumerated list of permitted values
#[derive(Debug, Clone)]
pub struct EnumValues {
    values: Vec<Value>,
}

impl EnumValues {
    pub fn new(values: Vec<Value>) -> Result<Self> {
        if values.is_empty() {
            return Err(Error::definition("enum values can't be empty"));
        }
        Ok(EnumValues { values })
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }
}

/// A custom predicate; failures surface as `schema_mismatch` errors
#[derive(Clone)]
pub struct Predicate {
    check: Arc<dyn Fn(&Value) -> std::result::Result<(), String> + Send + Sync>,
}

impl Predicate {
    pub fn new<F>(check: F) -> Self
    where
        F: Fn(&Value) -> std::result::Result<(), String> + Send + Sync + 'static,
    {
        Predicate {
            check: Arc::new(check),
        }
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// A validation rule bound to a schema keyword
#[derive(Debug, Clone)]
pub enum Rule {
    Enum(EnumValues),
    Pattern(Regex),
    MinLength(usize),
    MaxLength(usize),
    Minimum(Bound),
    Maximum(Bound),
    MultipleOf(Number),
    MinItems(usize),
    MaxItems(usize),
    Custom(Predicate),
}

impl Rule {
    /// Compile a pattern rule, rejecting invalid expressions at declaration
    /// time
    pub fn pattern(source: &str) -> Result<Rule> {
        let regex = Regex::new(source)
            .map_err(|e| Error::definition(format!("invalid pattern '{source}': {e}")))?;
        Ok(Rule::Pattern(regex))
    }

    /// A `multipleOf` rule; the divisor must be positive
    pub fn multiple_of(value: Number) -> Result<Rule> {
        if value.as_f64().map(|v| v > 0.0) != Some(true) {
            return Err(Error::definition(format!(
                "multiple_of must be a positive number, got {value}"
            )));
        }
        Ok(Rule::MultipleOf(value))
    }

    /// The schema keyword this rule registers under
    pub fn keyword(&self) -> &'static str {
        match self {
            Rule::Enum(_) => "enum",
            Rule::Pattern(_) => "pattern",
            Rule::MinLength(_) => "minLength",
            Rule::MaxLength(_) => "maxLength",
            Rule::Minimum(_) => "minimum",
            Rule::Maximum(_) => "maximum",
            Rule::MultipleOf(_) => "multipleOf",
            Rule::MinItems(_) => "minItems",
            Rule::MaxItems(_) => "maxItems",
            Rule::Custom(_) => "custom",
        }
    }

    /// Check a value, appending a structured error on failure
    ///
    /// Returns whether the value passed. Rules only inspect values of the
    /// type they constrain; a mismatched runtime type passes here because the
    /// wrapping layer reports the cast failure separately.
    pub fn validate(&self, value: &Value, path: &Path, errors: &mut Errors) -> bool {
        let failure = match self {
            Rule::Enum(values) => (!values.values.contains(value)).then_some(ErrorKind::Inclusion),
            Rule::Pattern(regex) => value
                .as_str()
                .is_some_and(|s| !regex.is_match(s))
                .then_some(ErrorKind::Invalid),
            Rule::MinLength(limit) => value
                .as_str()
                .is_some_and(|s| s.chars().count() < *limit)
                .then(|| ErrorKind::TooShort { count: *limit }),
            Rule::MaxLength(limit) => value
                .as_str()
                .is_some_and(|s| s.chars().count() > *limit)
                .then(|| ErrorKind::TooLong { count: *limit }),
            Rule::Minimum(bound) => value.as_f64().and_then(|v| {
                let limit = bound.limit();
                if bound.exclusive && v <= limit {
                    Some(ErrorKind::GreaterThan { count: limit })
                } else if !bound.exclusive && v < limit {
                    Some(ErrorKind::GreaterThanOrEqualTo { count: limit })
                } else {
                    None
                }
            }),
            Rule::Maximum(bound) => value.as_f64().and_then(|v| {
                let limit = bound.limit();
                if bound.exclusive && v >= limit {
                    Some(ErrorKind::LessThan { count: limit })
                } else if !bound.exclusive && v > limit {
                    Some(ErrorKind::LessThanOrEqualTo { count: limit })
                } else {
                    None
                }
            }),
            Rule::MultipleOf(divisor) => value.as_f64().and_then(|v| {
                let d = divisor.as_f64().unwrap_or(f64::NAN);
                // A non-positive divisor makes every remainder comparison
                // NaN-false; a directly constructed variant fails here
                // instead of passing everything.
                if !(d > 0.0) {
                    return Some(ErrorKind::NotAMultipleOf { count: d });
                }
                let remainder = (v / d).fract().abs();
                (remainder > 1e-9 && (1.0 - remainder).abs() > 1e-9)
                    .then(|| ErrorKind::NotAMultipleOf { count: d })
            }),
            Rule::MinItems(limit) => value
                .as_array()
                .is_some_and(|items| items.len() < *limit)
                .then(|| ErrorKind::TooFewItems { count: *limit }),
            Rule::MaxItems(limit) => value
                .as_array()
                .is_some_and(|items| items.len() > *limit)
                .then(|| ErrorKind::TooManyItems { count: *limit }),
            Rule::Custom(predicate) => (predicate.check)(value)
                .err()
                .map(|message| ErrorKind::SchemaMismatch { message }),
        };

        match failure {
            Some(kind) => {
                errors.add(path.clone(), kind);
                false
            }
            None => true,
        }
    }

    /// Render this rule into a JSON Schema keyword map
    pub fn apply_json_schema(&self, doc: &mut Map<String, Value>) {
        match self {
            Rule::Enum(values) => {
                doc.insert("enum".into(), Value::Array(values.values.clone()));
            }
            Rule::Pattern(regex) => {
                doc.insert("pattern".into(), Value::String(regex.as_str().to_string()));
            }
            Rule::MinLength(limit) => {
                doc.insert("minLength".into(), Value::from(*limit));
            }
            Rule::MaxLength(limit) => {
                doc.insert("maxLength".into(), Value::from(*limit));
            }
            Rule::Minimum(bound) => {
                let keyword = if bound.exclusive {
                    "exclusiveMinimum"
                } else {
                    "minimum"
                };
                doc.insert(keyword.into(), Value::Number(bound.value.clone()));
            }
            Rule::Maximum(bound) => {
                let keyword = if bound.exclusive {
                    "exclusiveMaximum"
                } else {
                    "maximum"
                };
                doc.insert(keyword.into(), Value::Number(bound.value.clone()));
            }
            Rule::MultipleOf(value) => {
                doc.insert("multipleOf".into(), Value::Number(value.clone()));
            }
            Rule::MinItems(limit) => {
                doc.insert("minItems".into(), Value::from(*limit));
            }
            Rule::MaxItems(limit) => {
                doc.insert("maxItems".into(), Value::from(*limit));
            }
            Rule::Custom(_) => {}
        }
    }

    /// Render this rule into an OpenAPI keyword map for the given version
    pub fn apply_openapi(&self, version: OpenApiVersion, doc: &mut Map<String, Value>) {
        // 3.1 reuses JSON Schema vocabulary wholesale.
        if version == OpenApiVersion::V3_1 {
            return self.apply_json_schema(doc);
        }
        match self {
            Rule::Minimum(bound) => {
                doc.insert("minimum".into(), Value::Number(bound.value.clone()));
                if bound.exclusive {
                    doc.insert("exclusiveMinimum".into(), Value::Bool(true));
                }
            }
            Rule::Maximum(bound) => {
                doc.insert("maximum".into(), Value::Number(bound.value.clone()));
                if bound.exclusive {
                    doc.insert("exclusiveMaximum".into(), Value::Bool(true));
                }
            }
            other => other.apply_json_schema(doc),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn check(rule: &Rule, value: Value) -> Errors {
        let mut errors = Errors::new();
        rule.validate(&value, &Path::root(), &mut errors);
        errors
    }

    #[test]
    fn test_max_length_round_trip() {
        let rule = Rule::MaxLength(3);
        assert!(check(&rule, json!("foo")).is_empty());

        let errors = check(&rule, json!("foo bar"));
        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert_eq!(error.kind, ErrorKind::TooLong { count: 3 });
    }

    #[test]
    fn test_enum_membership() {
        let rule = Rule::Enum(EnumValues::new(vec![json!("a"), json!("b")]).unwrap());
        assert!(check(&rule, json!("a")).is_empty());
        let errors = check(&rule, json!("c"));
        assert_eq!(errors.iter().next().unwrap().kind, ErrorKind::Inclusion);
    }

    #[test]
    fn test_empty_enum_rejected() {
        assert!(EnumValues::new(vec![]).is_err());
    }

    #[test]
    fn test_exclusive_maximum() {
        let rule = Rule::Maximum(Bound::new(Number::from(0), true));
        assert!(check(&rule, json!(-1)).is_empty());
        let errors = check(&rule, json!(0));
        assert_eq!(
            errors.iter().next().unwrap().kind,
            ErrorKind::LessThan { count: 0.0 }
        );
    }

    #[test]
    fn test_inclusive_minimum() {
        let rule = Rule::Minimum(Bound::new(Number::from(2), false));
        assert!(check(&rule, json!(2)).is_empty());
        let errors = check(&rule, json!(1));
        assert_eq!(
            errors.iter().next().unwrap().kind,
            ErrorKind::GreaterThanOrEqualTo { count: 2.0 }
        );
    }

    #[test]
    fn test_multiple_of() {
        let rule = Rule::multiple_of(Number::from(5)).unwrap();
        assert!(check(&rule, json!(15)).is_empty());
        assert_eq!(check(&rule, json!(7)).len(), 1);
        assert!(Rule::multiple_of(Number::from(0)).is_err());
    }

    #[test]
    fn test_zero_divisor_variant_fails_instead_of_passing() {
        // The public variant bypasses the guarded constructor.
        let rule = Rule::MultipleOf(Number::from(0));
        assert_eq!(check(&rule, json!(15)).len(), 1);
        assert_eq!(
            check(&rule, json!(15)).iter().next().unwrap().kind.code(),
            "not_a_multiple_of"
        );
    }

    #[test]
    fn test_pattern_source_preserved() {
        let rule = Rule::pattern("^[a-z]+$").unwrap();
        let mut doc = Map::new();
        rule.apply_json_schema(&mut doc);
        assert_eq!(doc["pattern"], json!("^[a-z]+$"));
        assert!(Rule::pattern("[unclosed").is_err());
    }

    #[test]
    fn test_item_counts() {
        let rule = Rule::MinItems(2);
        assert!(check(&rule, json!([1, 2])).is_empty());
        assert_eq!(
            check(&rule, json!([1])).iter().next().unwrap().kind,
            ErrorKind::TooFewItems { count: 2 }
        );
    }

    #[test]
    fn test_exclusive_bound_rendering_divergence() {
        let rule = Rule::Maximum(Bound::new(Number::from(0), true));

        let mut json_schema = Map::new();
        rule.apply_json_schema(&mut json_schema);
        assert_eq!(json_schema.get("exclusiveMaximum"), Some(&json!(0)));
        assert!(!json_schema.contains_key("maximum"));

        let mut v3_1 = Map::new();
        rule.apply_openapi(OpenApiVersion::V3_1, &mut v3_1);
        assert_eq!(v3_1.get("exclusiveMaximum"), Some(&json!(0)));

        let mut v3_0 = Map::new();
        rule.apply_openapi(OpenApiVersion::V3_0, &mut v3_0);
        assert_eq!(v3_0.get("maximum"), Some(&json!(0)));
        assert_eq!(v3_0.get("exclusiveMaximum"), Some(&json!(true)));
    }

    #[test]
    fn test_custom_predicate() {
        let rule = Rule::Custom(Predicate::new(|v| {
            if v.as_str().is_some_and(|s| s.contains('@')) {
                Ok(())
            } else {
                Err("must contain '@'".to_string())
            }
        }));
        assert!(check(&rule, json!("a@b")).is_empty());
        let errors = check(&rule, json!("nope"));
        assert_eq!(errors.iter().next().unwrap().kind.code(), "schema_mismatch");
    }
}
