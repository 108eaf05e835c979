//! Typed nodes produced by wrapping

use chrono::{DateTime, FixedOffset, NaiveDate};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::existence::Existence;
use crate::schema::Delegator;
use crate::validation::{ErrorKind, Errors, Path};

static NULL: Value = Value::Null;

/// A cast string value, possibly calendar-typed
#[derive(Debug, Clone, PartialEq)]
pub enum StringValue {
    Plain(String),
    Date(NaiveDate),
    DateTime(DateTime<FixedOffset>),
}

impl StringValue {
    fn to_value(&self) -> Value {
        match self {
            StringValue::Plain(s) => Value::String(s.clone()),
            StringValue::Date(d) => Value::String(d.format("%Y-%m-%d").to_string()),
            StringValue::DateTime(dt) => Value::String(dt.to_rfc3339()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NullNode {
    pub(crate) schema: Delegator,
    pub(crate) path: Path,
    /// Distinguishes an absent key from an explicit null
    pub(crate) omitted: bool,
}

#[derive(Debug, Clone)]
pub struct ScalarNode<T> {
    pub(crate) schema: Delegator,
    pub(crate) path: Path,
    pub(crate) raw: Value,
    /// `None` when the raw value could not be cast
    pub(crate) cast: Option<T>,
}

#[derive(Debug, Clone)]
pub struct ArrayNode {
    pub(crate) schema: Delegator,
    pub(crate) path: Path,
    pub(crate) raw: Value,
    pub(crate) items: Vec<Node>,
    pub(crate) malformed: bool,
}

impl ArrayNode {
    pub fn items(&self) -> &[Node] {
        &self.items
    }
}

#[derive(Debug, Clone)]
pub struct ObjectNode {
    pub(crate) schema: Delegator,
    pub(crate) path: Path,
    pub(crate) raw: Value,
    pub(crate) entries: IndexMap<String, Node>,
    pub(crate) malformed: bool,
}

impl ObjectNode {
    /// Read a wrapped property or additional-properties entry by name
    pub fn get(&self, name: &str) -> Option<&Node> {
        self.entries.get(name)
    }

    pub fn entries(&self) -> &IndexMap<String, Node> {
        &self.entries
    }
}

/// A runtime pairing of a raw value with its resolved schema
#[derive(Debug, Clone)]
pub enum Node {
    Null(NullNode),
    Boolean(ScalarNode<bool>),
    Integer(ScalarNode<i64>),
    Number(ScalarNode<f64>),
    String(ScalarNode<StringValue>),
    Array(ArrayNode),
    Object(ObjectNode),
}

impl Node {
    pub fn schema(&self) -> &Delegator {
        match self {
            Node::Null(n) => &n.schema,
            Node::Boolean(n) => &n.schema,
            Node::Integer(n) => &n.schema,
            Node::Number(n) => &n.schema,
            Node::String(n) => &n.schema,
            Node::Array(n) => &n.schema,
            Node::Object(n) => &n.schema,
        }
    }

    pub fn path(&self) -> &Path {
        match self {
            Node::Null(n) => &n.path,
            Node::Boolean(n) => &n.path,
            Node::Integer(n) => &n.path,
            Node::Number(n) => &n.path,
            Node::String(n) => &n.path,
            Node::Array(n) => &n.path,
            Node::Object(n) => &n.path,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Node::Null(_))
    }

    pub fn as_object(&self) -> Option<&ObjectNode> {
        match self {
            Node::Object(n) => Some(n),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayNode> {
        match self {
            Node::Array(n) => Some(n),
            _ => None,
        }
    }

    fn raw(&self) -> &Value {
        match self {
            Node::Null(_) => &NULL,
            Node::Boolean(n) => &n.raw,
            Node::Integer(n) => &n.raw,
            Node::Number(n) => &n.raw,
            Node::String(n) => &n.raw,
            Node::Array(n) => &n.raw,
            Node::Object(n) => &n.raw,
        }
    }

    /// Classify this node's own existence level, absence counting below
    /// explicit null
    fn existence_level(&self) -> Existence {
        match self {
            Node::Null(n) if n.omitted => Existence::AllowOmitted,
            node => Existence::of_value(node.raw()),
        }
    }

    /// Check presence, then rules, then descend into children
    ///
    /// A failed presence check short-circuits: no rules run and no children
    /// are visited below a blank value.
    pub fn validate(&self, errors: &mut Errors) {
        let threshold = self.schema().existence();
        if self.existence_level() < threshold {
            errors.add(self.path().clone(), ErrorKind::Blank);
            return;
        }

        match self {
            Node::Null(_) => {}
            Node::Boolean(n) => self.validate_scalar(n.cast.is_some(), errors),
            Node::Integer(n) => self.validate_scalar(n.cast.is_some(), errors),
            Node::Number(n) => self.validate_scalar(n.cast.is_some(), errors),
            Node::String(n) => self.validate_scalar(n.cast.is_some(), errors),
            Node::Array(n) => {
                if n.malformed {
                    errors.add(self.path().clone(), ErrorKind::Invalid);
                    return;
                }
                self.run_rules(errors);
                for item in &n.items {
                    item.validate(errors);
                }
            }
            Node::Object(n) => {
                if n.malformed {
                    errors.add(self.path().clone(), ErrorKind::Invalid);
                    return;
                }
                self.run_rules(errors);
                for entry in n.entries.values() {
                    entry.validate(errors);
                }
            }
        }
    }

    fn validate_scalar(&self, cast_ok: bool, errors: &mut Errors) {
        if !cast_ok {
            errors.add(self.path().clone(), ErrorKind::Invalid);
            return;
        }
        self.run_rules(errors);
    }

    fn run_rules(&self, errors: &mut Errors) {
        let value = self.to_value();
        for rule in self.schema().schema().metadata().validations.values() {
            rule.validate(&value, self.path(), errors);
        }
    }

    /// Whether this node and every descendant validates cleanly
    pub fn valid(&self) -> bool {
        let mut errors = Errors::new();
        self.validate(&mut errors);
        errors.is_empty()
    }

    /// The cast output, suitable for response serialization
    ///
    /// Omitted properties are left out of object output; explicit nulls are
    /// kept. A failed cast serializes as null.
    pub fn to_value(&self) -> Value {
        match self {
            Node::Null(_) => Value::Null,
            Node::Boolean(n) => n.cast.map(Value::Bool).unwrap_or(Value::Null),
            Node::Integer(n) => n
                .cast
                .map(|i| Value::Number(Number::from(i)))
                .unwrap_or(Value::Null),
            Node::Number(n) => n
                .cast
                .and_then(Number::from_f64)
                .map(Value::Number)
                .unwrap_or(Value::Null),
            Node::String(n) => n
                .cast
                .as_ref()
                .map(StringValue::to_value)
                .unwrap_or(Value::Null),
            Node::Array(n) => Value::Array(n.items.iter().map(Node::to_value).collect()),
            Node::Object(n) => {
                let mut map = Map::new();
                for (name, entry) in &n.entries {
                    if let Node::Null(null) = entry {
                        if null.omitted {
                            continue;
                        }
                    }
                    map.insert(name.clone(), entry.to_value());
                }
                Value::Object(map)
            }
        }
    }
}
