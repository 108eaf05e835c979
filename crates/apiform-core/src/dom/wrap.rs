//! Wrapping raw values against resolved schemas

use std::sync::Arc;

use chrono::{DateTime, NaiveDate};
use indexmap::IndexMap;
use serde_json::{Map, Number, Value};

use crate::definitions::Definitions;
use crate::schema::{
    ArraySchema, Delegator, NumericSchema, ObjectSchema, Property, Schema, SchemaOrRef,
    StringFormat, StringSchema,
};
use crate::validation::Path;
use crate::{Error, Result};

use super::node::{ArrayNode, Node, NullNode, ObjectNode, ScalarNode, StringValue};

/// Wrap a raw JSON-like value against a schema into a typed node tree
///
/// References resolve against `definitions` as wrapping descends. Cast and
/// parse failures become validation errors on the resulting nodes; only
/// structural problems (unresolvable references, unknown discriminator
/// variants) fail the wrap itself.
pub fn wrap(value: &Value, schema: &SchemaOrRef, definitions: &Definitions) -> Result<Node> {
    wrap_at(value, schema, definitions, &Path::root())
}

fn wrap_at(
    value: &Value,
    schema: &SchemaOrRef,
    definitions: &Definitions,
    path: &Path,
) -> Result<Node> {
    let delegator = schema.resolve(definitions)?;
    if value.is_null() {
        return Ok(Node::Null(NullNode {
            schema: delegator,
            path: path.clone(),
            omitted: false,
        }));
    }

    let target = delegator.schema_arc();
    match &*target {
        Schema::Object(object) => wrap_object(value, object, delegator, definitions, path),
        Schema::Array(array) => wrap_array(value, array, delegator, definitions, path),
        Schema::String(string) => Ok(wrap_string(value, string, delegator, path)),
        Schema::Numeric(numeric) => Ok(wrap_numeric(value, numeric, delegator, path)),
        Schema::Base(_) => Ok(wrap_boolean(value, delegator, path)),
    }
}

fn wrap_object(
    value: &Value,
    object: &ObjectSchema,
    schema: Delegator,
    definitions: &Definitions,
    path: &Path,
) -> Result<Node> {
    let map = match value.as_object() {
        Some(map) => map,
        None => {
            return Ok(Node::Object(ObjectNode {
                schema,
                path: path.clone(),
                raw: value.clone(),
                entries: IndexMap::new(),
                malformed: true,
            }))
        }
    };

    // Polymorphism: pick the concrete branch before merging properties.
    let branch = resolve_branch(object, map, definitions)?;
    let effective = match &branch {
        Some(target) => match target.as_object() {
            Some(effective) => effective,
            None => {
                return Err(Error::definition(
                    "discriminator resolved to a non-object schema".to_string(),
                ))
            }
        },
        None => object,
    };

    let properties = effective.properties(definitions)?;
    let mut entries = IndexMap::new();
    for (name, property) in &properties {
        let child_path = path.key(name.clone());
        let node = match read_source(map, property) {
            Some(child) => wrap_at(child, &property.schema, definitions, &child_path)?,
            None => Node::Null(NullNode {
                schema: property.schema.resolve(definitions)?,
                path: child_path,
                omitted: true,
            }),
        };
        entries.insert(name.clone(), node);
    }

    if let Some(additional) = &effective.additional_properties {
        for (key, child) in map {
            if properties.contains_key(key) {
                continue;
            }
            let child_path = path.key(key.clone());
            entries.insert(
                key.clone(),
                wrap_at(child, additional, definitions, &child_path)?,
            );
        }
    }

    Ok(Node::Object(ObjectNode {
        schema,
        path: path.clone(),
        raw: value.clone(),
        entries,
        malformed: false,
    }))
}

/// The inheriting schema a discriminator value selects, if any
fn resolve_branch(
    object: &ObjectSchema,
    map: &Map<String, Value>,
    definitions: &Definitions,
) -> Result<Option<Arc<Schema>>> {
    let discriminator = match &object.discriminator {
        Some(discriminator) => discriminator,
        None => return Ok(None),
    };
    let tag = match map
        .get(&discriminator.property_name)
        .and_then(Value::as_str)
    {
        Some(tag) => tag,
        None => return Ok(None),
    };

    let name = discriminator.resolve(tag);
    if !discriminator.mapping.contains_key(tag) {
        tracing::debug!(value = tag, "discriminator value used directly as schema name");
    }
    let target = definitions
        .find_schema(name)
        .map_err(|_| Error::UndefinedVariant {
            value: tag.to_string(),
        })?;
    Ok(Some(target))
}

/// The raw value a property reads from, honoring its source chain
fn read_source<'a>(map: &'a Map<String, Value>, property: &Property) -> Option<&'a Value> {
    if property.source.is_empty() {
        return map.get(&property.name);
    }
    let mut steps = property.source.iter();
    let mut current = map.get(steps.next()?)?;
    for step in steps {
        current = current.as_object()?.get(step)?;
    }
    Some(current)
}

fn wrap_array(
    value: &Value,
    array: &ArraySchema,
    schema: Delegator,
    definitions: &Definitions,
    path: &Path,
) -> Result<Node> {
    let raw_items = match value.as_array() {
        Some(items) => items,
        None => {
            return Ok(Node::Array(ArrayNode {
                schema,
                path: path.clone(),
                raw: value.clone(),
                items: Vec::new(),
                malformed: true,
            }))
        }
    };

    let mut items = Vec::with_capacity(raw_items.len());
    for (index, item) in raw_items.iter().enumerate() {
        items.push(wrap_at(item, &array.items, definitions, &path.index(index))?);
    }
    Ok(Node::Array(ArrayNode {
        schema,
        path: path.clone(),
        raw: value.clone(),
        items,
        malformed: false,
    }))
}

fn wrap_string(value: &Value, string: &StringSchema, schema: Delegator, path: &Path) -> Node {
    let cast = cast_string(value)
        .and_then(|s| convert_string(string, s))
        .and_then(|s| match string.format {
            None => Some(StringValue::Plain(s)),
            Some(StringFormat::Date) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
                .ok()
                .map(StringValue::Date),
            Some(StringFormat::DateTime) => DateTime::parse_from_rfc3339(&s)
                .ok()
                .map(StringValue::DateTime),
        });
    Node::String(ScalarNode {
        schema,
        path: path.clone(),
        raw: value.clone(),
        cast,
    })
}

fn wrap_numeric(value: &Value, numeric: &NumericSchema, schema: Delegator, path: &Path) -> Node {
    if numeric.is_integer() {
        let cast = cast_integer(value).and_then(|i| convert_integer(numeric, i));
        Node::Integer(ScalarNode {
            schema,
            path: path.clone(),
            raw: value.clone(),
            cast,
        })
    } else {
        let cast = cast_number(value).and_then(|f| convert_number(numeric, f));
        Node::Number(ScalarNode {
            schema,
            path: path.clone(),
            raw: value.clone(),
            cast,
        })
    }
}

fn wrap_boolean(value: &Value, schema: Delegator, path: &Path) -> Node {
    let cast = match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    };
    Node::Boolean(ScalarNode {
        schema,
        path: path.clone(),
        raw: value.clone(),
        cast,
    })
}

// Raw request parameters arrive as strings; scalar casts coerce them.
fn cast_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn cast_integer(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn cast_number(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn convert_string(string: &StringSchema, s: String) -> Option<String> {
    match &string.conversion {
        Some(conversion) => match conversion.apply(Value::String(s)) {
            Value::String(converted) => Some(converted),
            _ => None,
        },
        None => Some(s),
    }
}

fn convert_integer(numeric: &NumericSchema, i: i64) -> Option<i64> {
    match &numeric.conversion {
        Some(conversion) => conversion.apply(Value::from(i)).as_i64(),
        None => Some(i),
    }
}

fn convert_number(numeric: &NumericSchema, f: f64) -> Option<f64> {
    match &numeric.conversion {
        Some(conversion) => Number::from_f64(f)
            .map(Value::Number)
            .and_then(|v| conversion.apply(v).as_f64()),
        None => Some(f),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::existence::Existence;
    use crate::schema::{Conversion, Discriminator, Reference};
    use crate::validation::Errors;
    use serde_json::json;

    fn required_string() -> Schema {
        let mut schema = StringSchema::new();
        schema.meta.existence = Existence::Present;
        Schema::String(schema)
    }

    fn object_with_required(name: &str) -> Schema {
        let mut object = ObjectSchema::new();
        object.meta.existence = Existence::Present;
        object
            .add_property(Property::new(name, required_string()))
            .unwrap();
        Schema::Object(object)
    }

    fn validate(node: &Node) -> Errors {
        let mut errors = Errors::new();
        node.validate(&mut errors);
        errors
    }

    #[test]
    fn test_nested_blank_error_path() {
        let definitions = Definitions::new();
        let mut root = ObjectSchema::new();
        root.add_property(Property::new("foo", object_with_required("bar")))
            .unwrap();
        let schema = SchemaOrRef::from(Schema::Object(root));

        let node = wrap(&json!({"foo": {"bar": null}}), &schema, &definitions).unwrap();
        let errors = validate(&node);
        assert_eq!(errors.len(), 1);
        let error = errors.iter().next().unwrap();
        assert_eq!(error.path.to_string(), "foo.bar");
        assert_eq!(error.kind.code(), "blank");
    }

    #[test]
    fn test_omitted_required_property_is_blank() {
        let definitions = Definitions::new();
        let schema = SchemaOrRef::from(object_with_required("bar"));

        let node = wrap(&json!({}), &schema, &definitions).unwrap();
        let errors = validate(&node);
        assert!(errors
            .iter()
            .any(|e| e.path.to_string() == "bar" && e.kind.code() == "blank"));
    }

    #[test]
    fn test_scalar_coercion_from_strings() {
        let definitions = Definitions::new();
        let schema = SchemaOrRef::from(Schema::Numeric(NumericSchema::integer()));
        let node = wrap(&json!("42"), &schema, &definitions).unwrap();
        assert!(node.valid());
        assert_eq!(node.to_value(), json!(42));

        let schema = SchemaOrRef::from(Schema::Base(crate::schema::BaseSchema::new()));
        let node = wrap(&json!("true"), &schema, &definitions).unwrap();
        assert_eq!(node.to_value(), json!(true));
    }

    #[test]
    fn test_failed_cast_is_invalid_not_fatal() {
        let definitions = Definitions::new();
        let schema = SchemaOrRef::from(Schema::Numeric(NumericSchema::integer()));
        let node = wrap(&json!("not a number"), &schema, &definitions).unwrap();
        let errors = validate(&node);
        assert_eq!(errors.iter().next().unwrap().kind.code(), "invalid");
    }

    #[test]
    fn test_invalid_date_records_error() {
        let definitions = Definitions::new();
        let schema = SchemaOrRef::from(Schema::String(
            StringSchema::new().with_format(StringFormat::Date),
        ));

        let node = wrap(&json!("2026-02-30"), &schema, &definitions).unwrap();
        let errors = validate(&node);
        assert_eq!(errors.iter().next().unwrap().kind.code(), "invalid");

        let node = wrap(&json!("2026-08-30"), &schema, &definitions).unwrap();
        assert!(node.valid());
        assert_eq!(node.to_value(), json!("2026-08-30"));
    }

    #[test]
    fn test_unknown_keys_ignored_without_additional_properties() {
        let definitions = Definitions::new();
        let schema = SchemaOrRef::from(Schema::Object(ObjectSchema::new()));
        let node = wrap(&json!({"stray": 1}), &schema, &definitions).unwrap();
        assert!(node.valid());
        assert_eq!(node.to_value(), json!({}));
    }

    #[test]
    fn test_additional_properties_wrap_excess_keys() {
        let definitions = Definitions::new();
        let mut object = ObjectSchema::new();
        object.additional_properties = Some(Box::new(SchemaOrRef::from(Schema::Numeric(
            NumericSchema::integer(),
        ))));
        let schema = SchemaOrRef::from(Schema::Object(object));

        let node = wrap(&json!({"a": "1", "b": "2"}), &schema, &definitions).unwrap();
        assert!(node.valid());
        assert_eq!(node.to_value(), json!({"a": 1, "b": 2}));
    }

    #[test]
    fn test_array_elements_indexed_in_error_paths() {
        let definitions = Definitions::new();
        let array = ArraySchema::new(required_string());
        let schema = SchemaOrRef::from(Schema::Array(array));

        let node = wrap(&json!(["ok", ""]), &schema, &definitions).unwrap();
        let errors = validate(&node);
        assert_eq!(errors.iter().next().unwrap().path.to_string(), "[1]");
    }

    #[test]
    fn test_source_chain_digs_into_nested_value() {
        let definitions = Definitions::new();
        let mut object = ObjectSchema::new();
        object
            .add_property(
                Property::new("name", required_string())
                    .with_source(vec!["user".into(), "name".into()]),
            )
            .unwrap();
        let schema = SchemaOrRef::from(Schema::Object(object));

        let node = wrap(&json!({"user": {"name": "ada"}}), &schema, &definitions).unwrap();
        assert!(node.valid());
        assert_eq!(node.to_value(), json!({"name": "ada"}));
    }

    #[test]
    fn test_discriminator_selects_branch() {
        let definitions = Definitions::new();
        definitions
            .add_schema("Dog", object_with_required("bark"))
            .unwrap();

        let mut base = ObjectSchema::new();
        base.add_property(Property::new("kind", required_string()))
            .unwrap();
        base.discriminator = Some(Discriminator::new("kind").map("dog", "Dog"));
        let schema = SchemaOrRef::from(Schema::Object(base));

        let node = wrap(&json!({"kind": "dog"}), &schema, &definitions).unwrap();
        let errors = validate(&node);
        assert!(errors
            .iter()
            .any(|e| e.path.to_string() == "bark" && e.kind.code() == "blank"));
    }

    #[test]
    fn test_unresolvable_discriminator_value() {
        let definitions = Definitions::new();
        let mut base = ObjectSchema::new();
        base.add_property(Property::new("kind", required_string()))
            .unwrap();
        base.discriminator = Some(Discriminator::new("kind"));
        let schema = SchemaOrRef::from(Schema::Object(base));

        match wrap(&json!({"kind": "Ghost"}), &schema, &definitions) {
            Err(Error::UndefinedVariant { value }) => assert_eq!(value, "Ghost"),
            other => panic!("expected undefined variant error, got {other:?}"),
        }
    }

    #[test]
    fn test_conversion_applied_after_cast() {
        let definitions = Definitions::new();
        let schema = StringSchema::new().with_conversion(Conversion::new(|v| match v {
            Value::String(s) => Value::String(s.to_uppercase()),
            other => other,
        }));
        let schema = SchemaOrRef::from(Schema::String(schema));

        let node = wrap(&json!("hi"), &schema, &definitions).unwrap();
        assert_eq!(node.to_value(), json!("HI"));
    }

    #[test]
    fn test_reference_resolution_during_wrap() {
        let definitions = Definitions::new();
        definitions
            .add_schema("Name", Schema::String(StringSchema::new()))
            .unwrap();
        let schema = SchemaOrRef::from(Reference::schema("Name").with_existence(Existence::Present));

        let node = wrap(&Value::Null, &schema, &definitions).unwrap();
        let errors = validate(&node);
        assert_eq!(errors.iter().next().unwrap().kind.code(), "blank");
    }
}
