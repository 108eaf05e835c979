//! Schema declaration from nested option maps
//!
//! The DSL layer hands declarations over as plain JSON-like option maps,
//! e.g. `{"type": "object", "properties": {...}, "existence": true}`. Each
//! schema kind accepts a fixed key set; unknown keys are declaration errors
//! rather than silently ignored probes. Vendor extension keys (`x-` prefix)
//! are always accepted.
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

use serde_json::{Map, Value};

use crate::document::ExternalDocs;
use crate::existence::Existence;
use crate::schema::{
    ArraySchema, BaseSchema, Discriminator, Metadata, NumericSchema, ObjectSchema, Property,
    Reference, Schema, SchemaOrRef, SchemaType, StringSchema,
};
use crate::validation::{Bound, EnumValues, Rule};
use crate::{Error, Result};

const COMMON_KEYS: &[&str] = &[
    "type",
    "existence",
    "default",
    "deprecated",
    "title",
    "description",
    "examples",
    "external_docs",
    "enum",
];

const OBJECT_KEYS: &[&str] = &[
    "properties",
    "all_of",
    "discriminator",
    "additional_properties",
];

const ARRAY_KEYS: &[&str] = &["items", "min_items", "max_items"];

const STRING_KEYS: &[&str] = &["format", "pattern", "min_length", "max_length"];

const NUMERIC_KEYS: &[&str] = &["minimum", "maximum", "multiple_of"];

const PROPERTY_KEYS: &[&str] = &["read_only", "write_only", "source"];

const REFERENCE_KEYS: &[&str] = &["ref", "existence"];

/// Build a schema (or reference) from a declaration option map
///
/// Dispatches on the `type` key, defaulting to `object`, or on the presence
/// of a `ref` key.
pub fn schema_from_value(options: &Value) -> Result<SchemaOrRef> {
    let map = require_map(options)?;
    if map.contains_key("ref") {
        return Ok(SchemaOrRef::Ref(reference_from(map)?));
    }

    let type_name = match map.get("type") {
        Some(value) => require_str(value, "type")?,
        None => "object",
    };
    let schema_type: SchemaType = type_name.parse()?;

    let schema = match schema_type {
        SchemaType::Object => Schema::Object(object_from(map)?),
        SchemaType::Array => Schema::Array(array_from(map)?),
        SchemaType::String => Schema::String(string_from(map)?),
        SchemaType::Integer => Schema::Numeric(numeric_from(map, true)?),
        SchemaType::Number => Schema::Numeric(numeric_from(map, false)?),
        SchemaType::Boolean => Schema::Base(boolean_from(map)?),
    };
    Ok(SchemaOrRef::inline(schema))
}

fn reference_from(map: &Map<String, Value>) -> Result<Reference> {
    ensure_known_keys(map, &[REFERENCE_KEYS], "reference")?;
    let name = require_str(&map["ref"], "ref")?;
    if name.trim().is_empty() {
        return Err(Error::definition("reference name can't be blank"));
    }
    let mut reference = Reference::schema(name);
    if let Some(token) = map.get("existence") {
        reference.existence = Some(Existence::from_token(token)?);
    }
    Ok(reference)
}

fn object_from(map: &Map<String, Value>) -> Result<ObjectSchema> {
    ensure_known_keys(map, &[COMMON_KEYS, OBJECT_KEYS], "object")?;
    let mut schema = ObjectSchema {
        meta: metadata_from(map)?,
        ..ObjectSchema::default()
    };

    if let Some(properties) = map.get("properties") {
        for (name, options) in require_map(properties)? {
            schema.add_property(property_from(name, options)?)?;
        }
    }
    if let Some(all_of) = map.get("all_of") {
        let entries = all_of
            .as_array()
            .ok_or_else(|| Error::definition("all_of must be an array"))?;
        for entry in entries {
            schema.add_all_of(all_of_reference(entry)?);
        }
    }
    if let Some(options) = map.get("discriminator") {
        schema.discriminator = Some(discriminator_from(options)?);
    }
    if let Some(options) = map.get("additional_properties") {
        schema.additional_properties = Some(Box::new(schema_from_value(options)?));
    }
    Ok(schema)
}

fn property_from(name: &str, options: &Value) -> Result<Property> {
    if name.trim().is_empty() {
        return Err(Error::definition("property name can't be blank"));
    }
    let map = require_map(options)?;

    let mut schema_options = map.clone();
    for key in PROPERTY_KEYS {
        schema_options.remove(*key);
    }
    let schema = schema_from_value(&Value::Object(schema_options))?;

    let mut property = Property::new(name, schema);
    property.read_only = bool_option(map, "read_only")?;
    property.write_only = bool_option(map, "write_only")?;
    if let Some(source) = map.get("source") {
        property.source = source_chain(source)?;
    }
    Ok(property)
}

fn all_of_reference(entry: &Value) -> Result<Reference> {
    match entry {
        Value::String(name) => Ok(Reference::schema(name)),
        Value::Object(map) => reference_from(map),
        other => Err(Error::definition(format!(
            "all_of entries must be schema names or references, got {other}"
        ))),
    }
}

fn discriminator_from(options: &Value) -> Result<Discriminator> {
    match options {
        Value::String(property_name) => Ok(Discriminator::new(property_name)),
        Value::Object(map) => {
            ensure_known_keys(map, &[&["property_name", "mapping"]], "discriminator")?;
            let property_name = match map.get("property_name") {
                Some(value) => require_str(value, "property_name")?,
                None => return Err(Error::definition("discriminator requires a property_name")),
            };
            let mut discriminator = Discriminator::new(property_name);
            if let Some(mapping) = map.get("mapping") {
                for (value, schema_name) in require_map(mapping)? {
                    let schema_name = require_str(schema_name, "mapping value")?;
                    discriminator.mapping.insert(value.clone(), schema_name.to_string());
                }
            }
            Ok(discriminator)
        }
        other => Err(Error::definition(format!(
            "invalid discriminator: {other}"
        ))),
    }
}

fn array_from(map: &Map<String, Value>) -> Result<ArraySchema> {
    ensure_known_keys(map, &[COMMON_KEYS, ARRAY_KEYS], "array")?;
    let items = map
        .get("items")
        .ok_or_else(|| Error::definition("array schemas require an items schema"))?;
    let mut schema = ArraySchema::new(schema_from_value(items)?);
    schema.meta = metadata_from(map)?;

    if let Some(limit) = map.get("min_items") {
        schema
            .meta
            .add_validation(Rule::MinItems(require_usize(limit, "min_items")?));
    }
    if let Some(limit) = map.get("max_items") {
        schema
            .meta
            .add_validation(Rule::MaxItems(require_usize(limit, "max_items")?));
    }
    Ok(schema)
}

fn string_from(map: &Map<String, Value>) -> Result<StringSchema> {
    ensure_known_keys(map, &[COMMON_KEYS, STRING_KEYS], "string")?;
    let mut schema = StringSchema {
        meta: metadata_from(map)?,
        ..StringSchema::default()
    };

    if let Some(format) = map.get("format") {
        schema.format = Some(require_str(format, "format")?.parse()?);
    }
    if let Some(pattern) = map.get("pattern") {
        schema
            .meta
            .add_validation(Rule::pattern(require_str(pattern, "pattern")?)?);
    }
    if let Some(limit) = map.get("min_length") {
        schema
            .meta
            .add_validation(Rule::MinLength(require_usize(limit, "min_length")?));
    }
    if let Some(limit) = map.get("max_length") {
        schema
            .meta
            .add_validation(Rule::MaxLength(require_usize(limit, "max_length")?));
    }
    Ok(schema)
}

fn numeric_from(map: &Map<String, Value>, integer: bool) -> Result<NumericSchema> {
    let type_name = if integer { "integer" } else { "number" };
    ensure_known_keys(map, &[COMMON_KEYS, NUMERIC_KEYS], type_name)?;
    let mut schema = if integer {
        NumericSchema::integer()
    } else {
        NumericSchema::number()
    };
    schema.meta = metadata_from(map)?;

    if let Some(bound) = map.get("minimum") {
        let (value, exclusive) = bound_from(bound, "minimum")?;
        schema
            .meta
            .add_validation(Rule::Minimum(Bound::new(value, exclusive)));
    }
    if let Some(bound) = map.get("maximum") {
        let (value, exclusive) = bound_from(bound, "maximum")?;
        schema
            .meta
            .add_validation(Rule::Maximum(Bound::new(value, exclusive)));
    }
    if let Some(divisor) = map.get("multiple_of") {
        let divisor = divisor
            .as_number()
            .ok_or_else(|| Error::definition("multiple_of must be a number"))?;
        schema.meta.add_validation(Rule::multiple_of(divisor.clone())?);
    }
    Ok(schema)
}

fn boolean_from(map: &Map<String, Value>) -> Result<BaseSchema> {
    ensure_known_keys(map, &[COMMON_KEYS], "boolean")?;
    Ok(BaseSchema {
        meta: metadata_from(map)?,
    })
}

fn metadata_from(map: &Map<String, Value>) -> Result<Metadata> {
    let mut meta = Metadata::default();
    if let Some(token) = map.get("existence") {
        meta.existence = Existence::from_token(token)?;
    }
    meta.default = map.get("default").cloned();
    meta.deprecated = bool_option(map, "deprecated")?;
    meta.title = string_option(map, "title")?;
    meta.description = string_option(map, "description")?;

    if let Some(examples) = map.get("examples") {
        meta.examples = match examples {
            Value::Array(values) => values.clone(),
            single => vec![single.clone()],
        };
    }
    if let Some(docs) = map.get("external_docs") {
        meta.external_docs = Some(external_docs_from(docs)?);
    }
    if let Some(values) = map.get("enum") {
        let values = values
            .as_array()
            .ok_or_else(|| Error::definition("enum must be an array"))?;
        meta.add_validation(Rule::Enum(EnumValues::new(values.clone())?));
    }
    for (key, value) in map {
        if let Some(name) = key.strip_prefix("x-") {
            meta.add_extension(name, value.clone());
        }
    }
    Ok(meta)
}

fn external_docs_from(options: &Value) -> Result<ExternalDocs> {
    let map = require_map(options)?;
    ensure_known_keys(map, &[&["url", "description"]], "external_docs")?;
    let url = match map.get("url") {
        Some(value) => require_str(value, "url")?.to_string(),
        None => return Err(Error::definition("external_docs requires a url")),
    };
    Ok(ExternalDocs {
        url,
        description: string_option(map, "description")?,
    })
}

/// A bare number means an inclusive bound; `{value, exclusive}` makes the
/// exclusivity explicit.
fn bound_from(options: &Value, keyword: &str) -> Result<(serde_json::Number, bool)> {
    match options {
        Value::Number(value) => Ok((value.clone(), false)),
        Value::Object(map) => {
            ensure_known_keys(map, &[&["value", "exclusive"]], keyword)?;
            let value = map
                .get("value")
                .and_then(Value::as_number)
                .ok_or_else(|| Error::definition(format!("{keyword} requires a numeric value")))?;
            Ok((value.clone(), bool_option(map, "exclusive")?))
        }
        other => Err(Error::definition(format!(
            "{keyword} must be a number or {{value, exclusive}}, got {other}"
        ))),
    }
}

fn source_chain(options: &Value) -> Result<Vec<String>> {
    match options {
        Value::String(chain) => Ok(chain.split('.').map(str::to_string).collect()),
        Value::Array(segments) => segments
            .iter()
            .map(|segment| Ok(require_str(segment, "source")?.to_string()))
            .collect(),
        other => Err(Error::definition(format!("invalid source chain: {other}"))),
    }
}

fn ensure_known_keys(
    map: &Map<String, Value>,
    allowed: &[&[&str]],
    type_name: &str,
) -> Result<()> {
    for key in map.keys() {
        if key.starts_with("x-") {
            continue;
        }
        let known = allowed.iter().any(|set| set.contains(&key.as_str()));
        if !known {
            return Err(Error::definition(format!(
                "unknown attribute '{key}' for {type_name} schema"
            )));
        }
    }
    Ok(())
}

fn require_map(value: &Value) -> Result<&Map<String, Value>> {
    value
        .as_object()
        .ok_or_else(|| Error::definition(format!("expected an options map, got {value}")))
}

fn require_str<'a>(value: &'a Value, keyword: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::definition(format!("{keyword} must be a string, got {value}")))
}

fn require_usize(value: &Value, keyword: &str) -> Result<usize> {
    value
        .as_u64()
        .map(|v| v as usize)
        .ok_or_else(|| Error::definition(format!("{keyword} must be a non-negative integer")))
}

fn bool_option(map: &Map<String, Value>, keyword: &str) -> Result<bool> {
    match map.get(keyword) {
        None => Ok(false),
        Some(Value::Bool(flag)) => Ok(*flag),
        Some(other) => Err(Error::definition(format!(
            "{keyword} must be a boolean, got {other}"
        ))),
    }
}

fn string_option(map: &Map<String, Value>, keyword: &str) -> Result<Option<String>> {
    match map.get(keyword) {
        None => Ok(None),
        Some(value) => Ok(Some(require_str(value, keyword)?.to_string())),
    }
}
