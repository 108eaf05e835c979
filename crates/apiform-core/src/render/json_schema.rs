//! The JSON Schema renderer
//!
//! Vendor extensions never appear here; they are OpenAPI-only output.

use serde_json::{Map, Value};

use crate::definitions::Definitions;
use crate::schema::{ObjectSchema, Schema, SchemaOrRef};
use crate::Result;

use super::ensure_keywords;

const REF_PREFIX: &str = "#/definitions/";

/// Render a schema into a standalone JSON Schema document
///
/// The document root carries a `definitions` section holding every other
/// registered schema, rendered without their own definitions sections.
pub fn render(schema: &SchemaOrRef, definitions: &Definitions) -> Result<Value> {
    let mut doc = match schema {
        SchemaOrRef::Ref(reference) => {
            let mut doc = Map::new();
            doc.insert(
                "$ref".into(),
                Value::String(format!("{REF_PREFIX}{}", reference.name)),
            );
            doc
        }
        SchemaOrRef::Inline(inline) => render_schema(inline, definitions)?,
    };

    let root = match schema {
        SchemaOrRef::Inline(inline) => Some(std::sync::Arc::as_ptr(inline)),
        SchemaOrRef::Ref(_) => None,
    };
    let mut section = Map::new();
    for (name, sibling) in definitions.schemas() {
        if root == Some(std::sync::Arc::as_ptr(&sibling)) {
            continue;
        }
        section.insert(name, Value::Object(render_schema(&sibling, definitions)?));
    }
    if !section.is_empty() {
        doc.insert("definitions".into(), Value::Object(section));
    }
    Ok(Value::Object(doc))
}

/// Render one schema node, without a definitions section
pub(crate) fn render_schema(
    schema: &Schema,
    definitions: &Definitions,
) -> Result<Map<String, Value>> {
    ensure_keywords(schema)?;
    let mut doc = Map::new();

    let type_name = schema.schema_type().as_str();
    if schema.nullable() {
        doc.insert(
            "type".into(),
            Value::Array(vec![Value::String(type_name.into()), Value::String("null".into())]),
        );
    } else {
        doc.insert("type".into(), Value::String(type_name.into()));
    }

    let meta = schema.metadata();
    if let Some(title) = &meta.title {
        doc.insert("title".into(), Value::String(title.clone()));
    }
    if let Some(description) = &meta.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    if let Some(default) = &meta.default {
        doc.insert("default".into(), default.clone());
    }
    if !meta.examples.is_empty() {
        doc.insert("examples".into(), Value::Array(meta.examples.clone()));
    }
    if meta.deprecated {
        doc.insert("deprecated".into(), Value::Bool(true));
    }

    for rule in meta.validations.values() {
        rule.apply_json_schema(&mut doc);
    }

    match schema {
        Schema::Array(array) => {
            doc.insert(
                "items".into(),
                Value::Object(render_nested(&array.items, definitions)?),
            );
        }
        Schema::Object(object) => {
            render_object(object, definitions, &mut doc)?;
        }
        _ => {}
    }
    Ok(doc)
}

fn render_object(
    object: &ObjectSchema,
    definitions: &Definitions,
    doc: &mut Map<String, Value>,
) -> Result<()> {
    if !object.all_of().is_empty() {
        let refs = object
            .all_of()
            .iter()
            .map(|reference| {
                let mut entry = Map::new();
                entry.insert(
                    "$ref".into(),
                    Value::String(format!("{REF_PREFIX}{}", reference.name)),
                );
                Value::Object(entry)
            })
            .collect();
        doc.insert("allOf".into(), Value::Array(refs));
    }

    let mut properties = Map::new();
    let mut required = Vec::new();
    for (name, property) in object.own_properties() {
        let mut rendered = render_nested(&property.schema, definitions)?;
        if property.read_only {
            rendered.insert("readOnly".into(), Value::Bool(true));
        }
        if property.write_only {
            rendered.insert("writeOnly".into(), Value::Bool(true));
        }
        properties.insert(name.clone(), Value::Object(rendered));
        if property.required(definitions)? {
            required.push(Value::String(name.clone()));
        }
    }
    if !properties.is_empty() {
        doc.insert("properties".into(), Value::Object(properties));
    }
    if !required.is_empty() {
        doc.insert("required".into(), Value::Array(required));
    }

    if let Some(additional) = &object.additional_properties {
        doc.insert(
            "additionalProperties".into(),
            Value::Object(render_nested(additional, definitions)?),
        );
    }
    Ok(())
}

fn render_nested(
    schema: &SchemaOrRef,
    definitions: &Definitions,
) -> Result<Map<String, Value>> {
    match schema {
        SchemaOrRef::Inline(inline) => render_schema(inline, definitions),
        SchemaOrRef::Ref(reference) => {
            let mut doc = Map::new();
            doc.insert(
                "$ref".into(),
                Value::String(format!("{REF_PREFIX}{}", reference.name)),
            );
            Ok(doc)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::existence::Existence;
    use crate::schema::{ArraySchema, Property, Reference, StringSchema};
    use serde_json::json;

    #[test]
    fn test_nullable_renders_as_type_array() {
        let definitions = Definitions::new();
        let mut schema = StringSchema::new();
        schema.meta.existence = Existence::AllowNil;
        let doc = render(
            &SchemaOrRef::from(Schema::String(schema)),
            &definitions,
        )
        .unwrap();
        assert_eq!(doc["type"], json!(["string", "null"]));
    }

    #[test]
    fn test_present_renders_plain_type() {
        let definitions = Definitions::new();
        let mut schema = StringSchema::new();
        schema.meta.existence = Existence::Present;
        let doc = render(&SchemaOrRef::from(Schema::String(schema)), &definitions).unwrap();
        assert_eq!(doc["type"], json!("string"));
    }

    #[test]
    fn test_required_lists_own_properties_in_order() {
        let definitions = Definitions::new();
        let mut object = ObjectSchema::new();
        object.meta.existence = Existence::Present;

        let mut a = StringSchema::new();
        a.meta.existence = Existence::Present;
        object
            .add_property(Property::new("a", Schema::String(a)))
            .unwrap();
        object
            .add_property(Property::new("b", Schema::String(StringSchema::new())))
            .unwrap();
        let mut c = StringSchema::new();
        c.meta.existence = Existence::AllowNil;
        object
            .add_property(Property::new("c", Schema::String(c)))
            .unwrap();

        let doc = render(&SchemaOrRef::from(Schema::Object(object)), &definitions).unwrap();
        assert_eq!(doc["required"], json!(["a", "c"]));
    }

    #[test]
    fn test_definitions_section_holds_siblings_once() {
        let definitions = Definitions::new();
        definitions
            .add_schema("Name", Schema::String(StringSchema::new()))
            .unwrap();

        let array = ArraySchema::new(Reference::schema("Name"));
        let doc = render(&SchemaOrRef::from(Schema::Array(array)), &definitions).unwrap();

        assert_eq!(doc["items"]["$ref"], json!("#/definitions/Name"));
        assert_eq!(doc["definitions"]["Name"]["type"], json!(["string", "null"]));
        // Nested renders never re-include a definitions section.
        assert!(doc["definitions"]["Name"].get("definitions").is_none());
    }

    #[test]
    fn test_vendor_extensions_excluded() {
        let definitions = Definitions::new();
        let mut schema = StringSchema::new();
        schema.meta.add_extension("internal", json!(true));
        let doc = render(&SchemaOrRef::from(Schema::String(schema)), &definitions).unwrap();
        assert!(doc.get("x-internal").is_none());
    }

    #[test]
    fn test_all_of_renders_refs() {
        let definitions = Definitions::new();
        definitions
            .add_schema("Base", Schema::Object(ObjectSchema::new()))
            .unwrap();
        let mut object = ObjectSchema::new();
        object.add_all_of(Reference::schema("Base"));
        let doc = render(&SchemaOrRef::from(Schema::Object(object)), &definitions).unwrap();
        assert_eq!(doc["allOf"], json!([{"$ref": "#/definitions/Base"}]));
    }
}
