//! The version-polymorphic OpenAPI renderer
//!
//! One walk serves 2.0, 3.0, and 3.1. The structural divergences branch on
//! [`OpenApiVersion`]: envelope keys, reference prefixes, nullable
//! representation, exclusive-bound style, query-object explosion, and
//! request-body modeling.

use std::collections::BTreeSet;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::definitions::Definitions;
use crate::document::{
    ExternalDocs, Info, Operation, Parameter, ParameterLocation, RequestBody, Response,
    SecurityRequirement, SecurityScheme, SecuritySchemeKind, Server, Tag,
};
use crate::existence::Existence;
use crate::schema::{ObjectSchema, Schema, SchemaOrRef};
use crate::Result;

use super::{ensure_keywords, OpenApiVersion};

/// Top-level document metadata plus everything a render pulls from the
/// definitions registry
#[derive(Debug, Clone)]
pub struct OpenApiDocument {
    pub info: Info,
    pub servers: Vec<Server>,
    pub security: Vec<SecurityRequirement>,
    pub tags: Vec<Tag>,
    pub external_docs: Option<ExternalDocs>,
    pub extensions: IndexMap<String, Value>,
}

impl OpenApiDocument {
    pub fn new(info: Info) -> Self {
        OpenApiDocument {
            info,
            servers: Vec::new(),
            security: Vec::new(),
            tags: Vec::new(),
            external_docs: None,
            extensions: IndexMap::new(),
        }
    }

    /// Render the full document for one OpenAPI version
    pub fn render(&self, definitions: &Definitions, version: OpenApiVersion) -> Result<Value> {
        let mut doc = Map::new();
        match version {
            OpenApiVersion::V2_0 => {
                doc.insert("swagger".into(), Value::String("2.0".into()));
            }
            v => {
                doc.insert("openapi".into(), Value::String(v.as_str().into()));
            }
        }
        doc.insert("info".into(), render_info(&self.info));

        if version != OpenApiVersion::V2_0 && !self.servers.is_empty() {
            let servers = self.servers.iter().map(render_server).collect();
            doc.insert("servers".into(), Value::Array(servers));
        }
        if !self.tags.is_empty() {
            let tags = self.tags.iter().map(render_tag).collect();
            doc.insert("tags".into(), Value::Array(tags));
        }

        // Operations group by path, then by method. A second registration
        // for the same path and method overrides the first.
        let mut paths: IndexMap<String, IndexMap<&'static str, Value>> = IndexMap::new();
        let mut consumes = BTreeSet::new();
        let mut produces = BTreeSet::new();
        let mut schemes = BTreeSet::new();
        for operation in definitions.operations().values() {
            let rendered = render_operation(operation, definitions, version)?;
            let methods = paths.entry(operation.path.clone()).or_default();
            if methods.contains_key(operation.method.as_str()) {
                tracing::warn!(
                    path = %operation.path,
                    method = %operation.method,
                    operation = %operation.name,
                    "operation overrides an earlier registration for the same path and method"
                );
            }
            methods.insert(operation.method.as_str(), rendered);

            if version == OpenApiVersion::V2_0 {
                consumes.extend(operation.consumes.iter().cloned());
                produces.extend(operation.produces.iter().cloned());
                schemes.extend(operation.schemes.iter().cloned());
                if let Some(body) = &operation.request_body {
                    consumes.insert(body.resolve(definitions)?.content_type);
                }
                for response in operation.responses.values() {
                    let response = response.resolve(definitions)?;
                    if response.schema.is_some() {
                        produces.insert(response.content_type);
                    }
                }
            }
        }
        if version == OpenApiVersion::V2_0 {
            for (key, values) in [
                ("consumes", consumes),
                ("produces", produces),
                ("schemes", schemes),
            ] {
                if !values.is_empty() {
                    doc.insert(
                        key.into(),
                        Value::Array(values.into_iter().map(Value::String).collect()),
                    );
                }
            }
        }
        if !paths.is_empty() {
            let mut section = Map::new();
            for (path, methods) in paths {
                let mut by_method = Map::new();
                for (method, rendered) in methods {
                    by_method.insert(method.to_string(), rendered);
                }
                section.insert(path, Value::Object(by_method));
            }
            doc.insert("paths".into(), Value::Object(section));
        }

        render_components(definitions, version, &mut doc)?;

        if !self.security.is_empty() {
            doc.insert("security".into(), render_security(&self.security));
        }
        if let Some(external_docs) = &self.external_docs {
            doc.insert("externalDocs".into(), render_external_docs(external_docs));
        }
        apply_extensions(&self.extensions, &mut doc);
        Ok(Value::Object(doc))
    }
}

fn render_components(
    definitions: &Definitions,
    version: OpenApiVersion,
    doc: &mut Map<String, Value>,
) -> Result<()> {
    let mut schemas = Map::new();
    for (name, schema) in definitions.schemas() {
        schemas.insert(
            name,
            Value::Object(render_schema(&schema, schema.existence(), definitions, version)?),
        );
    }
    let mut parameters = Map::new();
    for (name, parameter) in definitions.parameters() {
        // Reusable entries stay unexploded; explosion happens where an
        // operation uses the parameter.
        parameters.insert(
            name,
            render_plain_parameter(&parameter, definitions, version)?,
        );
    }
    let mut responses = Map::new();
    for (name, response) in definitions.responses() {
        responses.insert(name, render_response(&response, definitions, version)?);
    }
    let mut request_bodies = Map::new();
    for (name, body) in definitions.request_bodies() {
        request_bodies.insert(name, render_request_body(&body, definitions, version)?);
    }
    let mut security_schemes = Map::new();
    for (name, scheme) in definitions.security_schemes() {
        security_schemes.insert(name, render_security_scheme(&scheme, version));
    }

    match version {
        OpenApiVersion::V2_0 => {
            if !schemas.is_empty() {
                doc.insert("definitions".into(), Value::Object(schemas));
            }
            if !parameters.is_empty() {
                doc.insert("parameters".into(), Value::Object(parameters));
            }
            if !responses.is_empty() {
                doc.insert("responses".into(), Value::Object(responses));
            }
            if !security_schemes.is_empty() {
                doc.insert("securityDefinitions".into(), Value::Object(security_schemes));
            }
        }
        _ => {
            let mut components = Map::new();
            if !schemas.is_empty() {
                components.insert("schemas".into(), Value::Object(schemas));
            }
            if !parameters.is_empty() {
                components.insert("parameters".into(), Value::Object(parameters));
            }
            if !request_bodies.is_empty() {
                components.insert("requestBodies".into(), Value::Object(request_bodies));
            }
            if !responses.is_empty() {
                components.insert("responses".into(), Value::Object(responses));
            }
            if !security_schemes.is_empty() {
                components.insert("securitySchemes".into(), Value::Object(security_schemes));
            }
            if !components.is_empty() {
                doc.insert("components".into(), Value::Object(components));
            }
        }
    }
    Ok(())
}

fn render_operation(
    operation: &Operation,
    definitions: &Definitions,
    version: OpenApiVersion,
) -> Result<Value> {
    let mut doc = Map::new();
    doc.insert(
        "operationId".into(),
        Value::String(operation.name.clone()),
    );
    if let Some(summary) = &operation.summary {
        doc.insert("summary".into(), Value::String(summary.clone()));
    }
    if let Some(description) = &operation.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    if !operation.tags.is_empty() {
        doc.insert(
            "tags".into(),
            Value::Array(
                operation
                    .tags
                    .iter()
                    .map(|tag| Value::String(tag.clone()))
                    .collect(),
            ),
        );
    }
    if operation.deprecated {
        doc.insert("deprecated".into(), Value::Bool(true));
    }

    let mut parameters = Vec::new();
    for parameter in operation.resolved_parameters(definitions)? {
        match version {
            OpenApiVersion::V2_0 => {
                parameters.extend(render_parameter_2_0(&parameter, definitions)?)
            }
            _ => parameters.push(render_plain_parameter(&parameter, definitions, version)?),
        }
    }
    if let Some(body) = &operation.request_body {
        let body = body.resolve(definitions)?;
        match version {
            OpenApiVersion::V2_0 => parameters.push(render_body_parameter(&body, definitions)?),
            _ => {
                doc.insert(
                    "requestBody".into(),
                    render_request_body(&body, definitions, version)?,
                );
            }
        }
    }
    if !parameters.is_empty() {
        doc.insert("parameters".into(), Value::Array(parameters));
    }

    let mut responses = Map::new();
    for (status, response) in &operation.responses {
        responses.insert(
            status.clone(),
            render_response(&response.resolve(definitions)?, definitions, version)?,
        );
    }
    if !responses.is_empty() {
        doc.insert("responses".into(), Value::Object(responses));
    }

    if !operation.security.is_empty() {
        doc.insert("security".into(), render_security(&operation.security));
    }
    if let Some(external_docs) = &operation.external_docs {
        doc.insert("externalDocs".into(), render_external_docs(external_docs));
    }
    apply_extensions(&operation.extensions, &mut doc);
    Ok(Value::Object(doc))
}

/// Render one 2.0 parameter, exploding object-typed query parameters into
/// `name[prop]` siblings
fn render_parameter_2_0(parameter: &Parameter, definitions: &Definitions) -> Result<Vec<Value>> {
    let delegator = parameter.schema.resolve(definitions)?;
    if parameter.location == ParameterLocation::Query && parameter.explode != Some(false) {
        if let Schema::Object(object) = delegator.schema() {
            return explode_object_parameter(parameter, object, definitions);
        }
    }
    Ok(vec![render_plain_parameter(
        parameter,
        definitions,
        OpenApiVersion::V2_0,
    )?])
}

fn explode_object_parameter(
    parameter: &Parameter,
    object: &ObjectSchema,
    definitions: &Definitions,
) -> Result<Vec<Value>> {
    let mut out = Vec::new();
    for (name, property) in object.properties(definitions)? {
        let delegator = property.schema.resolve(definitions)?;
        let mut doc = Map::new();
        doc.insert(
            "name".into(),
            Value::String(format!("{}[{}]", parameter.name, name)),
        );
        doc.insert("in".into(), Value::String("query".into()));
        doc.extend(render_schema(
            delegator.schema(),
            delegator.existence(),
            definitions,
            OpenApiVersion::V2_0,
        )?);
        // Same boolean-vs-name-array clash as in render_plain_parameter.
        doc.remove("required");
        if delegator.existence().required() {
            doc.insert("required".into(), Value::Bool(true));
        }
        out.push(Value::Object(doc));
    }
    Ok(out)
}

fn render_plain_parameter(
    parameter: &Parameter,
    definitions: &Definitions,
    version: OpenApiVersion,
) -> Result<Value> {
    let mut doc = Map::new();
    doc.insert("name".into(), Value::String(parameter.name.clone()));
    doc.insert(
        "in".into(),
        Value::String(parameter.location.as_str().into()),
    );
    if let Some(description) = &parameter.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    if parameter.deprecated {
        doc.insert("deprecated".into(), Value::Bool(true));
    }
    match version {
        // 2.0 non-body parameters carry schema keywords at the top level.
        // An object schema contributes a `required` name array there; the
        // parameter-level boolean flag wins.
        OpenApiVersion::V2_0 => {
            let delegator = parameter.schema.resolve(definitions)?;
            doc.extend(render_schema(
                delegator.schema(),
                delegator.existence(),
                definitions,
                version,
            )?);
            doc.remove("required");
        }
        _ => {
            if let Some(explode) = parameter.explode {
                doc.insert("explode".into(), Value::Bool(explode));
            }
            doc.insert(
                "schema".into(),
                Value::Object(render_nested(&parameter.schema, definitions, version)?),
            );
        }
    }
    if parameter.required(definitions)? {
        doc.insert("required".into(), Value::Bool(true));
    }
    apply_extensions(&parameter.extensions, &mut doc);
    Ok(Value::Object(doc))
}

/// The synthetic `in: body` parameter 2.0 models request payloads with
fn render_body_parameter(body: &RequestBody, definitions: &Definitions) -> Result<Value> {
    let mut doc = Map::new();
    doc.insert("name".into(), Value::String("body".into()));
    doc.insert("in".into(), Value::String("body".into()));
    if let Some(description) = &body.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    if body.required(definitions)? {
        doc.insert("required".into(), Value::Bool(true));
    }
    doc.insert(
        "schema".into(),
        Value::Object(render_nested(
            &body.schema,
            definitions,
            OpenApiVersion::V2_0,
        )?),
    );
    apply_extensions(&body.extensions, &mut doc);
    Ok(Value::Object(doc))
}

fn render_request_body(
    body: &RequestBody,
    definitions: &Definitions,
    version: OpenApiVersion,
) -> Result<Value> {
    let mut doc = Map::new();
    if let Some(description) = &body.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    if body.required(definitions)? {
        doc.insert("required".into(), Value::Bool(true));
    }
    let mut media = Map::new();
    media.insert(
        "schema".into(),
        Value::Object(render_nested(&body.schema, definitions, version)?),
    );
    let mut content = Map::new();
    content.insert(body.content_type.clone(), Value::Object(media));
    doc.insert("content".into(), Value::Object(content));
    apply_extensions(&body.extensions, &mut doc);
    Ok(Value::Object(doc))
}

fn render_response(
    response: &Response,
    definitions: &Definitions,
    version: OpenApiVersion,
) -> Result<Value> {
    let mut doc = Map::new();
    doc.insert(
        "description".into(),
        Value::String(response.description.clone().unwrap_or_default()),
    );

    match version {
        OpenApiVersion::V2_0 => {
            if let Some(schema) = &response.schema {
                doc.insert(
                    "schema".into(),
                    Value::Object(render_nested(schema, definitions, version)?),
                );
            }
        }
        _ => {
            if let Some(schema) = &response.schema {
                let mut media = Map::new();
                media.insert(
                    "schema".into(),
                    Value::Object(render_nested(schema, definitions, version)?),
                );
                let mut content = Map::new();
                content.insert(response.content_type.clone(), Value::Object(media));
                doc.insert("content".into(), Value::Object(content));
            }
        }
    }

    if !response.headers.is_empty() {
        let mut headers = Map::new();
        for (name, header) in &response.headers {
            let mut entry = Map::new();
            if let Some(description) = &header.description {
                entry.insert("description".into(), Value::String(description.clone()));
            }
            match version {
                OpenApiVersion::V2_0 => {
                    let delegator = header.schema.resolve(definitions)?;
                    entry.extend(render_schema(
                        delegator.schema(),
                        delegator.existence(),
                        definitions,
                        version,
                    )?);
                }
                _ => {
                    entry.insert(
                        "schema".into(),
                        Value::Object(render_nested(&header.schema, definitions, version)?),
                    );
                }
            }
            headers.insert(name.clone(), Value::Object(entry));
        }
        doc.insert("headers".into(), Value::Object(headers));
    }
    apply_extensions(&response.extensions, &mut doc);
    Ok(Value::Object(doc))
}

fn render_security_scheme(scheme: &SecurityScheme, version: OpenApiVersion) -> Value {
    let mut doc = Map::new();
    match (&scheme.kind, version) {
        (SecuritySchemeKind::ApiKey { name, location }, _) => {
            doc.insert("type".into(), Value::String("apiKey".into()));
            doc.insert("name".into(), Value::String(name.clone()));
            doc.insert("in".into(), Value::String(location.as_str().into()));
        }
        (SecuritySchemeKind::Http { scheme: name, .. }, OpenApiVersion::V2_0) => {
            // 2.0 only knows basic auth among the HTTP schemes.
            if name == "basic" {
                doc.insert("type".into(), Value::String("basic".into()));
            } else {
                tracing::debug!(scheme = %name, "http scheme downgraded to a header api key for 2.0");
                doc.insert("type".into(), Value::String("apiKey".into()));
                doc.insert("name".into(), Value::String("Authorization".into()));
                doc.insert("in".into(), Value::String("header".into()));
            }
        }
        (
            SecuritySchemeKind::Http {
                scheme: name,
                bearer_format,
            },
            _,
        ) => {
            doc.insert("type".into(), Value::String("http".into()));
            doc.insert("scheme".into(), Value::String(name.clone()));
            if let Some(format) = bearer_format {
                doc.insert("bearerFormat".into(), Value::String(format.clone()));
            }
        }
    }
    if let Some(description) = &scheme.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    apply_extensions(&scheme.extensions, &mut doc);
    Value::Object(doc)
}

/// Render one schema node for a given version
///
/// `existence` is the effective level after any reference tightening; it
/// drives the nullable representation.
pub(crate) fn render_schema(
    schema: &Schema,
    existence: Existence,
    definitions: &Definitions,
    version: OpenApiVersion,
) -> Result<Map<String, Value>> {
    ensure_keywords(schema)?;
    let mut doc = Map::new();

    let type_name = schema.schema_type().as_str();
    match version {
        // 2.0 has no nullable concept at all.
        OpenApiVersion::V2_0 => {
            doc.insert("type".into(), Value::String(type_name.into()));
        }
        OpenApiVersion::V3_0 => {
            doc.insert("type".into(), Value::String(type_name.into()));
            if existence.nullable() {
                doc.insert("nullable".into(), Value::Bool(true));
            }
        }
        OpenApiVersion::V3_1 => {
            if existence.nullable() {
                doc.insert(
                    "type".into(),
                    Value::Array(vec![
                        Value::String(type_name.into()),
                        Value::String("null".into()),
                    ]),
                );
            } else {
                doc.insert("type".into(), Value::String(type_name.into()));
            }
        }
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
    if meta.deprecated {
        doc.insert("deprecated".into(), Value::Bool(true));
    }
    if !meta.examples.is_empty() {
        match version {
            // Singular example below 3.1.
            OpenApiVersion::V2_0 | OpenApiVersion::V3_0 => {
                doc.insert("example".into(), meta.examples[0].clone());
            }
            OpenApiVersion::V3_1 => {
                doc.insert("examples".into(), Value::Array(meta.examples.clone()));
            }
        }
    }
    if let Some(external_docs) = &meta.external_docs {
        doc.insert("externalDocs".into(), render_external_docs(external_docs));
    }

    for rule in meta.validations.values() {
        rule.apply_openapi(version, &mut doc);
    }

    match schema {
        Schema::Array(array) => {
            doc.insert(
                "items".into(),
                Value::Object(render_nested(&array.items, definitions, version)?),
            );
        }
        Schema::Object(object) => {
            render_object(object, definitions, version, &mut doc)?;
        }
        _ => {}
    }
    apply_extensions(&meta.extensions, &mut doc);
    Ok(doc)
}

fn render_object(
    object: &ObjectSchema,
    definitions: &Definitions,
    version: OpenApiVersion,
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
                    Value::String(format!("{}{}", version.ref_prefix(), reference.name)),
                );
                Value::Object(entry)
            })
            .collect();
        doc.insert("allOf".into(), Value::Array(refs));
    }

    let mut properties = Map::new();
    let mut required = Vec::new();
    for (name, property) in object.own_properties() {
        let mut rendered = render_nested(&property.schema, definitions, version)?;
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
            Value::Object(render_nested(additional, definitions, version)?),
        );
    }

    if let Some(discriminator) = &object.discriminator {
        match version {
            OpenApiVersion::V2_0 => {
                doc.insert(
                    "discriminator".into(),
                    Value::String(discriminator.property_name.clone()),
                );
            }
            _ => {
                let mut entry = Map::new();
                entry.insert(
                    "propertyName".into(),
                    Value::String(discriminator.property_name.clone()),
                );
                if !discriminator.mapping.is_empty() {
                    let mut mapping = Map::new();
                    for (value, name) in &discriminator.mapping {
                        mapping.insert(
                            value.clone(),
                            Value::String(format!("{}{}", version.ref_prefix(), name)),
                        );
                    }
                    entry.insert("mapping".into(), Value::Object(mapping));
                }
                doc.insert("discriminator".into(), Value::Object(entry));
            }
        }
    }
    Ok(())
}

fn render_nested(
    schema: &SchemaOrRef,
    definitions: &Definitions,
    version: OpenApiVersion,
) -> Result<Map<String, Value>> {
    match schema {
        SchemaOrRef::Inline(inline) => {
            render_schema(inline, inline.existence(), definitions, version)
        }
        SchemaOrRef::Ref(reference) => {
            let mut doc = Map::new();
            doc.insert(
                "$ref".into(),
                Value::String(format!("{}{}", version.ref_prefix(), reference.name)),
            );
            Ok(doc)
        }
    }
}

fn render_info(info: &Info) -> Value {
    let mut doc = Map::new();
    doc.insert("title".into(), Value::String(info.title.clone()));
    doc.insert("version".into(), Value::String(info.version.clone()));
    if let Some(description) = &info.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    if let Some(terms) = &info.terms_of_service {
        doc.insert("termsOfService".into(), Value::String(terms.clone()));
    }
    if let Some(contact) = &info.contact {
        let mut entry = Map::new();
        if let Some(name) = &contact.name {
            entry.insert("name".into(), Value::String(name.clone()));
        }
        if let Some(url) = &contact.url {
            entry.insert("url".into(), Value::String(url.clone()));
        }
        if let Some(email) = &contact.email {
            entry.insert("email".into(), Value::String(email.clone()));
        }
        doc.insert("contact".into(), Value::Object(entry));
    }
    if let Some(license) = &info.license {
        let mut entry = Map::new();
        entry.insert("name".into(), Value::String(license.name.clone()));
        if let Some(url) = &license.url {
            entry.insert("url".into(), Value::String(url.clone()));
        }
        doc.insert("license".into(), Value::Object(entry));
    }
    apply_extensions(&info.extensions, &mut doc);
    Value::Object(doc)
}

fn render_server(server: &Server) -> Value {
    let mut doc = Map::new();
    doc.insert("url".into(), Value::String(server.url.clone()));
    if let Some(description) = &server.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    apply_extensions(&server.extensions, &mut doc);
    Value::Object(doc)
}

fn render_tag(tag: &Tag) -> Value {
    let mut doc = Map::new();
    doc.insert("name".into(), Value::String(tag.name.clone()));
    if let Some(description) = &tag.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    if let Some(external_docs) = &tag.external_docs {
        doc.insert("externalDocs".into(), render_external_docs(external_docs));
    }
    apply_extensions(&tag.extensions, &mut doc);
    Value::Object(doc)
}

fn render_external_docs(external_docs: &ExternalDocs) -> Value {
    let mut doc = Map::new();
    doc.insert("url".into(), Value::String(external_docs.url.clone()));
    if let Some(description) = &external_docs.description {
        doc.insert("description".into(), Value::String(description.clone()));
    }
    Value::Object(doc)
}

fn render_security(requirements: &[SecurityRequirement]) -> Value {
    Value::Array(
        requirements
            .iter()
            .map(|requirement| {
                let mut entry = Map::new();
                for (name, scopes) in requirement {
                    entry.insert(
                        name.clone(),
                        Value::Array(scopes.iter().map(|s| Value::String(s.clone())).collect()),
                    );
                }
                Value::Object(entry)
            })
            .collect(),
    )
}

fn apply_extensions(extensions: &IndexMap<String, Value>, doc: &mut Map<String, Value>) {
    for (key, value) in extensions {
        doc.insert(format!("x-{key}"), value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{HttpMethod, ParameterOrRef};
    use crate::schema::{Property, StringSchema};
    use serde_json::json;

    fn nullable_string() -> Schema {
        let mut schema = StringSchema::new();
        schema.meta.existence = Existence::AllowNil;
        Schema::String(schema)
    }

    #[test]
    fn test_nullable_rendering_divergence() {
        let definitions = Definitions::new();
        let schema = nullable_string();

        let v2_0 = render_schema(&schema, schema.existence(), &definitions, OpenApiVersion::V2_0)
            .unwrap();
        assert_eq!(v2_0["type"], json!("string"));
        assert!(v2_0.get("nullable").is_none());

        let v3_0 = render_schema(&schema, schema.existence(), &definitions, OpenApiVersion::V3_0)
            .unwrap();
        assert_eq!(v3_0["type"], json!("string"));
        assert_eq!(v3_0["nullable"], json!(true));

        let v3_1 = render_schema(&schema, schema.existence(), &definitions, OpenApiVersion::V3_1)
            .unwrap();
        assert_eq!(v3_1["type"], json!(["string", "null"]));
        assert!(v3_1.get("nullable").is_none());
    }

    #[test]
    fn test_envelope_per_version() {
        let definitions = Definitions::new();
        let document = OpenApiDocument::new(Info::new("t", "1.0.0"));

        let v2_0 = document
            .render(&definitions, OpenApiVersion::V2_0)
            .unwrap();
        assert_eq!(v2_0["swagger"], json!("2.0"));
        assert!(v2_0.get("openapi").is_none());

        let v3_0 = document
            .render(&definitions, OpenApiVersion::V3_0)
            .unwrap();
        assert_eq!(v3_0["openapi"], json!("3.0.3"));

        let v3_1 = document
            .render(&definitions, OpenApiVersion::V3_1)
            .unwrap();
        assert_eq!(v3_1["openapi"], json!("3.1.0"));
    }

    #[test]
    fn test_ref_prefix_per_version() {
        let definitions = Definitions::new();
        definitions
            .add_schema("Pet", Schema::Object(ObjectSchema::new()))
            .unwrap();

        let nested = SchemaOrRef::reference("Pet");
        let v2_0 = render_nested(&nested, &definitions, OpenApiVersion::V2_0).unwrap();
        assert_eq!(v2_0["$ref"], json!("#/definitions/Pet"));
        let v3_0 = render_nested(&nested, &definitions, OpenApiVersion::V3_0).unwrap();
        assert_eq!(v3_0["$ref"], json!("#/components/schemas/Pet"));
    }

    #[test]
    fn test_exploded_query_object_in_2_0() {
        let definitions = Definitions::new();
        let mut filter = ObjectSchema::new();
        let mut kind = StringSchema::new();
        kind.meta.existence = Existence::Present;
        filter
            .add_property(Property::new("kind", Schema::String(kind)))
            .unwrap();
        filter
            .add_property(Property::new("label", Schema::String(StringSchema::new())))
            .unwrap();

        let parameter = Parameter::query("filter", Schema::Object(filter));
        let rendered = render_parameter_2_0(&parameter, &definitions).unwrap();
        assert_eq!(rendered.len(), 2);
        assert_eq!(rendered[0]["name"], json!("filter[kind]"));
        assert_eq!(rendered[0]["required"], json!(true));
        assert_eq!(rendered[0]["type"], json!("string"));
        assert_eq!(rendered[1]["name"], json!("filter[label]"));
        assert!(rendered[1].get("required").is_none());
    }

    #[test]
    fn test_2_0_unexploded_object_parameter_keeps_boolean_required() {
        let definitions = Definitions::new();
        let mut filter = ObjectSchema::new();
        filter.meta.existence = Existence::Present;
        let mut kind = StringSchema::new();
        kind.meta.existence = Existence::Present;
        filter
            .add_property(Property::new("kind", Schema::String(kind)))
            .unwrap();

        let mut parameter = Parameter::query("filter", Schema::Object(filter));
        parameter.explode = Some(false);
        let rendered = render_parameter_2_0(&parameter, &definitions).unwrap();
        assert_eq!(rendered.len(), 1);
        // The object schema's `required` name array must not survive at the
        // parameter level.
        assert_eq!(rendered[0]["required"], json!(true));
        assert_eq!(rendered[0]["type"], json!("object"));
        assert_eq!(
            rendered[0]["properties"]["kind"]["type"],
            json!("string")
        );
    }

    #[test]
    fn test_2_0_exploded_object_property_keeps_boolean_required() {
        let definitions = Definitions::new();
        let mut range = ObjectSchema::new();
        range.meta.existence = Existence::Present;
        let mut min = StringSchema::new();
        min.meta.existence = Existence::Present;
        range
            .add_property(Property::new("min", Schema::String(min)))
            .unwrap();

        let mut filter = ObjectSchema::new();
        filter
            .add_property(Property::new("range", Schema::Object(range)))
            .unwrap();

        let parameter = Parameter::query("filter", Schema::Object(filter));
        let rendered = render_parameter_2_0(&parameter, &definitions).unwrap();
        assert_eq!(rendered[0]["name"], json!("filter[range]"));
        assert_eq!(rendered[0]["required"], json!(true));
        assert_eq!(
            rendered[0]["properties"]["min"]["type"],
            json!("string")
        );
    }

    #[test]
    fn test_request_body_modeling_divergence() {
        let definitions = Definitions::new();
        let mut operation = Operation::new("createPet", HttpMethod::Post, "/pets");
        operation.set_request_body(RequestBody::new(Schema::Object(ObjectSchema::new())));
        operation.add_response("201", Response::new(Schema::Object(ObjectSchema::new())));
        definitions.add_operation(operation).unwrap();

        let document = OpenApiDocument::new(Info::new("t", "1.0.0"));

        let v2_0 = document
            .render(&definitions, OpenApiVersion::V2_0)
            .unwrap();
        let parameters = &v2_0["paths"]["/pets"]["post"]["parameters"];
        assert_eq!(parameters[0]["in"], json!("body"));
        assert_eq!(parameters[0]["name"], json!("body"));
        assert_eq!(v2_0["consumes"], json!(["application/json"]));

        let v3_0 = document
            .render(&definitions, OpenApiVersion::V3_0)
            .unwrap();
        let operation = &v3_0["paths"]["/pets"]["post"];
        assert!(operation.get("parameters").is_none());
        assert!(operation["requestBody"]["content"]["application/json"]["schema"].is_object());
    }

    #[test]
    fn test_components_sections_per_version() {
        let definitions = Definitions::new();
        definitions
            .add_schema("Pet", Schema::Object(ObjectSchema::new()))
            .unwrap();
        definitions
            .add_security_scheme("api_key", SecurityScheme::api_key("key", ParameterLocation::Header))
            .unwrap();

        let document = OpenApiDocument::new(Info::new("t", "1.0.0"));

        let v2_0 = document
            .render(&definitions, OpenApiVersion::V2_0)
            .unwrap();
        assert!(v2_0["definitions"]["Pet"].is_object());
        assert_eq!(v2_0["securityDefinitions"]["api_key"]["type"], json!("apiKey"));

        let v3_1 = document
            .render(&definitions, OpenApiVersion::V3_1)
            .unwrap();
        assert!(v3_1["components"]["schemas"]["Pet"].is_object());
        assert_eq!(
            v3_1["components"]["securitySchemes"]["api_key"]["type"],
            json!("apiKey")
        );
    }

    #[test]
    fn test_operation_parameter_rendering_3x() {
        let definitions = Definitions::new();
        let mut operation = Operation::new("listPets", HttpMethod::Get, "/pets");
        let mut limit = StringSchema::new();
        limit.meta.existence = Existence::Present;
        operation.add_parameter(ParameterOrRef::Inline(Parameter::query(
            "limit",
            Schema::String(limit),
        )));
        definitions.add_operation(operation).unwrap();

        let document = OpenApiDocument::new(Info::new("t", "1.0.0"));
        let v3_0 = document
            .render(&definitions, OpenApiVersion::V3_0)
            .unwrap();
        let parameter = &v3_0["paths"]["/pets"]["get"]["parameters"][0];
        assert_eq!(parameter["name"], json!("limit"));
        assert_eq!(parameter["required"], json!(true));
        assert_eq!(parameter["schema"]["type"], json!("string"));
    }

    #[test]
    fn test_vendor_extensions_rendered() {
        let definitions = Definitions::new();
        let mut document = OpenApiDocument::new(Info::new("t", "1.0.0"));
        document.extensions.insert("audience".into(), json!("internal"));
        let rendered = document
            .render(&definitions, OpenApiVersion::V3_0)
            .unwrap();
        assert_eq!(rendered["x-audience"], json!("internal"));
    }
}
