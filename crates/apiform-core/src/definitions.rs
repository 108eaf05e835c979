//! The named-component registry with inheritance and inclusion
//!
//! A [`Definitions`] registry owns named maps of reusable components
//! (schemas, parameters, request bodies, responses, security schemes,
//! operations). Registries compose two ways: a child registry *inherits*
//! everything its parent chain defines, and a registry can *include* other
//! registries, merging their maps first-definition-wins. The merged
//! effective view is memoized; every cached view records the mutation epoch
//! of each registry it read, and a stale stamp forces a rebuild before the
//! next read. All mutation happens behind one lock per registry, so the
//! mutate-and-invalidate sequence is a single critical section in
//! multi-threaded hosts.
//!
//! Copyright (c) 2025 Apiform Team
//! Licensed under the Apache-2.0 license

use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use serde_json::Value;

use crate::document::{Operation, Parameter, RequestBody, Response, SecurityScheme};
use crate::schema::{schema_from_value, Schema, SchemaOrRef};
use crate::{Error, Result};

/// A registry of named, reusable components
///
/// Cheap to clone; clones share the same underlying registry.
#[derive(Clone, Default)]
pub struct Definitions {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Default)]
struct Inner {
    schemas: IndexMap<String, Arc<Schema>>,
    parameters: IndexMap<String, Arc<Parameter>>,
    request_bodies: IndexMap<String, Arc<RequestBody>>,
    responses: IndexMap<String, Arc<Response>>,
    security_schemes: IndexMap<String, Arc<SecurityScheme>>,
    operations: IndexMap<String, Arc<Operation>>,
    includes: Vec<Definitions>,
    parent: Option<Definitions>,
    epoch: u64,
    cache: Option<CachedView>,
}

struct CachedView {
    stamps: Vec<(usize, u64)>,
    view: Arc<EffectiveView>,
}

/// The merged component maps visible from one registry
#[derive(Default)]
pub(crate) struct EffectiveView {
    pub(crate) schemas: IndexMap<String, Arc<Schema>>,
    pub(crate) parameters: IndexMap<String, Arc<Parameter>>,
    pub(crate) request_bodies: IndexMap<String, Arc<RequestBody>>,
    pub(crate) responses: IndexMap<String, Arc<Response>>,
    pub(crate) security_schemes: IndexMap<String, Arc<SecurityScheme>>,
    pub(crate) operations: IndexMap<String, Arc<Operation>>,
}

impl PartialEq for Definitions {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Definitions {}

impl std::fmt::Debug for Definitions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.read();
        f.debug_struct("Definitions")
            .field("schemas", &inner.schemas.keys().collect::<Vec<_>>())
            .field("operations", &inner.operations.keys().collect::<Vec<_>>())
            .field("includes", &inner.includes.len())
            .field("epoch", &inner.epoch)
            .finish()
    }
}

impl Definitions {
    pub fn new() -> Self {
        Definitions::default()
    }

    /// Create a child registry inheriting everything this one defines
    pub fn child(&self) -> Self {
        let child = Definitions::new();
        child.write().parent = Some(self.clone());
        child
    }

    fn read(&self) -> RwLockReadGuard<'_, Inner> {
        match self.inner.read() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write(&self) -> RwLockWriteGuard<'_, Inner> {
        match self.inner.write() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn id(&self) -> usize {
        Arc::as_ptr(&self.inner) as *const () as usize
    }

    /// Register a reusable schema; duplicate names within the same registry
    /// are declaration errors
    pub fn add_schema(&self, name: impl Into<String>, schema: Schema) -> Result<()> {
        let name = valid_name(name, "schema")?;
        let mut inner = self.write();
        if inner.schemas.contains_key(&name) {
            return Err(Error::definition(format!("schema already defined: '{name}'")));
        }
        inner.schemas.insert(name, Arc::new(schema));
        invalidate(&mut inner);
        Ok(())
    }

    /// Declare and register a reusable schema from a nested option map
    pub fn add_schema_from_value(&self, name: impl Into<String>, options: &Value) -> Result<()> {
        match schema_from_value(options)? {
            SchemaOrRef::Inline(schema) => self.add_schema(name, (*schema).clone()),
            SchemaOrRef::Ref(_) => Err(Error::definition(
                "a reusable schema can't be declared as a bare reference",
            )),
        }
    }

    pub fn add_parameter(&self, parameter: Parameter) -> Result<()> {
        let name = valid_name(parameter.name.clone(), "parameter")?;
        let mut inner = self.write();
        if inner.parameters.contains_key(&name) {
            return Err(Error::definition(format!(
                "parameter already defined: '{name}'"
            )));
        }
        inner.parameters.insert(name, Arc::new(parameter));
        invalidate(&mut inner);
        Ok(())
    }

    pub fn add_request_body(&self, name: impl Into<String>, body: RequestBody) -> Result<()> {
        let name = valid_name(name, "request body")?;
        let mut inner = self.write();
        if inner.request_bodies.contains_key(&name) {
            return Err(Error::definition(format!(
                "request body already defined: '{name}'"
            )));
        }
        inner.request_bodies.insert(name, Arc::new(body));
        invalidate(&mut inner);
        Ok(())
    }

    pub fn add_response(&self, name: impl Into<String>, response: Response) -> Result<()> {
        let name = valid_name(name, "response")?;
        let mut inner = self.write();
        if inner.responses.contains_key(&name) {
            return Err(Error::definition(format!(
                "response already defined: '{name}'"
            )));
        }
        inner.responses.insert(name, Arc::new(response));
        invalidate(&mut inner);
        Ok(())
    }

    pub fn add_security_scheme(
        &self,
        name: impl Into<String>,
        scheme: SecurityScheme,
    ) -> Result<()> {
        let name = valid_name(name, "security scheme")?;
        let mut inner = self.write();
        if inner.security_schemes.contains_key(&name) {
            return Err(Error::definition(format!(
                "security scheme already defined: '{name}'"
            )));
        }
        inner.security_schemes.insert(name, Arc::new(scheme));
        invalidate(&mut inner);
        Ok(())
    }

    /// Register an operation, keyed by its operation name
    pub fn add_operation(&self, operation: Operation) -> Result<()> {
        let name = valid_name(operation.name.clone(), "operation")?;
        let mut inner = self.write();
        if inner.operations.contains_key(&name) {
            return Err(Error::definition(format!(
                "operation already defined: '{name}'"
            )));
        }
        inner.operations.insert(name, Arc::new(operation));
        invalidate(&mut inner);
        Ok(())
    }

    /// Merge another registry's definitions into this one's view
    ///
    /// First definition wins on name collision. Self-inclusion is an
    /// idempotent no-op; an inclusion that would close a cycle is rejected
    /// before anything changes.
    pub fn include(&self, other: &Definitions) -> Result<()> {
        if self == other {
            return Ok(());
        }
        if other.reaches(self) {
            return Err(Error::CircularInclusion);
        }
        let mut inner = self.write();
        if !inner.includes.contains(other) {
            inner.includes.push(other.clone());
            invalidate(&mut inner);
        }
        Ok(())
    }

    /// Whether `target` is reachable from this registry through includes or
    /// inheritance
    fn reaches(&self, target: &Definitions) -> bool {
        if self == target {
            return true;
        }
        let (parent, includes) = {
            let inner = self.read();
            (inner.parent.clone(), inner.includes.clone())
        };
        if let Some(parent) = parent {
            if parent.reaches(target) {
                return true;
            }
        }
        includes.iter().any(|included| included.reaches(target))
    }

    /// Every registry contributing to this one's view: self, then the
    /// inheritance chain, then includes, deduplicated in visit order
    fn ancestors(&self) -> Vec<Definitions> {
        let mut seen = Vec::new();
        self.collect_ancestors(&mut seen);
        seen
    }

    fn collect_ancestors(&self, seen: &mut Vec<Definitions>) {
        if seen.contains(self) {
            return;
        }
        seen.push(self.clone());
        let (parent, includes) = {
            let inner = self.read();
            (inner.parent.clone(), inner.includes.clone())
        };
        if let Some(parent) = parent {
            parent.collect_ancestors(seen);
        }
        for included in includes {
            included.collect_ancestors(seen);
        }
    }

    /// The memoized effective view, rebuilt when any contributing registry
    /// has mutated since it was cached
    pub(crate) fn view(&self) -> Arc<EffectiveView> {
        let ancestors = self.ancestors();
        let stamps: Vec<(usize, u64)> = ancestors
            .iter()
            .map(|definitions| (definitions.id(), definitions.read().epoch))
            .collect();

        {
            let inner = self.read();
            if let Some(cached) = &inner.cache {
                if cached.stamps == stamps {
                    return cached.view.clone();
                }
            }
        }

        tracing::debug!(
            registries = ancestors.len(),
            "rebuilding effective definitions view"
        );
        let view = Arc::new(EffectiveView::build(&ancestors));
        self.write().cache = Some(CachedView {
            stamps,
            view: view.clone(),
        });
        view
    }

    pub fn schema(&self, name: &str) -> Option<Arc<Schema>> {
        self.view().schemas.get(name).cloned()
    }

    pub fn find_schema(&self, name: &str) -> Result<Arc<Schema>> {
        self.schema(name).ok_or_else(|| Error::reference(name))
    }

    pub fn parameter(&self, name: &str) -> Option<Arc<Parameter>> {
        self.view().parameters.get(name).cloned()
    }

    pub fn find_parameter(&self, name: &str) -> Result<Arc<Parameter>> {
        self.parameter(name).ok_or_else(|| Error::reference(name))
    }

    pub fn request_body(&self, name: &str) -> Option<Arc<RequestBody>> {
        self.view().request_bodies.get(name).cloned()
    }

    pub fn find_request_body(&self, name: &str) -> Result<Arc<RequestBody>> {
        self.request_body(name).ok_or_else(|| Error::reference(name))
    }

    pub fn response(&self, name: &str) -> Option<Arc<Response>> {
        self.view().responses.get(name).cloned()
    }

    pub fn find_response(&self, name: &str) -> Result<Arc<Response>> {
        self.response(name).ok_or_else(|| Error::reference(name))
    }

    pub fn security_scheme(&self, name: &str) -> Option<Arc<SecurityScheme>> {
        self.view().security_schemes.get(name).cloned()
    }

    pub fn operation(&self, name: &str) -> Option<Arc<Operation>> {
        self.view().operations.get(name).cloned()
    }

    /// All visible schemas in declaration order
    pub fn schemas(&self) -> IndexMap<String, Arc<Schema>> {
        self.view().schemas.clone()
    }

    pub fn parameters(&self) -> IndexMap<String, Arc<Parameter>> {
        self.view().parameters.clone()
    }

    pub fn request_bodies(&self) -> IndexMap<String, Arc<RequestBody>> {
        self.view().request_bodies.clone()
    }

    pub fn responses(&self) -> IndexMap<String, Arc<Response>> {
        self.view().responses.clone()
    }

    pub fn security_schemes(&self) -> IndexMap<String, Arc<SecurityScheme>> {
        self.view().security_schemes.clone()
    }

    pub fn operations(&self) -> IndexMap<String, Arc<Operation>> {
        self.view().operations.clone()
    }
}

fn invalidate(inner: &mut Inner) {
    inner.epoch += 1;
    inner.cache = None;
}

fn valid_name(name: impl Into<String>, kind: &str) -> Result<String> {
    let name = name.into();
    if name.trim().is_empty() {
        return Err(Error::definition(format!("{kind} name can't be blank")));
    }
    Ok(name)
}

impl EffectiveView {
    fn build(ancestors: &[Definitions]) -> Self {
        let mut view = EffectiveView::default();
        for definitions in ancestors {
            let inner = definitions.read();
            merge(&mut view.schemas, &inner.schemas);
            merge(&mut view.parameters, &inner.parameters);
            merge(&mut view.request_bodies, &inner.request_bodies);
            merge(&mut view.responses, &inner.responses);
            merge(&mut view.security_schemes, &inner.security_schemes);
            merge(&mut view.operations, &inner.operations);
        }
        view
    }
}

// Keep-existing merge: earlier registries in the ancestor walk win.
fn merge<T: Clone>(target: &mut IndexMap<String, T>, source: &IndexMap<String, T>) {
    for (name, value) in source {
        target.entry(name.clone()).or_insert_with(|| value.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::StringSchema;

    fn string_schema() -> Schema {
        Schema::String(StringSchema::new())
    }

    #[test]
    fn test_duplicate_schema_rejected() {
        let definitions = Definitions::new();
        definitions.add_schema("X", string_schema()).unwrap();
        assert!(definitions.add_schema("X", string_schema()).is_err());
    }

    #[test]
    fn test_blank_name_rejected() {
        let definitions = Definitions::new();
        assert!(definitions.add_schema("  ", string_schema()).is_err());
    }

    #[test]
    fn test_included_definitions_visible() {
        let a = Definitions::new();
        let b = Definitions::new();
        b.include(&a).unwrap();

        // Additions on either side of the include call are visible.
        a.add_schema("X", string_schema()).unwrap();
        assert!(b.schema("X").is_some());

        a.add_schema("Y", string_schema()).unwrap();
        assert!(b.schema("Y").is_some());
    }

    #[test]
    fn test_self_inclusion_is_noop() {
        let definitions = Definitions::new();
        definitions.include(&definitions.clone()).unwrap();
        definitions.add_schema("X", string_schema()).unwrap();
        assert!(definitions.schema("X").is_some());
    }

    #[test]
    fn test_inclusion_cycle_rejected() {
        let a = Definitions::new();
        let b = Definitions::new();
        b.include(&a).unwrap();
        match a.include(&b) {
            Err(Error::CircularInclusion) => {}
            other => panic!("expected circular inclusion error, got {other:?}"),
        }
    }

    #[test]
    fn test_transitive_inclusion_cycle_rejected() {
        let a = Definitions::new();
        let b = Definitions::new();
        let c = Definitions::new();
        b.include(&a).unwrap();
        c.include(&b).unwrap();
        assert!(a.include(&c).is_err());
    }

    #[test]
    fn test_repeated_include_is_idempotent() {
        let a = Definitions::new();
        let b = Definitions::new();
        b.include(&a).unwrap();
        b.include(&a).unwrap();
        a.add_schema("X", string_schema()).unwrap();
        assert_eq!(b.schemas().len(), 1);
    }

    #[test]
    fn test_child_inherits_parent_definitions() {
        let parent = Definitions::new();
        parent.add_schema("Base", string_schema()).unwrap();
        let child = parent.child();
        assert!(child.schema("Base").is_some());

        // Parent mutations after the first read are still observed.
        let _ = child.schemas();
        parent.add_schema("Late", string_schema()).unwrap();
        assert!(child.schema("Late").is_some());
    }

    #[test]
    fn test_first_definition_wins_on_collision() {
        let a = Definitions::new();
        let b = Definitions::new();
        b.add_schema("X", Schema::String(StringSchema::new().max_length(1)))
            .unwrap();
        a.add_schema("X", string_schema()).unwrap();
        b.include(&a).unwrap();

        let resolved = b.find_schema("X").unwrap();
        assert!(resolved.metadata().validations.contains_key("maxLength"));
    }

    #[test]
    fn test_find_schema_reports_unresolved_name() {
        let definitions = Definitions::new();
        match definitions.find_schema("Ghost") {
            Err(Error::Reference { name }) => assert_eq!(name, "Ghost"),
            other => panic!("expected reference error, got {other:?}"),
        }
    }

    #[test]
    fn test_cached_view_is_reused_until_mutation() {
        let definitions = Definitions::new();
        definitions.add_schema("X", string_schema()).unwrap();

        let first = definitions.view();
        let second = definitions.view();
        assert!(Arc::ptr_eq(&first, &second));

        definitions.add_schema("Y", string_schema()).unwrap();
        let third = definitions.view();
        assert!(!Arc::ptr_eq(&first, &third));
        assert_eq!(third.schemas.len(), 2);
    }
}
