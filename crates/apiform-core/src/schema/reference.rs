//! Named references to reusable components and the existence-overriding
//! delegator
//!
//! A [`Reference`] stores a lookup name rather than a live pointer; resolution
//! is an explicit registry lookup, which keeps cycles detectable through
//! visited-name tracking. Resolving through a reference can only *tighten*
//! existence: the effective level is the maximum of the reference's own level
//! and the target's.

use std::sync::Arc;

use crate::definitions::Definitions;
use crate::existence::Existence;
use crate::{Result, Schema};

/// A named pointer to a reusable schema
///
/// Parameters, request bodies, and responses have their own inline-or-ref
/// enums in the document model; schema references are the only ones that
/// participate in existence tightening.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reference {
    pub name: String,
    /// Overrides the target's existence when stricter than it
    pub existence: Option<Existence>,
}

impl Reference {
    pub fn schema(name: impl Into<String>) -> Self {
        Reference {
            name: name.into(),
            existence: None,
        }
    }

    pub fn with_existence(mut self, existence: Existence) -> Self {
        self.existence = Some(existence);
        self
    }

    /// Look the target schema up and wrap it with this reference's existence
    ///
    /// Fails with [`crate::Error::Reference`] when the name resolves nowhere
    /// in the definitions chain.
    pub fn resolve(&self, definitions: &Definitions) -> Result<Delegator> {
        let target = definitions.find_schema(&self.name)?;
        Ok(Delegator::new(target, self.existence))
    }
}

/// A transparent wrapper forwarding to a resolved schema, overriding only
/// its existence
///
/// The override is tighten-only: `max(reference existence, target existence)`.
#[derive(Debug, Clone)]
pub struct Delegator {
    schema: Arc<Schema>,
    existence: Existence,
}

impl Delegator {
    pub fn new(schema: Arc<Schema>, override_existence: Option<Existence>) -> Self {
        let own = schema.existence();
        let existence = match override_existence {
            Some(overriding) => own.max(overriding),
            None => own,
        };
        Delegator { schema, existence }
    }

    /// The resolved schema behind this wrapper
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn schema_arc(&self) -> Arc<Schema> {
        self.schema.clone()
    }

    /// The effective existence after tightening
    pub fn existence(&self) -> Existence {
        self.existence
    }

    pub fn nullable(&self) -> bool {
        self.existence.nullable()
    }
}
