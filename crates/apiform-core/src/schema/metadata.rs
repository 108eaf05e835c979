//! Base fields shared by every schema kind

use indexmap::IndexMap;
use serde_json::Value;

use crate::document::ExternalDocs;
use crate::existence::Existence;
use crate::validation::Rule;

/// The common attribute block owned by each schema node
///
/// `validations` is keyed by schema keyword so a later registration for the
/// same keyword replaces the earlier one. `extensions` holds vendor extension
/// pairs, rendered as `x-` keys in OpenAPI output only.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub existence: Existence,
    pub default: Option<Value>,
    pub deprecated: bool,
    pub title: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<Value>,
    pub external_docs: Option<ExternalDocs>,
    pub validations: IndexMap<&'static str, Rule>,
    pub extensions: IndexMap<String, Value>,
}

impl Metadata {
    /// Register a validation rule under its keyword
    pub fn add_validation(&mut self, rule: Rule) {
        self.validations.insert(rule.keyword(), rule);
    }

    /// Record a vendor extension, rendered as `x-<key>` in OpenAPI output
    pub fn add_extension(&mut self, key: impl Into<String>, value: Value) {
        self.extensions.insert(key.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_keyed_by_keyword() {
        let mut meta = Metadata::default();
        meta.add_validation(Rule::MaxLength(5));
        meta.add_validation(Rule::MaxLength(3));
        assert_eq!(meta.validations.len(), 1);
        match meta.validations.get("maxLength") {
            Some(Rule::MaxLength(3)) => {}
            other => panic!("unexpected rule: {other:?}"),
        }
    }
}
