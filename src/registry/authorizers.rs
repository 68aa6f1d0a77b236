//! Global authorizer registry, keyed by ARN-like identifiers.

use std::collections::HashMap;

use super::functions::HandlerFn;

/// Pre-existing authorizer functions the host makes available by global
/// identifier, for triggers that reference an authorizer by `arn` instead
/// of by local name.
#[derive(Default, Clone)]
pub struct AuthorizerRegistry {
    entries: HashMap<String, HandlerFn>,
}

impl AuthorizerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, arn: impl Into<String>, f: HandlerFn) {
        self.entries.insert(arn.into(), f);
    }

    pub fn get(&self, arn: &str) -> Option<HandlerFn> {
        self.entries.get(arn).cloned()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
