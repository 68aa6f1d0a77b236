//! Target-function registry and handler references.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::error::InvocationError;
use crate::pipeline::invocation::InvocationContext;

/// Future returned by a registered function.
pub type HandlerFuture = BoxFuture<'static, Result<Value, InvocationError>>;

/// A registered function: takes the invocation event as JSON plus the
/// execution context, resolves to a JSON payload or a failure.
///
/// Target functions and authorizer functions share this signature.
pub type HandlerFn = Arc<dyn Fn(Value, InvocationContext) -> HandlerFuture + Send + Sync>;

/// Box an async closure into a [`HandlerFn`].
pub fn handler_fn<F, Fut>(f: F) -> HandlerFn
where
    F: Fn(Value, InvocationContext) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Value, InvocationError>> + Send + 'static,
{
    Arc::new(move |event, context| Box::pin(f(event, context)))
}

/// A parsed `module.function` handler reference.
///
/// The split point is the last dot, so module identifiers may themselves
/// contain dots (`api/users.get` style layouts).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerRef {
    pub module: String,
    pub function: String,
}

impl HandlerRef {
    pub fn parse(reference: &str) -> Option<Self> {
        let (module, function) = reference.rsplit_once('.')?;
        if module.is_empty() || function.is_empty() {
            return None;
        }
        Some(Self {
            module: module.to_string(),
            function: function.to_string(),
        })
    }
}

/// Two-level mapping of module identifier → function identifier → function.
#[derive(Default, Clone)]
pub struct FunctionRegistry {
    modules: HashMap<String, HashMap<String, HandlerFn>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a function under `module`/`name`. Replaces any previous entry.
    pub fn insert(&mut self, module: impl Into<String>, name: impl Into<String>, f: HandlerFn) {
        self.modules
            .entry(module.into())
            .or_default()
            .insert(name.into(), f);
    }

    /// Look up a function by its two-level key.
    pub fn lookup(&self, module: &str, name: &str) -> Option<HandlerFn> {
        self.modules.get(module)?.get(name).cloned()
    }

    /// Resolve a parsed handler reference.
    pub fn resolve(&self, reference: &HandlerRef) -> Option<HandlerFn> {
        self.lookup(&reference.module, &reference.function)
    }
}
