//! Function and authorizer registries.
//!
//! # Data Flow
//! ```text
//! Host registers native functions:
//!     registry.insert("handlers", "hello", handler_fn(...))
//!
//! Compile time:
//!     handler reference "handlers.hello"
//!     → HandlerRef::parse (split at the last dot)
//!     → FunctionRegistry::resolve (module → function, two-level lookup)
//!     → unresolved target references are rejected before any route exists
//! ```
//!
//! # Design Decisions
//! - Two explicit levels (module, function) instead of walking an
//!   arbitrary-depth dotted path at request time
//! - Authorizer functions share the target-function signature; the global
//!   authorizer registry is keyed by an ARN-like string
//! - Registries are read-only after compile time and shared via Arc clones

pub mod authorizers;
pub mod functions;

pub use authorizers::AuthorizerRegistry;
pub use functions::{handler_fn, FunctionRegistry, HandlerFn, HandlerFuture, HandlerRef};
