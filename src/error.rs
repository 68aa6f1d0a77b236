//! Gateway error taxonomy.
//!
//! # Design Decisions
//! - Configuration problems are fatal and surface at compile time, never
//!   while a request is in flight
//! - Request-time failures terminate exactly one chain and map to a fixed
//!   status code (403 validation, 401 denial, 500 authorizer, handler-declared
//!   or 500 invocation)

use serde_json::Value;
use thiserror::Error;

/// Fatal errors raised while compiling declared triggers into pipelines.
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// Handler reference did not contain a `module.function` split point.
    #[error("handler reference `{reference}` on function `{function}` is malformed, expected `module.function`")]
    MalformedHandlerRef { function: String, reference: String },

    /// Handler reference named a module/function pair that is not registered.
    #[error("handler `{reference}` on function `{function}` is not registered")]
    UnresolvedHandler { function: String, reference: String },

    /// Trigger declared a method the HTTP layer cannot represent.
    #[error("unsupported HTTP method `{method}` on function `{function}`")]
    InvalidMethod { function: String, method: String },

    /// Identity source locator was not of a recognized shape.
    #[error("identity source `{locator}` is not recognized, expected `method.request.header.<name>`")]
    InvalidIdentitySource { locator: String },

    /// Identity validation expression failed to compile.
    #[error("identity validation expression `{expression}` is invalid: {message}")]
    InvalidValidationExpression { expression: String, message: String },

    /// A resolved CORS policy produced a value that cannot be carried in a header.
    #[error("CORS policy value `{value}` is not a valid header value")]
    InvalidCorsValue { value: String },
}

/// Failure reported by a target function or an authorizer function.
///
/// Carries an optional status code; the invoker responds with it when
/// present and falls back to 500. Authorizer failures always map to 500
/// regardless of the declared status.
#[derive(Debug, Clone, Error)]
#[error("{body}")]
pub struct InvocationError {
    pub status: Option<u16>,
    pub body: Value,
}

impl InvocationError {
    /// Failure with no declared status; the invoker responds 500.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            status: None,
            body: Value::String(message.into()),
        }
    }

    /// Failure with a declared response status.
    pub fn with_status(status: u16, body: Value) -> Self {
        Self {
            status: Some(status),
            body,
        }
    }
}
