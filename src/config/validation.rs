//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check trigger declarations the compiler would otherwise reject late
//! - Validate value ranges (TTL bounds, expression compiles)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function over the declaration
//! - Runs before a declaration is handed to the compiler

use axum::http::Method;
use thiserror::Error;

use crate::authorizer::identity::IdentitySource;
use crate::config::schema::ServiceConfig;

/// Upper bound mirroring the emulated platform's authorizer cache limit.
const MAX_RESULT_TTL_SECS: u64 = 3600;

#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("service name is empty")]
    EmptyServiceName,

    #[error("function `{function}`: handler `{handler}` is not a `module.function` reference")]
    BadHandlerReference { function: String, handler: String },

    #[error("function `{function}`: trigger method `{method}` is not a valid HTTP method")]
    BadMethod { function: String, method: String },

    #[error("function `{function}`: trigger path is empty")]
    EmptyPath { function: String },

    #[error("function `{function}`: authorizer declares neither `name` nor `arn`")]
    AuthorizerWithoutReference { function: String },

    #[error("function `{function}`: identity source `{locator}` is not recognized")]
    BadIdentitySource { function: String, locator: String },

    #[error("function `{function}`: identity validation expression does not compile: {message}")]
    BadValidationExpression { function: String, message: String },

    #[error("function `{function}`: result TTL {ttl}s exceeds the maximum of {MAX_RESULT_TTL_SECS}s")]
    TtlOutOfRange { function: String, ttl: u64 },
}

/// Validate a service declaration, collecting every problem found.
pub fn validate_service(config: &ServiceConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.service.trim().is_empty() {
        errors.push(ValidationError::EmptyServiceName);
    }

    for (func_id, func) in &config.functions {
        if !func.handler.contains('.') {
            errors.push(ValidationError::BadHandlerReference {
                function: func_id.clone(),
                handler: func.handler.clone(),
            });
        }
        for trigger in func.http_triggers() {
            if Method::from_bytes(trigger.method.to_uppercase().as_bytes()).is_err() {
                errors.push(ValidationError::BadMethod {
                    function: func_id.clone(),
                    method: trigger.method.clone(),
                });
            }
            if trigger.path.trim().is_empty() {
                errors.push(ValidationError::EmptyPath {
                    function: func_id.clone(),
                });
            }
            let Some(authorizer) = &trigger.authorizer else {
                continue;
            };
            if authorizer.name.is_none() && authorizer.arn.is_none() {
                errors.push(ValidationError::AuthorizerWithoutReference {
                    function: func_id.clone(),
                });
            }
            if let Some(source) = &authorizer.identity_source {
                if IdentitySource::parse(source).is_err() {
                    errors.push(ValidationError::BadIdentitySource {
                        function: func_id.clone(),
                        locator: source.clone(),
                    });
                }
            }
            if let Some(expression) = &authorizer.identity_validation_expression {
                if let Err(err) = regex::Regex::new(expression) {
                    errors.push(ValidationError::BadValidationExpression {
                        function: func_id.clone(),
                        message: err.to_string(),
                    });
                }
            }
            if let Some(ttl) = authorizer.result_ttl_in_seconds {
                if ttl > MAX_RESULT_TTL_SECS {
                    errors.push(ValidationError::TtlOutOfRange {
                        function: func_id.clone(),
                        ttl,
                    });
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
