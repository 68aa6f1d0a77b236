//! Per-request invocation objects handed to target functions.

use std::collections::BTreeMap;
use std::collections::HashMap;

use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

/// The event a target function receives, mirroring the emulated platform's
/// HTTP event shape. Path parameters travel under the `path` field.
#[derive(Debug, Clone, Default, Serialize)]
pub struct InvocationEvent {
    pub method: String,
    pub headers: BTreeMap<String, String>,
    pub body: Value,
    #[serde(rename = "path")]
    pub path_parameters: HashMap<String, String>,
    pub query: HashMap<String, String>,
    #[serde(rename = "principalId")]
    pub principal_id: Option<String>,
    /// Present only after the authorizer validation step ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<AuthorizerEvent>,
}

/// The TOKEN-type event handed to an authorizer function.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizerEvent {
    #[serde(rename = "type")]
    pub kind: &'static str,
    #[serde(rename = "authorizationToken")]
    pub authorization_token: String,
    #[serde(rename = "methodArn")]
    pub method_arn: String,
}

impl AuthorizerEvent {
    pub fn token(authorization_token: String, method_arn: String) -> Self {
        Self {
            kind: "TOKEN",
            authorization_token,
            method_arn,
        }
    }
}

/// Execution context passed through to the function unchanged.
///
/// Starts empty apart from a generated request id; the check step fills in
/// the `authorizer` entry after an Allow decision.
#[derive(Debug, Clone, Serialize)]
pub struct InvocationContext {
    #[serde(rename = "requestId")]
    pub request_id: String,
    #[serde(skip_serializing_if = "Map::is_empty")]
    pub authorizer: Map<String, Value>,
}

impl InvocationContext {
    pub fn new() -> Self {
        Self {
            request_id: Uuid::new_v4().to_string(),
            authorizer: Map::new(),
        }
    }
}

impl Default for InvocationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Event + context pair owned by one request's chain.
#[derive(Debug, Clone, Default)]
pub struct Invocation {
    pub event: InvocationEvent,
    pub context: InvocationContext,
}
