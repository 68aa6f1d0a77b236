//! Shared utilities for integration testing.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::http::header::HeaderValue;
use axum::http::Method;
use serde_json::{json, Value};

use slsgate::authorizer::policy::AuthorizationDecision;
use slsgate::error::InvocationError;
use slsgate::pipeline::step::{Chain, RequestState};
use slsgate::registry::{handler_fn, HandlerFn};
use slsgate::routing::router::EventRouter;
use slsgate::ServiceConfig;

/// Router collaborator that records registrations instead of serving them.
#[derive(Default)]
pub struct RecordingRouter {
    pub routes: Vec<(String, String, Chain)>,
}

impl RecordingRouter {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn find(&self, method: &str, path: &str) -> &Chain {
        self.routes
            .iter()
            .find(|(m, p, _)| m == method && p == path)
            .map(|(_, _, chain)| chain)
            .unwrap_or_else(|| panic!("no route registered for {method} {path}"))
    }
}

impl EventRouter for RecordingRouter {
    fn register(&mut self, method: &str, path: &str, chain: Chain) {
        self.routes.push((method.to_string(), path.to_string(), chain));
    }
}

/// Greeting handler echoing its path parameter.
#[allow(dead_code)]
pub fn hello_handler() -> HandlerFn {
    handler_fn(|event: Value, _ctx| async move {
        let name = event["path"]["name"].as_str().unwrap_or("world").to_string();
        Ok(json!({ "greeting": name }))
    })
}

/// Handler failing with a declared status.
#[allow(dead_code)]
pub fn not_found_handler() -> HandlerFn {
    handler_fn(|_event, _ctx| async {
        Err(InvocationError::with_status(
            404,
            Value::String("no such thing".into()),
        ))
    })
}

/// Token authorizer: `Bearer deny` denies, `Bearer boom` fails, anything
/// else allows. Counts invocations so tests can observe cache hits.
#[allow(dead_code)]
pub fn counting_authorizer(calls: Arc<AtomicU32>) -> HandlerFn {
    handler_fn(move |event: Value, _ctx| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            let token = event["authorizationToken"].as_str().unwrap_or_default();
            let arn = event["methodArn"].as_str().unwrap_or_default().to_string();
            match token {
                "Bearer boom" => Err(InvocationError::new("authorizer exploded")),
                "Bearer deny" => {
                    Ok(serde_json::to_value(AuthorizationDecision::deny("u", arn.as_str())).unwrap())
                }
                _ => Ok(serde_json::to_value(AuthorizationDecision::allow("u", arn.as_str())).unwrap()),
            }
        }
    })
}

/// Chain state for a request with an optional Authorization header.
#[allow(dead_code)]
pub fn request_state(method: Method, path: &str, token: Option<&str>) -> RequestState {
    let mut state = RequestState::new(method, path);
    if let Some(token) = token {
        state.headers.insert(
            "authorization",
            HeaderValue::from_str(token).expect("test token must be a header value"),
        );
    }
    state
}

/// Parse a service declaration from inline TOML.
#[allow(dead_code)]
pub fn service(toml_src: &str) -> ServiceConfig {
    toml::from_str(toml_src).expect("test service declaration must parse")
}
