//! Chain steps and the driver loop.
//!
//! # Responsibilities
//! - Define the tagged step outcome (proceed vs respond)
//! - Carry per-request state between steps
//! - Drive a chain to its first response
//!
//! # Design Decisions
//! - One owned state value per request; no shared mutable state between
//!   concurrent chains
//! - Steps run strictly in registration order; a response short-circuits
//!   everything after it
//! - Response headers accumulated by earlier steps are merged onto whichever
//!   response terminates the chain

use std::collections::HashMap;

use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use futures_util::future::BoxFuture;
use serde_json::Value;

use crate::pipeline::invocation::Invocation;

/// What a step decided: continue the chain or terminate it with a response.
pub enum StepOutcome {
    Proceed,
    Respond(Response),
}

/// Mutable per-request state threaded through one chain execution.
pub struct RequestState {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Value,
    pub path_params: HashMap<String, String>,
    pub query: HashMap<String, String>,
    /// Headers accumulated by decorating steps, merged onto the final response.
    pub response_headers: HeaderMap,
    pub invocation: Invocation,
}

impl RequestState {
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Value::Null,
            path_params: HashMap::new(),
            query: HashMap::new(),
            response_headers: HeaderMap::new(),
            invocation: Invocation::default(),
        }
    }
}

type StepFn = Box<dyn for<'a> Fn(&'a mut RequestState) -> BoxFuture<'a, StepOutcome> + Send + Sync>;

/// One named unit of request processing.
pub struct Step {
    name: &'static str,
    run: StepFn,
}

impl Step {
    pub fn new<F>(name: &'static str, run: F) -> Self
    where
        F: for<'a> Fn(&'a mut RequestState) -> BoxFuture<'a, StepOutcome> + Send + Sync + 'static,
    {
        Self {
            name,
            run: Box::new(run),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub async fn run(&self, state: &mut RequestState) -> StepOutcome {
        (self.run)(state).await
    }
}

/// The ordered steps registered for one route.
pub struct Chain {
    steps: Vec<Step>,
}

impl Chain {
    pub fn new(steps: Vec<Step>) -> Self {
        Self { steps }
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Step names in execution order, for introspection and logging.
    pub fn step_names(&self) -> Vec<&'static str> {
        self.steps.iter().map(Step::name).collect()
    }

    /// Run steps in order until one responds, then merge accumulated headers.
    ///
    /// Compiled chains always end in a responding step; an exhausted chain is
    /// a construction bug and maps to 500.
    pub async fn run(&self, state: &mut RequestState) -> Response {
        for step in &self.steps {
            tracing::debug!(step = step.name(), path = %state.path, "running chain step");
            match step.run(state).await {
                StepOutcome::Proceed => continue,
                StepOutcome::Respond(mut response) => {
                    for (name, value) in state.response_headers.iter() {
                        response.headers_mut().insert(name.clone(), value.clone());
                    }
                    return response;
                }
            }
        }
        tracing::error!(path = %state.path, "chain ended without a response");
        text_response(StatusCode::INTERNAL_SERVER_ERROR, "chain ended without a response")
    }
}

/// Plain-text response helper.
pub fn text_response(status: StatusCode, body: impl Into<String>) -> Response {
    (status, body.into()).into_response()
}

/// JSON response helper; string payloads are sent as plain text the way the
/// emulated platform returns raw bodies.
pub fn value_response(status: StatusCode, value: &Value) -> Response {
    match value {
        Value::String(s) => (status, s.clone()).into_response(),
        other => (status, axum::Json(other.clone())).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderValue;

    fn proceed_step() -> Step {
        Step::new("proceed", |_state| Box::pin(async { StepOutcome::Proceed }))
    }

    fn respond_step(status: StatusCode) -> Step {
        Step::new("respond", move |_state| {
            Box::pin(async move { StepOutcome::Respond(text_response(status, "done")) })
        })
    }

    #[tokio::test]
    async fn first_response_short_circuits() {
        let hit_after = std::sync::Arc::new(std::sync::atomic::AtomicBool::new(false));
        let hit = hit_after.clone();
        let after = Step::new("after", move |_state| {
            let hit = hit.clone();
            Box::pin(async move {
                hit.store(true, std::sync::atomic::Ordering::SeqCst);
                StepOutcome::Proceed
            })
        });

        let chain = Chain::new(vec![proceed_step(), respond_step(StatusCode::FORBIDDEN), after]);
        let mut state = RequestState::new(Method::GET, "/x");
        let response = chain.run(&mut state).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert!(!hit_after.load(std::sync::atomic::Ordering::SeqCst));
    }

    #[tokio::test]
    async fn accumulated_headers_reach_the_response() {
        let tag = Step::new("tag", |state: &mut RequestState| {
            Box::pin(async move {
                state
                    .response_headers
                    .insert("x-tagged", HeaderValue::from_static("yes"));
                StepOutcome::Proceed
            })
        });
        let chain = Chain::new(vec![tag, respond_step(StatusCode::OK)]);
        let mut state = RequestState::new(Method::GET, "/x");
        let response = chain.run(&mut state).await;
        assert_eq!(response.headers().get("x-tagged").unwrap(), "yes");
    }

    #[tokio::test]
    async fn exhausted_chain_is_a_server_error() {
        let chain = Chain::new(vec![proceed_step()]);
        let mut state = RequestState::new(Method::GET, "/x");
        let response = chain.run(&mut state).await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
