//! Terminal chain step: invoke the target function.

use axum::http::StatusCode;

use crate::observability::metrics;
use crate::pipeline::step::{value_response, RequestState, Step, StepOutcome};
use crate::registry::HandlerFn;

/// Adapts the resolved function to an HTTP response. Success is 200 with
/// the returned payload; failure uses the error's declared status or 500
/// with the error as body. Always responds, never proceeds.
pub fn invoke_function(handler: HandlerFn) -> Step {
    Step::new("invoke", move |state: &mut RequestState| {
        let handler = handler.clone();
        Box::pin(async move {
            let invocation = state.invocation.clone();
            let event = serde_json::to_value(&invocation.event).unwrap_or_default();
            let response = match handler(event, invocation.context).await {
                Ok(payload) => {
                    metrics::record_invocation("ok");
                    value_response(StatusCode::OK, &payload)
                }
                Err(err) => {
                    let status = err
                        .status
                        .and_then(|s| StatusCode::from_u16(s).ok())
                        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
                    tracing::error!(path = %state.path, status = %status, error = %err, "function failed");
                    metrics::record_invocation("error");
                    value_response(status, &err.body)
                }
            };
            StepOutcome::Respond(response)
        })
    })
}
