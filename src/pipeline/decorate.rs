//! Request decoration: builds the invocation handed to the target function.

use std::sync::Arc;

use crate::pipeline::invocation::{Invocation, InvocationContext, InvocationEvent};
use crate::pipeline::step::{RequestState, Step, StepOutcome};

/// Extracts the caller principal from the raw request, when the host wires
/// one in. Absent extractor means an empty principal.
pub type PrincipalExtractor = Arc<dyn Fn(&RequestState) -> Option<String> + Send + Sync>;

/// First step of every chain. Copies method, headers, body, path and query
/// parameters into a fresh invocation event, resolves the principal, and
/// initializes an empty execution context. Never fails, always proceeds.
pub fn decorate_request(extractor: Option<PrincipalExtractor>) -> Step {
    Step::new("decorate", move |state: &mut RequestState| {
        let extractor = extractor.clone();
        Box::pin(async move {
            let principal_id = extractor.as_ref().and_then(|f| f(state));
            let headers = state
                .headers
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            state.invocation = Invocation {
                event: InvocationEvent {
                    method: state.method.as_str().to_string(),
                    headers,
                    body: state.body.clone(),
                    path_parameters: state.path_params.clone(),
                    query: state.query.clone(),
                    principal_id,
                    authorizer: None,
                },
                context: InvocationContext::new(),
            };
            StepOutcome::Proceed
        })
    })
}
