//! The two authorizer chain steps: credential validation and the
//! cached policy check.

use std::sync::Arc;
use std::time::Duration;

use axum::http::StatusCode;
use regex::Regex;
use serde_json::Value;

use crate::authorizer::arn::ArnOptions;
use crate::authorizer::cache::{CacheEntry, DecisionCache};
use crate::authorizer::identity::IdentitySource;
use crate::authorizer::policy::AuthorizationDecision;
use crate::observability::metrics;
use crate::pipeline::invocation::AuthorizerEvent;
use crate::pipeline::step::{text_response, value_response, RequestState, Step, StepOutcome};
use crate::registry::HandlerFn;

/// Everything the validation step needs, resolved at compile time.
#[derive(Clone)]
pub struct ValidationSpec {
    pub source: IdentitySource,
    pub pattern: Option<Regex>,
    pub arn: ArnOptions,
    pub api_id: String,
}

/// Validation step. Looks up the credential via the identity source; a
/// missing credential, or one the configured expression does not match,
/// responds 403 and stops the chain. Otherwise the method ARN is
/// synthesized and the TOKEN event attached for the check step.
pub fn validate_identity(spec: ValidationSpec) -> Step {
    Step::new("authorize-validate", move |state: &mut RequestState| {
        let spec = spec.clone();
        Box::pin(async move {
            let Some(token) = spec.source.lookup(&state.headers) else {
                tracing::warn!(path = %state.path, "credential missing, rejecting");
                metrics::record_auth_decision("unvalidated");
                return StepOutcome::Respond(text_response(StatusCode::FORBIDDEN, "Forbidden"));
            };
            if let Some(pattern) = &spec.pattern {
                if !pattern.is_match(&token) {
                    tracing::warn!(path = %state.path, "credential failed validation expression");
                    metrics::record_auth_decision("unvalidated");
                    return StepOutcome::Respond(text_response(StatusCode::FORBIDDEN, "Forbidden"));
                }
            }
            let method = state.method.as_str().to_uppercase();
            let method_arn = spec.arn.method_arn(&spec.api_id, &method, &state.path);
            state.invocation.event.authorizer = Some(AuthorizerEvent::token(token, method_arn));
            StepOutcome::Proceed
        })
    })
}

/// Check step. Serves the decision from cache when possible, otherwise
/// invokes the authorizer function and caches what it returned, then lets
/// the first statement's effect decide: Allow proceeds, anything else is
/// 401, an authorizer failure is 500 with the error detail.
pub fn check_authorizer(
    authorizer: HandlerFn,
    cache: Arc<dyn DecisionCache>,
    ttl: Duration,
) -> Step {
    Step::new("authorize-check", move |state: &mut RequestState| {
        let authorizer = authorizer.clone();
        let cache = cache.clone();
        Box::pin(async move {
            let Some(auth_event) = state.invocation.event.authorizer.clone() else {
                tracing::error!(path = %state.path, "check step ran without a validated credential");
                return StepOutcome::Respond(text_response(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "authorizer event missing",
                ));
            };

            let key = format!(
                "{}@{}",
                auth_event.authorization_token, auth_event.method_arn
            );
            if let Some(cached) = cache.get(&key).await {
                tracing::debug!(path = %state.path, "authorizer cache hit");
                metrics::record_authorizer_cache(true);
                return evaluate(cached, state);
            }
            metrics::record_authorizer_cache(false);

            let event = serde_json::to_value(&auth_event).unwrap_or_default();
            let context = state.invocation.context.clone();
            match authorizer(event, context).await {
                Ok(document) => {
                    let decision = AuthorizationDecision::from_value(document);
                    cache
                        .put(CacheEntry {
                            key,
                            value: decision.clone(),
                            ttl,
                        })
                        .await;
                    evaluate(decision, state)
                }
                Err(err) => {
                    tracing::error!(path = %state.path, error = %err, "authorizer failed");
                    metrics::record_auth_decision("error");
                    StepOutcome::Respond(value_response(
                        StatusCode::INTERNAL_SERVER_ERROR,
                        &err.body,
                    ))
                }
            }
        })
    })
}

fn evaluate(decision: AuthorizationDecision, state: &mut RequestState) -> StepOutcome {
    if !decision.is_allowed() {
        tracing::warn!(path = %state.path, "authorization denied");
        metrics::record_auth_decision("deny");
        return StepOutcome::Respond(text_response(StatusCode::UNAUTHORIZED, "Unauthorized"));
    }
    metrics::record_auth_decision("allow");
    let authorizer = &mut state.invocation.context.authorizer;
    if let Some(principal) = &decision.principal_id {
        authorizer.insert("principalId".to_string(), Value::String(principal.clone()));
    }
    for (k, v) in &decision.context {
        authorizer.insert(k.clone(), v.clone());
    }
    StepOutcome::Proceed
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderValue;
    use axum::http::Method;
    use serde_json::json;
    use std::sync::atomic::{AtomicU32, Ordering};

    use crate::authorizer::cache::{MemoryDecisionCache, NoopCache};
    use crate::registry::handler_fn;

    fn spec(pattern: Option<&str>) -> ValidationSpec {
        ValidationSpec {
            source: IdentitySource::default_source(),
            pattern: pattern.map(|p| Regex::new(p).unwrap()),
            arn: ArnOptions::default(),
            api_id: "app".to_string(),
        }
    }

    fn authed_state() -> RequestState {
        let mut state = RequestState::new(Method::GET, "/test");
        state
            .headers
            .insert("authorization", HeaderValue::from_static("Bearer test"));
        state
    }

    async fn response_status(outcome: StepOutcome) -> Option<StatusCode> {
        match outcome {
            StepOutcome::Proceed => None,
            StepOutcome::Respond(r) => Some(r.status()),
        }
    }

    #[tokio::test]
    async fn missing_credential_is_403() {
        let mut state = RequestState::new(Method::GET, "/test");
        let outcome = validate_identity(spec(None)).run(&mut state).await;
        assert_eq!(response_status(outcome).await, Some(StatusCode::FORBIDDEN));
        assert!(state.invocation.event.authorizer.is_none());
    }

    #[tokio::test]
    async fn non_matching_credential_is_403() {
        let mut state = authed_state();
        state
            .headers
            .insert("authorization", HeaderValue::from_static("invalid"));
        let outcome = validate_identity(spec(Some("Bearer .*"))).run(&mut state).await;
        assert_eq!(response_status(outcome).await, Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn matching_credential_attaches_the_token_event() {
        let mut state = authed_state();
        let outcome = validate_identity(spec(Some("Bearer .*"))).run(&mut state).await;
        assert!(response_status(outcome).await.is_none());

        let event = state.invocation.event.authorizer.unwrap();
        assert_eq!(event.kind, "TOKEN");
        assert_eq!(event.authorization_token, "Bearer test");
        assert_eq!(
            event.method_arn,
            "arn:slsgate:execute-api:us-east-1:000001:app/GET/test"
        );
    }

    #[tokio::test]
    async fn allow_proceeds_and_populates_context() {
        let mut state = authed_state();
        validate_identity(spec(None)).run(&mut state).await;

        let authorizer = handler_fn(|event, _ctx| async move {
            assert_eq!(event["type"], "TOKEN");
            Ok(serde_json::to_value(AuthorizationDecision::allow("u-1", "arn:x")).unwrap())
        });
        let step = check_authorizer(authorizer, Arc::new(NoopCache), Duration::from_secs(300));
        let outcome = step.run(&mut state).await;
        assert!(response_status(outcome).await.is_none());
        assert_eq!(
            state.invocation.context.authorizer.get("principalId"),
            Some(&json!("u-1"))
        );
    }

    #[tokio::test]
    async fn deny_and_malformed_are_401() {
        for document in [
            serde_json::to_value(AuthorizationDecision::deny("u", "arn:x")).unwrap(),
            json!("nope"),
            json!({}),
        ] {
            let mut state = authed_state();
            validate_identity(spec(None)).run(&mut state).await;

            let doc = document.clone();
            let authorizer = handler_fn(move |_e, _c| {
                let doc = doc.clone();
                async move { Ok(doc) }
            });
            let step = check_authorizer(authorizer, Arc::new(NoopCache), Duration::from_secs(300));
            let outcome = step.run(&mut state).await;
            assert_eq!(response_status(outcome).await, Some(StatusCode::UNAUTHORIZED));
        }
    }

    #[tokio::test]
    async fn authorizer_failure_is_500_with_detail() {
        let mut state = authed_state();
        validate_identity(spec(None)).run(&mut state).await;

        let authorizer = handler_fn(|_e, _c| async {
            Err(crate::error::InvocationError::new("token service down"))
        });
        let step = check_authorizer(authorizer, Arc::new(NoopCache), Duration::from_secs(300));
        match step.run(&mut state).await {
            StepOutcome::Respond(r) => assert_eq!(r.status(), StatusCode::INTERNAL_SERVER_ERROR),
            StepOutcome::Proceed => panic!("expected a response"),
        }
    }

    #[tokio::test]
    async fn cache_hit_skips_the_authorizer() {
        let calls = Arc::new(AtomicU32::new(0));
        let seen = calls.clone();
        let authorizer = handler_fn(move |_e, _c| {
            seen.fetch_add(1, Ordering::SeqCst);
            async { Ok(serde_json::to_value(AuthorizationDecision::allow("u", "r")).unwrap()) }
        });
        let cache = Arc::new(MemoryDecisionCache::new());

        for _ in 0..2 {
            let mut state = authed_state();
            validate_identity(spec(None)).run(&mut state).await;
            let step = check_authorizer(
                authorizer.clone(),
                cache.clone(),
                Duration::from_secs(300),
            );
            let outcome = step.run(&mut state).await;
            assert!(response_status(outcome).await.is_none());
        }
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
