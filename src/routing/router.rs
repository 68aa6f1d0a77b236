//! Route registration and lookup.
//!
//! # Responsibilities
//! - Accept (method, pattern, chain) registrations from the compiler
//! - Look up the matching chain for an incoming request
//! - Return matched chain + path parameters, or explicit no-match
//!
//! # Design Decisions
//! - First registered match wins, in registration order
//! - Method comparison is case-insensitive (stored lower-cased)
//! - Immutable once the server starts reading it; shared via Arc

use std::collections::HashMap;

use crate::pipeline::step::Chain;
use crate::routing::matcher::PathPattern;

/// Registration contract the pipeline compiler targets.
///
/// The implementation must invoke the registered chain for a matching
/// request and extract path parameters per the `:name` pattern syntax.
pub trait EventRouter {
    fn register(&mut self, method: &str, path: &str, chain: Chain);
}

struct RouteEntry {
    method: String,
    pattern: PathPattern,
    chain: Chain,
}

/// A matched route: the chain to run plus extracted path parameters.
pub struct RouteMatch<'a> {
    pub chain: &'a Chain,
    pub params: HashMap<String, String>,
    pub pattern: &'a str,
}

/// In-crate router collaborator backing [`crate::GatewayServer`].
#[derive(Default)]
pub struct ChainRouter {
    routes: Vec<RouteEntry>,
}

impl ChainRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered routes.
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    /// Find the first route matching the request, extracting parameters.
    pub fn match_request(&self, method: &str, path: &str) -> Option<RouteMatch<'_>> {
        let method = method.to_lowercase();
        self.routes
            .iter()
            .filter(|entry| entry.method == method)
            .find_map(|entry| {
                entry.pattern.matches(path).map(|params| RouteMatch {
                    chain: &entry.chain,
                    params,
                    pattern: entry.pattern.as_str(),
                })
            })
    }
}

impl EventRouter for ChainRouter {
    fn register(&mut self, method: &str, path: &str, chain: Chain) {
        tracing::debug!(
            method = %method,
            path = %path,
            steps = chain.len(),
            "registering route"
        );
        self.routes.push(RouteEntry {
            method: method.to_lowercase(),
            pattern: PathPattern::compile(path),
            chain,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::step::{Step, StepOutcome};

    fn noop_chain() -> Chain {
        Chain::new(vec![Step::new("noop", |_state| {
            Box::pin(async { StepOutcome::Proceed })
        })])
    }

    #[test]
    fn first_match_wins() {
        let mut router = ChainRouter::new();
        router.register("get", "/users/:id", noop_chain());
        router.register("get", "/users/me", noop_chain());

        // literal /users/me also satisfies the earlier parameter route
        let matched = router.match_request("get", "/users/me").unwrap();
        assert_eq!(matched.pattern, "/users/:id");
        assert_eq!(matched.params.get("id").map(String::as_str), Some("me"));
    }

    #[test]
    fn method_is_case_insensitive() {
        let mut router = ChainRouter::new();
        router.register("GET", "/status", noop_chain());
        assert!(router.match_request("get", "/status").is_some());
        assert!(router.match_request("GET", "/status").is_some());
        assert!(router.match_request("post", "/status").is_none());
    }

    #[test]
    fn no_match_is_explicit() {
        let router = ChainRouter::new();
        assert!(router.match_request("get", "/anything").is_none());
    }
}
