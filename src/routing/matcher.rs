//! Route pattern matching.
//!
//! # Responsibilities
//! - Compile `:name` patterns into literal/parameter segments
//! - Match request paths segment by segment (case-sensitive)
//! - Extract named path parameters on match
//!
//! # Design Decisions
//! - Exact segment count; a parameter captures a single segment
//! - Trailing slashes are ignored on both sides
//! - No regex to guarantee O(n) matching

use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Param(String),
}

/// A compiled route pattern in the router's `:name` syntax.
#[derive(Debug, Clone)]
pub struct PathPattern {
    raw: String,
    segments: Vec<Segment>,
}

impl PathPattern {
    pub fn compile(pattern: &str) -> Self {
        let segments = pattern
            .split('/')
            .filter(|s| !s.is_empty())
            .map(|s| match s.strip_prefix(':') {
                Some(name) => Segment::Param(name.to_string()),
                None => Segment::Literal(s.to_string()),
            })
            .collect();
        Self {
            raw: pattern.to_string(),
            segments,
        }
    }

    /// The pattern as registered.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Match a request path, returning extracted parameters on success.
    pub fn matches(&self, path: &str) -> Option<HashMap<String, String>> {
        let parts: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if parts.len() != self.segments.len() {
            return None;
        }
        let mut params = HashMap::new();
        for (segment, part) in self.segments.iter().zip(parts) {
            match segment {
                Segment::Literal(lit) => {
                    if lit != part {
                        return None;
                    }
                }
                Segment::Param(name) => {
                    params.insert(name.clone(), part.to_string());
                }
            }
        }
        Some(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matches_literal_paths() {
        let pattern = PathPattern::compile("/users/list");
        assert!(pattern.matches("/users/list").is_some());
        assert!(pattern.matches("/users/list/").is_some());
        assert!(pattern.matches("/users").is_none());
        assert!(pattern.matches("/users/other").is_none());
        // case-sensitive
        assert!(pattern.matches("/Users/list").is_none());
    }

    #[test]
    fn extracts_parameters() {
        let pattern = PathPattern::compile("/users/:id/orders/:order");
        let params = pattern.matches("/users/42/orders/a-1").unwrap();
        assert_eq!(params.get("id").map(String::as_str), Some("42"));
        assert_eq!(params.get("order").map(String::as_str), Some("a-1"));
    }

    #[test]
    fn parameter_spans_one_segment_only() {
        let pattern = PathPattern::compile("/users/:id");
        assert!(pattern.matches("/users/42/extra").is_none());
        assert!(pattern.matches("/users").is_none());
    }

    #[test]
    fn root_pattern() {
        let pattern = PathPattern::compile("/");
        assert!(pattern.matches("/").is_some());
        assert!(pattern.matches("/anything").is_none());
    }
}
