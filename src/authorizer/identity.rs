//! Identity source locators.
//!
//! A trigger's authorizer names where the credential lives. The locator is
//! parsed once at compile time; the only recognized shape today is
//! `method.request.header.<name>`, matching the emulated platform's
//! identity-source syntax.

use axum::http::HeaderMap;

use crate::error::ConfigurationError;

pub const DEFAULT_IDENTITY_SOURCE: &str = "method.request.header.Authorization";

const HEADER_PREFIX: &str = "method.request.header.";

/// A compile-time-resolved credential locator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IdentitySource {
    Header(String),
}

impl IdentitySource {
    pub fn default_source() -> Self {
        // the default locator always parses
        Self::Header("Authorization".to_string())
    }

    /// Parse a locator string, case-insensitively.
    pub fn parse(locator: &str) -> Result<Self, ConfigurationError> {
        let lowered = locator.to_lowercase();
        match lowered.strip_prefix(HEADER_PREFIX) {
            Some(name) if !name.is_empty() => Ok(Self::Header(name.to_string())),
            _ => Err(ConfigurationError::InvalidIdentitySource {
                locator: locator.to_string(),
            }),
        }
    }

    /// Look up the credential value on the current request.
    pub fn lookup(&self, headers: &HeaderMap) -> Option<String> {
        match self {
            // HeaderMap lookups are case-insensitive by construction
            Self::Header(name) => headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(String::from),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::header::HeaderValue;

    #[test]
    fn parses_header_locators_case_insensitively() {
        assert_eq!(
            IdentitySource::parse("method.request.header.Authorization").unwrap(),
            IdentitySource::Header("authorization".to_string())
        );
        assert_eq!(
            IdentitySource::parse("Method.Request.Header.X-Api-Key").unwrap(),
            IdentitySource::Header("x-api-key".to_string())
        );
    }

    #[test]
    fn rejects_unrecognized_locators() {
        assert!(IdentitySource::parse("method.request.querystring.token").is_err());
        assert!(IdentitySource::parse("method.request.header.").is_err());
        assert!(IdentitySource::parse("whatever").is_err());
    }

    #[test]
    fn looks_up_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("authorization", HeaderValue::from_static("Bearer t"));
        let source = IdentitySource::default_source();
        assert_eq!(source.lookup(&headers).as_deref(), Some("Bearer t"));

        let source = IdentitySource::parse("method.request.header.X-Api-Key").unwrap();
        assert_eq!(source.lookup(&headers), None);
    }
}
