//! CORS policy resolution and decoration.
//!
//! The declarative `cors` field is either a boolean or a structured
//! override. It is resolved exactly once at compile time into a concrete
//! policy; anything else fails deserialization before a route exists.
//! The primary route only carries `Access-Control-Allow-Origin`; the
//! auxiliary OPTIONS route carries the full header set.

use axum::http::header::{
    HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN,
};
use axum::http::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::ConfigurationError;
use crate::pipeline::step::{text_response, RequestState, Step, StepOutcome};

const DEFAULT_ORIGINS: &[&str] = &["*"];
const DEFAULT_METHODS: &[&str] = &["GET", "PUT", "HEAD", "PATCH", "POST", "DELETE", "OPTIONS"];
const DEFAULT_HEADERS: &[&str] = &[
    "Authorization",
    "Content-Type",
    "x-amz-date",
    "x-amz-security-token",
    "x-requested-with",
];

/// Declarative CORS value: `true`/`false` or a structured override.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CorsSetting {
    Flag(bool),
    Custom(CorsOverrides),
}

/// Partial override; unset lists fall back to the defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CorsOverrides {
    #[serde(default)]
    pub origins: Option<Vec<String>>,
    #[serde(default)]
    pub methods: Option<Vec<String>>,
    #[serde(default)]
    pub headers: Option<Vec<String>>,
}

/// A resolved CORS policy with the header values precomputed.
#[derive(Debug, Clone)]
pub struct CorsPolicy {
    pub origins: Vec<String>,
    pub methods: Vec<String>,
    pub headers: Vec<String>,
    origin_value: HeaderValue,
    methods_value: HeaderValue,
    headers_value: HeaderValue,
}

fn join_value(items: &[String]) -> Result<HeaderValue, ConfigurationError> {
    let joined = items.join(",");
    HeaderValue::from_str(&joined).map_err(|_| ConfigurationError::InvalidCorsValue { value: joined })
}

impl CorsPolicy {
    fn build(
        origins: Vec<String>,
        methods: Vec<String>,
        headers: Vec<String>,
    ) -> Result<Self, ConfigurationError> {
        Ok(Self {
            origin_value: join_value(&origins)?,
            methods_value: join_value(&methods)?,
            headers_value: join_value(&headers)?,
            origins,
            methods,
            headers,
        })
    }

    pub fn defaults() -> Self {
        let to_vec = |items: &[&str]| items.iter().map(|s| s.to_string()).collect();
        Self {
            origins: to_vec(DEFAULT_ORIGINS),
            methods: to_vec(DEFAULT_METHODS),
            headers: to_vec(DEFAULT_HEADERS),
            origin_value: HeaderValue::from_static("*"),
            methods_value: HeaderValue::from_static("GET,PUT,HEAD,PATCH,POST,DELETE,OPTIONS"),
            headers_value: HeaderValue::from_static(
                "Authorization,Content-Type,x-amz-date,x-amz-security-token,x-requested-with",
            ),
        }
    }

    /// Resolve the declarative value into a concrete policy, or `None` when
    /// CORS was not requested.
    pub fn resolve(setting: &CorsSetting) -> Result<Option<Self>, ConfigurationError> {
        match setting {
            CorsSetting::Flag(false) => Ok(None),
            CorsSetting::Flag(true) => Ok(Some(Self::defaults())),
            CorsSetting::Custom(overrides) => {
                let defaults = Self::defaults();
                let policy = Self::build(
                    overrides.origins.clone().unwrap_or(defaults.origins),
                    overrides.methods.clone().unwrap_or(defaults.methods),
                    overrides.headers.clone().unwrap_or(defaults.headers),
                )?;
                Ok(Some(policy))
            }
        }
    }
}

/// Primary-route step: injects `Access-Control-Allow-Origin` and proceeds.
pub fn cors_origin(policy: CorsPolicy) -> Step {
    Step::new("cors", move |state: &mut RequestState| {
        let origin = policy.origin_value.clone();
        Box::pin(async move {
            state
                .response_headers
                .insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            StepOutcome::Proceed
        })
    })
}

/// Preflight-route step: injects the full header set and proceeds.
pub fn cors_preflight(policy: CorsPolicy) -> Step {
    Step::new("cors-preflight", move |state: &mut RequestState| {
        let policy = policy.clone();
        Box::pin(async move {
            state
                .response_headers
                .insert(ACCESS_CONTROL_ALLOW_ORIGIN, policy.origin_value.clone());
            state
                .response_headers
                .insert(ACCESS_CONTROL_ALLOW_METHODS, policy.methods_value.clone());
            state
                .response_headers
                .insert(ACCESS_CONTROL_ALLOW_HEADERS, policy.headers_value.clone());
            StepOutcome::Proceed
        })
    })
}

/// Terminal step of the preflight chain.
pub fn respond_ok() -> Step {
    Step::new("ok", |_state| {
        Box::pin(async { StepOutcome::Respond(text_response(StatusCode::OK, "")) })
    })
}
