//! Configuration schema definitions.
//!
//! Two surfaces live here: the gateway's own settings (`GatewayConfig`) and
//! the declarative description of services, functions, and triggers
//! (`ServiceConfig`) that the pipeline compiler consumes. All types derive
//! Serde traits for deserialization from config files.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::authorizer::arn::ArnOptions;
use crate::pipeline::cors::CorsSetting;

/// Root configuration for the gateway process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address, body cap).
    pub listener: ListenerConfig,

    /// Namespace fields used when synthesizing method ARNs.
    pub arn: ArnOptions,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "127.0.0.1:3000").
    pub bind_address: String,

    /// Maximum request body size in bytes.
    pub max_body_bytes: usize,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "127.0.0.1:3000".to_string(),
            max_body_bytes: 1024 * 1024,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds. Bounds
    /// a chain stalled on a function that never completes.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable the metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// One declared service: a name plus its functions.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Service name; combines with each function id into the api identifier
    /// used for ARN synthesis.
    pub service: String,

    /// Declared functions, keyed by function identifier.
    #[serde(default)]
    pub functions: BTreeMap<String, FunctionConfig>,
}

/// One declared function.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FunctionConfig {
    /// Target reference, `module.function`.
    pub handler: String,

    /// Trigger declarations. Only HTTP triggers are compiled; other kinds
    /// are ignored.
    #[serde(default)]
    pub events: Vec<EventConfig>,
}

impl FunctionConfig {
    /// The HTTP triggers declared on this function.
    pub fn http_triggers(&self) -> impl Iterator<Item = &HttpTriggerConfig> {
        self.events.iter().filter_map(|e| e.http.as_ref())
    }
}

/// One trigger declaration. Non-HTTP kinds deserialize with `http` unset.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct EventConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub http: Option<HttpTriggerConfig>,
}

/// An HTTP trigger.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpTriggerConfig {
    pub method: String,

    /// Gateway-style path template, brace-delimited parameters.
    pub path: String,

    /// Boolean or structured CORS policy.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cors: Option<CorsSetting>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authorizer: Option<AuthorizerConfig>,
}

/// Declarative authorizer reference on a trigger.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizerConfig {
    /// Local function reference, resolved first within the declaring
    /// handler's module, then against the full registry.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Global identifier resolved against the authorizer registry. Takes
    /// precedence over `name`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arn: Option<String>,

    /// Credential locator; defaults to the Authorization header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_source: Option<String>,

    /// Optional regular expression the credential must match.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_validation_expression: Option<String>,

    /// Decision cache TTL in seconds, default 300.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_ttl_in_seconds: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_a_service_declaration() {
        let config: ServiceConfig = toml::from_str(
            r#"
            service = "orders"

            [functions.get-order]
            handler = "orders.get"

            [[functions.get-order.events]]
            [functions.get-order.events.http]
            method = "GET"
            path = "orders/{id}"
            cors = true

            [functions.get-order.events.http.authorizer]
            name = "token-check"
            identitySource = "method.request.header.Authorization"
            resultTtlInSeconds = 60
            "#,
        )
        .unwrap();

        assert_eq!(config.service, "orders");
        let func = &config.functions["get-order"];
        assert_eq!(func.handler, "orders.get");
        let trigger = func.http_triggers().next().unwrap();
        assert_eq!(trigger.method, "GET");
        assert_eq!(trigger.path, "orders/{id}");
        let authorizer = trigger.authorizer.as_ref().unwrap();
        assert_eq!(authorizer.name.as_deref(), Some("token-check"));
        assert_eq!(authorizer.result_ttl_in_seconds, Some(60));
    }

    #[test]
    fn non_http_events_are_ignored() {
        let config: ServiceConfig = toml::from_str(
            r#"
            service = "batch"

            [functions.tick]
            handler = "batch.tick"

            [[functions.tick.events]]
            schedule = "rate(5 minutes)"
            "#,
        )
        .unwrap();
        let func = &config.functions["tick"];
        assert_eq!(func.http_triggers().count(), 0);
    }

    #[test]
    fn gateway_defaults_cover_a_minimal_config() {
        let config: GatewayConfig = toml::from_str("").unwrap();
        assert_eq!(config.listener.bind_address, "127.0.0.1:3000");
        assert_eq!(config.timeouts.request_secs, 30);
        assert_eq!(config.arn.namespace, "slsgate");
    }
}
