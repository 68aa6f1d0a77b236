//! Authorization policy documents and their evaluation.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The document an authorizer function returns. Shape mirrors the emulated
/// platform: a principal plus a policy document whose first statement's
/// `Effect` decides the request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuthorizationDecision {
    #[serde(rename = "principalId", default, skip_serializing_if = "Option::is_none")]
    pub principal_id: Option<String>,
    #[serde(rename = "policyDocument", default)]
    pub policy_document: PolicyDocument,
    /// Free-form key/value pairs surfaced to the target function's context.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub context: Map<String, Value>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PolicyDocument {
    #[serde(rename = "Version", default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(rename = "Statement", default)]
    pub statement: Vec<PolicyStatement>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PolicyStatement {
    #[serde(rename = "Action", default, skip_serializing_if = "Option::is_none")]
    pub action: Option<String>,
    #[serde(rename = "Effect", default)]
    pub effect: Effect,
    #[serde(rename = "Resource", default, skip_serializing_if = "Option::is_none")]
    pub resource: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Effect {
    Allow,
    Deny,
    /// Anything that is not literally `Allow` or `Deny`.
    #[default]
    Unspecified,
}

impl<'de> Deserialize<'de> for Effect {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = String::deserialize(deserializer)?;
        Ok(match value.as_str() {
            "Allow" => Effect::Allow,
            "Deny" => Effect::Deny,
            _ => Effect::Unspecified,
        })
    }
}

impl AuthorizationDecision {
    /// Parse a raw decision document. A document that does not fit the
    /// expected shape evaluates as a denial rather than an error.
    pub fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }

    /// The authoritative effect: the first statement's, everything past it
    /// is ignored.
    pub fn effect(&self) -> Effect {
        self.policy_document
            .statement
            .first()
            .map(|s| s.effect)
            .unwrap_or(Effect::Unspecified)
    }

    pub fn is_allowed(&self) -> bool {
        self.effect() == Effect::Allow
    }

    /// Convenience constructor for hosts writing authorizers.
    pub fn allow(principal_id: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::with_effect(Effect::Allow, principal_id, resource)
    }

    pub fn deny(principal_id: impl Into<String>, resource: impl Into<String>) -> Self {
        Self::with_effect(Effect::Deny, principal_id, resource)
    }

    fn with_effect(
        effect: Effect,
        principal_id: impl Into<String>,
        resource: impl Into<String>,
    ) -> Self {
        Self {
            principal_id: Some(principal_id.into()),
            policy_document: PolicyDocument {
                version: Some("2012-10-17".to_string()),
                statement: vec![PolicyStatement {
                    action: Some("execute-api:Invoke".to_string()),
                    effect,
                    resource: Some(resource.into()),
                }],
            },
            context: Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn first_statement_effect_is_authoritative() {
        let decision = AuthorizationDecision::from_value(json!({
            "policyDocument": {
                "Statement": [
                    {"Effect": "Deny"},
                    {"Effect": "Allow"},
                ],
            },
        }));
        assert_eq!(decision.effect(), Effect::Deny);
        assert!(!decision.is_allowed());
    }

    #[test]
    fn allow_round_trips_through_json() {
        let decision = AuthorizationDecision::allow("user-1", "arn:x");
        let value = serde_json::to_value(&decision).unwrap();
        let parsed = AuthorizationDecision::from_value(value);
        assert!(parsed.is_allowed());
        assert_eq!(parsed.principal_id.as_deref(), Some("user-1"));
    }

    #[test]
    fn malformed_documents_deny() {
        assert_eq!(
            AuthorizationDecision::from_value(json!("nope")).effect(),
            Effect::Unspecified
        );
        assert_eq!(
            AuthorizationDecision::from_value(json!({})).effect(),
            Effect::Unspecified
        );
        assert_eq!(
            AuthorizationDecision::from_value(json!({
                "policyDocument": {"Statement": [{"Effect": "Maybe"}]},
            }))
            .effect(),
            Effect::Unspecified
        );
        assert_eq!(
            AuthorizationDecision::from_value(json!({
                "policyDocument": {"Statement": []},
            }))
            .effect(),
            Effect::Unspecified
        );
    }
}
