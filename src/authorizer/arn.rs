//! Method ARN synthesis.

use serde::{Deserialize, Serialize};

/// Namespace fields for synthesized resource identifiers.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArnOptions {
    pub namespace: String,
    pub region_id: String,
    pub account_id: String,
}

impl Default for ArnOptions {
    fn default() -> Self {
        Self {
            namespace: "slsgate".to_string(),
            region_id: "us-east-1".to_string(),
            account_id: "000001".to_string(),
        }
    }
}

impl ArnOptions {
    /// Synthesize the deterministic resource identifier for one request:
    /// `arn:<namespace>:execute-api:<region>:<account>:<api-id>/<METHOD><path>`.
    ///
    /// `path` is the normalized request path and carries its leading slash.
    pub fn method_arn(&self, api_id: &str, method: &str, path: &str) -> String {
        format!(
            "arn:{}:execute-api:{}:{}:{}/{}{}",
            self.namespace, self.region_id, self.account_id, api_id, method, path
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn synthesizes_the_documented_shape() {
        let arn = ArnOptions::default().method_arn("app", "GET", "/test");
        assert_eq!(arn, "arn:slsgate:execute-api:us-east-1:000001:app/GET/test");
    }

    #[test]
    fn is_deterministic_for_fixed_inputs() {
        let opts = ArnOptions {
            namespace: "ns".into(),
            region_id: "r".into(),
            account_id: "a".into(),
        };
        assert_eq!(
            opts.method_arn("svc-fn", "PUT", "/users/7"),
            opts.method_arn("svc-fn", "PUT", "/users/7")
        );
        assert_eq!(
            opts.method_arn("svc-fn", "PUT", "/users/7"),
            "arn:ns:execute-api:r:a:svc-fn/PUT/users/7"
        );
    }
}
