//! Trigger-to-pipeline compilation.
//!
//! # Responsibilities
//! - Resolve each declared function against the host's registry
//! - Apply the host's wrapper once per function
//! - Resolve authorizer references (arn → same-module name → full registry)
//! - Assemble and register one chain per HTTP trigger, plus the auxiliary
//!   preflight route for CORS triggers
//! - Own the resolved-function table exposed for host introspection
//!
//! # Design Decisions
//! - Everything that can be rejected is rejected here, before a single
//!   request flows: unresolved targets, bad methods, bad identity sources,
//!   bad validation expressions, bad CORS values
//! - An authorizer reference resolving to nothing compiles a chain with no
//!   authorization step; this matches the emulated platform's observed
//!   behavior and is logged loudly as a likely misconfiguration

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use axum::http::Method;
use regex::Regex;

use crate::authorizer::arn::ArnOptions;
use crate::authorizer::cache::{DecisionCache, NoopCache};
use crate::authorizer::identity::IdentitySource;
use crate::authorizer::simulate::{check_authorizer, validate_identity, ValidationSpec};
use crate::config::schema::{AuthorizerConfig, HttpTriggerConfig, ServiceConfig};
use crate::error::ConfigurationError;
use crate::pipeline::cors::{cors_origin, cors_preflight, respond_ok, CorsPolicy};
use crate::pipeline::decorate::{decorate_request, PrincipalExtractor};
use crate::pipeline::invoke::invoke_function;
use crate::pipeline::step::{Chain, Step};
use crate::registry::{AuthorizerRegistry, FunctionRegistry, HandlerFn, HandlerRef};
use crate::routing::router::EventRouter;
use crate::routing::translate::translate_path;

/// Wraps each resolved function exactly once at compile time.
pub type WrapFn = Arc<dyn Fn(HandlerFn) -> HandlerFn + Send + Sync>;

/// Host-supplied collaborators and namespace settings.
#[derive(Clone, Default)]
pub struct GatewayOptions {
    pub principal_extractor: Option<PrincipalExtractor>,
    pub wrap_function: Option<WrapFn>,
    pub authorizers: AuthorizerRegistry,
    pub cache: Option<Arc<dyn DecisionCache>>,
    pub arn: ArnOptions,
}

/// The compiler instance. Owns the options and the resolved-function table;
/// the table's lifetime is tied to this value, not to any process-wide
/// state.
pub struct Gateway {
    options: GatewayOptions,
    cache: Arc<dyn DecisionCache>,
    resolved: HashMap<(String, String), HandlerFn>,
}

const DEFAULT_RESULT_TTL_SECS: u64 = 300;

impl Gateway {
    pub fn new(options: GatewayOptions) -> Self {
        let cache = options
            .cache
            .clone()
            .unwrap_or_else(|| Arc::new(NoopCache));
        Self {
            options,
            cache,
            resolved: HashMap::new(),
        }
    }

    /// Look up the resolved (and possibly wrapped) function registered for a
    /// service + function-identifier pair.
    pub fn function(&self, service: &str, function: &str) -> Option<HandlerFn> {
        self.resolved
            .get(&(service.to_string(), function.to_string()))
            .cloned()
    }

    /// Compile every declared function's HTTP triggers into chains and
    /// register them with the router collaborator.
    pub fn compile(
        &mut self,
        service: &ServiceConfig,
        handlers: &FunctionRegistry,
        router: &mut dyn EventRouter,
    ) -> Result<(), ConfigurationError> {
        for (func_id, func) in &service.functions {
            let reference = HandlerRef::parse(&func.handler).ok_or_else(|| {
                ConfigurationError::MalformedHandlerRef {
                    function: func_id.clone(),
                    reference: func.handler.clone(),
                }
            })?;
            let mut handler =
                handlers
                    .resolve(&reference)
                    .ok_or_else(|| ConfigurationError::UnresolvedHandler {
                        function: func_id.clone(),
                        reference: func.handler.clone(),
                    })?;
            if let Some(wrap) = &self.options.wrap_function {
                handler = wrap(handler);
            }
            self.resolved
                .insert((service.service.clone(), func_id.clone()), handler.clone());

            for trigger in func.http_triggers() {
                self.compile_trigger(
                    service,
                    func_id,
                    &reference,
                    handler.clone(),
                    trigger,
                    handlers,
                    router,
                )?;
            }
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    fn compile_trigger(
        &self,
        service: &ServiceConfig,
        func_id: &str,
        reference: &HandlerRef,
        handler: HandlerFn,
        trigger: &HttpTriggerConfig,
        handlers: &FunctionRegistry,
        router: &mut dyn EventRouter,
    ) -> Result<(), ConfigurationError> {
        let method = Method::from_bytes(trigger.method.to_uppercase().as_bytes()).map_err(
            |_| ConfigurationError::InvalidMethod {
                function: func_id.to_string(),
                method: trigger.method.clone(),
            },
        )?;
        let method = method.as_str().to_lowercase();
        let path = translate_path(&trigger.path);

        let mut steps: Vec<Step> =
            vec![decorate_request(self.options.principal_extractor.clone())];

        if let Some(auth_cfg) = &trigger.authorizer {
            match self.resolve_authorizer(auth_cfg, &reference.module, handlers) {
                Some(authorizer) => {
                    steps.extend(self.authorizer_steps(service, func_id, auth_cfg, authorizer)?);
                }
                None => {
                    tracing::warn!(
                        function = %func_id,
                        name = auth_cfg.name.as_deref().unwrap_or_default(),
                        arn = auth_cfg.arn.as_deref().unwrap_or_default(),
                        "authorizer reference did not resolve, compiling route without authorization"
                    );
                }
            }
        }

        let cors = match &trigger.cors {
            Some(setting) => CorsPolicy::resolve(setting)?,
            None => None,
        };
        if let Some(policy) = &cors {
            steps.push(cors_origin(policy.clone()));
        }
        steps.push(invoke_function(handler));

        router.register(&method, &path, Chain::new(steps));
        if let Some(policy) = cors {
            router.register(
                "options",
                &path,
                Chain::new(vec![cors_preflight(policy), respond_ok()]),
            );
        }
        Ok(())
    }

    fn authorizer_steps(
        &self,
        service: &ServiceConfig,
        func_id: &str,
        cfg: &AuthorizerConfig,
        authorizer: HandlerFn,
    ) -> Result<Vec<Step>, ConfigurationError> {
        let source = match &cfg.identity_source {
            Some(locator) => IdentitySource::parse(locator)?,
            None => IdentitySource::default_source(),
        };
        let pattern = cfg
            .identity_validation_expression
            .as_deref()
            .map(|expression| {
                Regex::new(expression).map_err(|err| {
                    ConfigurationError::InvalidValidationExpression {
                        expression: expression.to_string(),
                        message: err.to_string(),
                    }
                })
            })
            .transpose()?;
        let spec = ValidationSpec {
            source,
            pattern,
            arn: self.options.arn.clone(),
            api_id: format!("{}-{}", service.service, func_id),
        };
        let ttl = Duration::from_secs(
            cfg.result_ttl_in_seconds.unwrap_or(DEFAULT_RESULT_TTL_SECS),
        );
        Ok(vec![
            validate_identity(spec),
            check_authorizer(authorizer, self.cache.clone(), ttl),
        ])
    }

    /// Resolution order: ARN against the global registry, then the name
    /// within the declaring handler's module, then the name as a dotted
    /// reference against the full registry. First match wins.
    fn resolve_authorizer(
        &self,
        cfg: &AuthorizerConfig,
        module: &str,
        handlers: &FunctionRegistry,
    ) -> Option<HandlerFn> {
        if let Some(arn) = &cfg.arn {
            if let Some(f) = self.options.authorizers.get(arn) {
                return Some(f);
            }
        }
        let name = cfg.name.as_deref()?;
        if let Some(f) = handlers.lookup(module, name) {
            return Some(f);
        }
        HandlerRef::parse(name).and_then(|r| handlers.resolve(&r))
    }
}
