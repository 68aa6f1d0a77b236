//! Demo gateway: wires a small sample service through the pipeline
//! compiler and serves it, for local smoke-testing.
//!
//! ```text
//! slsgate-demo [--service service.toml] [--bind 127.0.0.1:3000]
//!
//! GET  /hello/{name}          → greeting payload
//! POST /echo                  → echoes the request body (CORS enabled)
//! GET  /secure                → requires `Authorization: Bearer ...`,
//!                               tokens containing "deny" are rejected
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use slsgate::authorizer::cache::MemoryDecisionCache;
use slsgate::authorizer::policy::AuthorizationDecision;
use slsgate::config::loader::{load_gateway_config, load_service};
use slsgate::config::schema::ServiceConfig;
use slsgate::error::InvocationError;
use slsgate::http::server::shutdown_signal;
use slsgate::{
    handler_fn, ChainRouter, FunctionRegistry, Gateway, GatewayConfig, GatewayOptions,
    GatewayServer,
};

#[derive(Parser, Debug)]
#[command(name = "slsgate-demo", about = "Serve a sample service through the gateway emulator")]
struct Args {
    /// Gateway settings file (TOML); defaults apply when omitted.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Service declaration file (TOML); a built-in sample is used when omitted.
    #[arg(long)]
    service: Option<PathBuf>,

    /// Override the listener bind address.
    #[arg(long)]
    bind: Option<String>,
}

fn sample_registry() -> FunctionRegistry {
    let mut registry = FunctionRegistry::new();
    registry.insert(
        "demo",
        "hello",
        handler_fn(|event: Value, _ctx| async move {
            let name = event["path"]["name"].as_str().unwrap_or("world");
            Ok(json!({ "greeting": format!("hello, {name}") }))
        }),
    );
    registry.insert(
        "demo",
        "echo",
        handler_fn(|event: Value, _ctx| async move { Ok(event["body"].clone()) }),
    );
    registry.insert(
        "demo",
        "secure",
        handler_fn(|_event, ctx| async move {
            Ok(json!({ "requestId": ctx.request_id, "authorizer": ctx.authorizer }))
        }),
    );
    registry.insert(
        "demo",
        "token-auth",
        handler_fn(|event: Value, _ctx| async move {
            let token = event["authorizationToken"].as_str().unwrap_or_default();
            let arn = event["methodArn"].as_str().unwrap_or_default();
            if token.is_empty() {
                return Err(InvocationError::new("empty token"));
            }
            let decision = if token.contains("deny") {
                AuthorizationDecision::deny("anonymous", arn)
            } else {
                AuthorizationDecision::allow("demo-user", arn)
            };
            serde_json::to_value(&decision).map_err(|e| InvocationError::new(e.to_string()))
        }),
    );
    registry
}

fn sample_service() -> ServiceConfig {
    toml::from_str(
        r#"
        service = "demo"

        [functions.hello]
        handler = "demo.hello"
        [[functions.hello.events]]
        [functions.hello.events.http]
        method = "GET"
        path = "hello/{name}"

        [functions.echo]
        handler = "demo.echo"
        [[functions.echo.events]]
        [functions.echo.events.http]
        method = "POST"
        path = "echo"
        cors = true

        [functions.secure]
        handler = "demo.secure"
        [[functions.secure.events]]
        [functions.secure.events.http]
        method = "GET"
        path = "secure"
        [functions.secure.events.http.authorizer]
        name = "token-auth"
        identityValidationExpression = "Bearer .*"
        resultTtlInSeconds = 60
        "#,
    )
    .unwrap_or_else(|err| {
        tracing::error!(error = %err, "built-in sample service is malformed");
        std::process::exit(1);
    })
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "slsgate=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut config = match &args.config {
        Some(path) => load_gateway_config(path)?,
        None => GatewayConfig::default(),
    };
    if let Some(bind) = args.bind {
        config.listener.bind_address = bind;
    }

    let service = match &args.service {
        Some(path) => load_service(path)?,
        None => sample_service(),
    };

    tracing::info!(
        service = %service.service,
        functions = service.functions.len(),
        bind_address = %config.listener.bind_address,
        "compiling service"
    );

    let registry = sample_registry();
    let mut router = ChainRouter::new();
    let mut gateway = Gateway::new(GatewayOptions {
        cache: Some(Arc::new(MemoryDecisionCache::new())),
        arn: config.arn.clone(),
        ..GatewayOptions::default()
    });
    gateway.compile(&service, &registry, &mut router)?;
    tracing::info!(routes = router.len(), "service compiled");

    if config.observability.metrics_enabled {
        match config.observability.metrics_address.parse() {
            Ok(addr) => slsgate::observability::metrics::init_metrics(addr),
            Err(err) => tracing::error!(
                metrics_address = %config.observability.metrics_address,
                error = %err,
                "failed to parse metrics address"
            ),
        }
    }

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    let server = GatewayServer::new(router, config);
    server.run(listener, shutdown_signal()).await?;

    Ok(())
}
