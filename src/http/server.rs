//! HTTP server setup and dispatch.
//!
//! # Responsibilities
//! - Create the axum Router with the catch-all dispatch handler
//! - Wire up middleware (timeout, tracing)
//! - Convert raw requests into per-request chain state
//! - Dispatch matched requests into the registered chain
//! - Graceful shutdown

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
    routing::any,
    Router,
};
use serde_json::Value;
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::schema::GatewayConfig;
use crate::observability::metrics;
use crate::pipeline::step::RequestState;
use crate::routing::router::ChainRouter;

/// Application state injected into the dispatch handler.
#[derive(Clone)]
struct AppState {
    router: Arc<ChainRouter>,
    max_body_bytes: usize,
}

/// HTTP server driving compiled chains.
pub struct GatewayServer {
    router: Router,
    config: GatewayConfig,
}

impl GatewayServer {
    /// Wrap a compiled route table in a servable application.
    pub fn new(routes: ChainRouter, config: GatewayConfig) -> Self {
        let state = AppState {
            router: Arc::new(routes),
            max_body_bytes: config.listener.max_body_bytes,
        };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    fn build_router(config: &GatewayConfig, state: AppState) -> Router {
        Router::new()
            .route("/{*path}", any(dispatch))
            .route("/", any(dispatch))
            .with_state(state)
            .layer(TimeoutLayer::new(Duration::from_secs(
                config.timeouts.request_secs,
            )))
            .layer(TraceLayer::new_for_http())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Run the server until the shutdown future resolves.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: impl std::future::Future<Output = ()> + Send + 'static,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "gateway listening");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;

        tracing::info!("gateway stopped");
        Ok(())
    }
}

/// Wait for Ctrl+C.
pub async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install Ctrl+C handler");
        return;
    }
    tracing::info!("shutdown signal received");
}

/// Catch-all handler: translate the raw request into chain state and run
/// the first matching chain.
async fn dispatch(State(state): State<AppState>, request: Request<Body>) -> Response {
    let start = Instant::now();
    let (parts, body) = request.into_parts();

    let method = parts.method.clone();
    let path = parts.uri.path().to_string();
    let query: HashMap<String, String> = parts
        .uri
        .query()
        .map(|q| {
            url::form_urlencoded::parse(q.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(_) => {
            tracing::warn!(path = %path, "request body over the configured limit");
            return (StatusCode::PAYLOAD_TOO_LARGE, "Request body too large").into_response();
        }
    };
    let body_value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
    };

    let method_str = method.as_str().to_lowercase();
    let Some(matched) = state.router.match_request(&method_str, &path) else {
        tracing::debug!(method = %method, path = %path, "no route matched");
        metrics::record_request(&method_str, "none", StatusCode::NOT_FOUND.as_u16(), start);
        return (StatusCode::NOT_FOUND, "No matching route found").into_response();
    };

    let mut chain_state = RequestState::new(method, path.as_str());
    chain_state.headers = parts.headers;
    chain_state.body = body_value;
    chain_state.path_params = matched.params.clone();
    chain_state.query = query;

    let response = matched.chain.run(&mut chain_state).await;
    metrics::record_request(
        &method_str,
        matched.pattern,
        response.status().as_u16(),
        start,
    );
    response
}
