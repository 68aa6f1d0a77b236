//! Serverless HTTP Gateway Emulator Library

pub mod authorizer;
pub mod config;
pub mod error;
pub mod http;
pub mod observability;
pub mod pipeline;
pub mod registry;
pub mod routing;

pub use config::schema::{GatewayConfig, ServiceConfig};
pub use error::ConfigurationError;
pub use http::GatewayServer;
pub use pipeline::compiler::{Gateway, GatewayOptions};
pub use registry::{handler_fn, AuthorizerRegistry, FunctionRegistry, HandlerRef};
pub use routing::router::{ChainRouter, EventRouter};
