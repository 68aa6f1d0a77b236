//! HTTP transport subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (axum catch-all, timeout + trace layers)
//!     → ChainRouter lookup (first match wins, 404 otherwise)
//!     → chain driver runs the registered steps
//!     → response back to the client
//! ```

pub mod server;

pub use server::GatewayServer;
