//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks, all errors collected)
//!     → GatewayConfig / ServiceConfig (validated, immutable)
//!     → ServiceConfig feeds the pipeline compiler once at startup
//! ```
//!
//! # Design Decisions
//! - Declarations are immutable once loaded; they are read exactly once at
//!   compile time
//! - All gateway settings have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use schema::GatewayConfig;
pub use schema::ServiceConfig;
