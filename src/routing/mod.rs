//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Compile time:
//!     trigger path template "users/{id}"
//!     → translate.rs ("/users/:id", router-native pattern)
//!     → matcher.rs (compile into literal/parameter segments)
//!     → router.rs (registered with lower-cased method + chain)
//!
//! Request time:
//!     (method, path)
//!     → router.rs lookup, first match wins
//!     → matcher.rs extracts path parameters
//!     → Return: matched chain + parameters, or explicit no-match
//! ```
//!
//! # Design Decisions
//! - Routes compiled at registration, immutable while serving
//! - Segment comparison only, no regex in the hot path
//! - Explicit no-match rather than a silent default route

pub mod matcher;
pub mod router;
pub mod translate;

pub use router::{ChainRouter, EventRouter};
pub use translate::translate_path;
