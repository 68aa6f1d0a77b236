//! Request-processing pipeline.
//!
//! # Data Flow
//! ```text
//! Compile time (compiler.rs):
//!     declared function + HTTP trigger
//!     → resolve handler (registry) and authorizer (arn → local → global)
//!     → assemble ordered steps:
//!       [decorate, (validate, check)?, (cors)?, invoke]
//!     → register with the router collaborator
//!
//! Request time (step.rs driver):
//!     each step returns Proceed or Respond
//!     → first Respond terminates the chain
//!     → the invoker always responds, never proceeds
//! ```
//!
//! # Design Decisions
//! - Steps communicate through one owned per-request state value
//! - Short-circuiting is the only cancellation mechanism inside a chain
//! - All compile-time resolution failures for target functions are fatal;
//!   nothing is deferred to request time

pub mod compiler;
pub mod cors;
pub mod decorate;
pub mod invocation;
pub mod invoke;
pub mod step;

pub use compiler::{Gateway, GatewayOptions};
pub use step::{Chain, RequestState, Step, StepOutcome};
