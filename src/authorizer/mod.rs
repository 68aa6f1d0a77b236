//! Authorizer simulation.
//!
//! # Data Flow
//! ```text
//! Request with resolved authorizer:
//!     → identity.rs (credential lookup via identity source, 403 on miss)
//!     → arn.rs (synthesize the method ARN)
//!     → simulate.rs check step:
//!         cache.rs get(token@arn)
//!         → hit: evaluate cached decision
//!         → miss: invoke authorizer, cache decision, evaluate
//!     → policy.rs (first-statement Effect: Allow proceeds, else 401;
//!       authorizer failure maps to 500)
//! ```
//!
//! # Design Decisions
//! - Whether an authorizer runs at all is decided at compile time; the
//!   chain for a trigger without one contains no authorization step
//! - Cache keys are scoped per-resource (`token@methodArn`), so the same
//!   credential is re-checked for each distinct endpoint
//! - Decisions are evaluated tolerantly: a malformed document is a denial,
//!   not a crash

pub mod arn;
pub mod cache;
pub mod identity;
pub mod policy;
pub mod simulate;

pub use arn::ArnOptions;
pub use cache::{CacheEntry, DecisionCache, MemoryDecisionCache, NoopCache};
pub use identity::IdentitySource;
pub use policy::{AuthorizationDecision, Effect};
pub use simulate::{check_authorizer, validate_identity};
