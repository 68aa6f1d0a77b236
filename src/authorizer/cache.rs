//! Authorization decision caching.
//!
//! The gateway only computes keys, values, and TTLs; entry lifetime is the
//! cache implementation's business. Hosts may plug any store that satisfies
//! the two-operation contract; when none is supplied every lookup misses.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use futures_util::future::BoxFuture;

use crate::authorizer::policy::AuthorizationDecision;

/// One cached decision: key is `token@methodArn`, value the decision
/// document, TTL as configured on the trigger.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    pub key: String,
    pub value: AuthorizationDecision,
    pub ttl: Duration,
}

/// Two-operation cache contract consumed by the check step.
pub trait DecisionCache: Send + Sync {
    fn get(&self, key: &str) -> BoxFuture<'_, Option<AuthorizationDecision>>;
    fn put(&self, entry: CacheEntry) -> BoxFuture<'_, ()>;
}

/// Always-miss cache used when the host supplies none.
#[derive(Debug, Default, Clone)]
pub struct NoopCache;

impl DecisionCache for NoopCache {
    fn get(&self, _key: &str) -> BoxFuture<'_, Option<AuthorizationDecision>> {
        Box::pin(async { None })
    }

    fn put(&self, _entry: CacheEntry) -> BoxFuture<'_, ()> {
        Box::pin(async {})
    }
}

struct StoredDecision {
    decision: AuthorizationDecision,
    expires_at: Instant,
}

/// Thread-safe in-process cache with per-entry expiry.
#[derive(Clone, Default)]
pub struct MemoryDecisionCache {
    inner: Arc<DashMap<String, StoredDecision>>,
}

impl MemoryDecisionCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries, expired ones included until their next lookup.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl DecisionCache for MemoryDecisionCache {
    fn get(&self, key: &str) -> BoxFuture<'_, Option<AuthorizationDecision>> {
        let key = key.to_string();
        Box::pin(async move {
            let expired = match self.inner.get(&key) {
                Some(stored) if stored.expires_at > Instant::now() => {
                    return Some(stored.decision.clone());
                }
                Some(_) => true,
                None => false,
            };
            if expired {
                self.inner.remove(&key);
            }
            None
        })
    }

    fn put(&self, entry: CacheEntry) -> BoxFuture<'_, ()> {
        Box::pin(async move {
            self.inner.insert(
                entry.key,
                StoredDecision {
                    decision: entry.value,
                    expires_at: Instant::now() + entry.ttl,
                },
            );
        })
    }
}
