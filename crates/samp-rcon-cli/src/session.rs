use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;

/// Longest session handed out; larger TTLs are clamped to this.
pub const MAX_SESSION_TTL: Duration = Duration::from_secs(365 * 24 * 60 * 60);

/// Login sessions keyed by caller identity.
///
/// Safe to share between concurrently running handlers.
#[derive(Debug)]
pub struct SessionStore<K: Eq + Hash> {
    sessions: DashMap<K, Instant>,
}

impl<K: Eq + Hash> Default for SessionStore<K> {
    fn default() -> Self {
        Self { sessions: DashMap::new() }
    }
}

impl<K: Eq + Hash> SessionStore<K> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_authorized(&self, identity: &K) -> bool {
        self.sessions
            .get(identity)
            .is_some_and(|expiry| Instant::now() < *expiry)
    }

    /// Starts (or extends) a session lasting `ttl` if `supplied` matches `expected`.
    /// `ttl` is clamped to `MAX_SESSION_TTL`.
    pub fn authorize(&self, identity: K, supplied: &str, expected: &str, ttl: Duration) -> bool {
        if !constant_time_eq(supplied.as_bytes(), expected.as_bytes()) {
            return false;
        }

        let now = Instant::now();
        let expiry = now
            .checked_add(ttl.min(MAX_SESSION_TTL))
            .unwrap_or(now);
        self.sessions.insert(identity, expiry);
        true
    }

    /// Drops expired entries, returning how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.sessions.len();
        self.sessions.retain(|_, expiry| now < *expiry);
        before - self.sessions.len()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}

/// Compares without short-circuiting on the first differing byte.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
