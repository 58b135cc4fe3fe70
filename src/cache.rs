//! Response cache collaborator.
//!
//! The client checks the cache before every network attempt and stores only
//! status-200 bodies, keyed by the fully-qualified request URL. Expiration is
//! the cache's concern; the client never falls back to stale entries.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::debug;

/// Get-or-populate store keyed by request URL. Implementations use interior
/// mutability so a shared client can keep taking `&self`.
pub trait ResponseCache {
    /// Return the cached body for `key` if present and not expired.
    fn lookup(&self, key: &str) -> Option<String>;

    /// Store a response body under `key`. Callers only pass status-200 bodies.
    fn store(&self, key: &str, body: &str);
}

/// No-op cache used when caching is disabled. Every lookup misses.
#[derive(Debug, Default)]
pub struct NoCache;

impl ResponseCache for NoCache {
    fn lookup(&self, _key: &str) -> Option<String> {
        None
    }

    fn store(&self, _key: &str, _body: &str) {}
}

/// In-process cache with a fixed time-to-live per entry.
///
/// Entries expire lazily: an expired entry is dropped on the lookup that
/// finds it, which then behaves as a miss.
#[derive(Debug)]
pub struct MemoryCache {
    ttl: Duration,
    entries: Mutex<HashMap<String, (Instant, String)>>,
}

impl MemoryCache {
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, entries: Mutex::new(HashMap::new()) }
    }
}

impl ResponseCache for MemoryCache {
    fn lookup(&self, key: &str) -> Option<String> {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        let expired = match entries.get(key) {
            Some((stored_at, body)) => {
                if stored_at.elapsed() < self.ttl {
                    return Some(body.clone());
                }
                true
            }
            None => false,
        };
        if expired {
            debug!(key, "cache entry expired");
            entries.remove(key);
        }
        None
    }

    fn store(&self, key: &str, body: &str) {
        let mut entries = self.entries.lock().expect("cache lock poisoned");
        entries.insert(key.to_string(), (Instant::now(), body.to_string()));
    }
}
