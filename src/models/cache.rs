//! In-memory TTL cache for API read responses.
//!
//! Entries expire lazily: an expired entry is removed the next time it is
//! read. `purge_expired` and `spawn_sweeper` reap entries that are never
//! read again.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::models::params::Params;

const KEY_SEPARATOR: &str = "::";

/// Longest TTL honoured; larger values are clamped so the deadline never overflows.
const MAX_TTL: Duration = Duration::from_secs(60 * 60 * 24 * 365 * 30);

/// Logical identity of a read request: path plus sorted parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CacheKey(String);

impl CacheKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for CacheKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CacheKey {
    fn from(value: &str) -> Self {
        CacheKey(value.to_string())
    }
}

impl From<String> for CacheKey {
    fn from(value: String) -> Self {
        CacheKey(value)
    }
}

/// Derives the key for `path` and `params`.
///
/// `cache_key("/articles", &Params::new())` is `/articles::`; with parameters
/// the suffix is the compact JSON object of the sorted parameters.
pub fn cache_key(path: &str, params: &Params) -> CacheKey {
    let serialized = if params.is_empty() {
        String::new()
    } else {
        params.to_json()
    };
    CacheKey(format!("{}{}{}", path, KEY_SEPARATOR, serialized))
}

/// Source of the current time for expiry checks.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Instant {
        Instant::now()
    }
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> Instant {
        (**self).now()
    }
}

#[derive(Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_live(&self, now: Instant) -> bool {
        now <= self.expires_at
    }
}

/// Shared store of response payloads with per-entry expiry.
///
/// Create one per application and hand out `Arc` clones; every operation
/// takes the lock once and finishes before releasing it.
pub struct ResponseCache<V, C = SystemClock> {
    entries: Mutex<HashMap<CacheKey, CacheEntry<V>>>,
    clock: C,
}

impl<V: Clone> ResponseCache<V> {
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<V: Clone> Default for ResponseCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone, C: Clock> ResponseCache<V, C> {
    pub fn with_clock(clock: C) -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            clock,
        }
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<CacheKey, CacheEntry<V>>> {
        // A panic elsewhere cannot leave an entry half-written
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Returns the value under `key` if it has not expired. An expired entry
    /// is removed and reported as a miss.
    pub fn get(&self, key: &str) -> Option<V> {
        let now = self.clock.now();
        let mut entries = self.lock();
        let live = match entries.get(key) {
            None => return None,
            Some(entry) => entry.is_live(now).then(|| entry.value.clone()),
        };
        if live.is_none() {
            entries.remove(key);
            debug!("Reaped expired cache entry {}", key);
        }
        live
    }

    /// Stores `value` under `key` for `ttl`, replacing any previous entry.
    /// A zero `ttl` only removes the previous entry.
    pub fn set(&self, key: impl Into<CacheKey>, value: V, ttl: Duration) {
        let key = key.into();
        let mut entries = self.lock();
        if ttl.is_zero() {
            entries.remove(&key);
            debug!("Zero TTL for {}, nothing cached", key);
            return;
        }
        let expires_at = self.clock.now() + ttl.min(MAX_TTL);
        debug!("Caching {} for {:?}", key, ttl);
        entries.insert(key, CacheEntry { value, expires_at });
    }

    pub fn clear(&self) {
        let mut entries = self.lock();
        debug!("Clearing {} cache entries", entries.len());
        entries.clear();
    }

    /// Removes every entry whose key contains `pattern`. Returns how many
    /// entries were removed.
    pub fn clear_pattern(&self, pattern: &str) -> usize {
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|key, _| !key.as_str().contains(pattern));
        let removed = before - entries.len();
        debug!("Cleared {} cache entries matching '{}'", removed, pattern);
        removed
    }

    /// Removes every expired entry. Returns how many were removed.
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.lock();
        let before = entries.len();
        entries.retain(|_, entry| entry.is_live(now));
        before - entries.len()
    }

    /// Physical entry count, including expired entries not yet reaped.
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }
}

impl<V, C> ResponseCache<V, C>
where
    V: Clone + Send + 'static,
    C: Clock + 'static,
{
    /// Starts a background task that purges expired entries every
    /// `interval`. The task stops once the last handle to the cache is dropped.
    pub fn spawn_sweeper(self: &Arc<Self>, interval: Duration) -> JoinHandle<()> {
        let cache = Arc::downgrade(self);
        let period = interval.max(Duration::from_millis(1));
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            // first tick fires immediately
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let Some(live) = cache.upgrade() else {
                    break;
                };
                let purged = live.purge_expired();
                if purged > 0 {
                    debug!("Sweeper purged {} expired cache entries", purged);
                }
            }
        })
    }
}
