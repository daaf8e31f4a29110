use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// Grant-lookup cache TTL.
pub const GRANT_CACHE_TTL: Duration = Duration::from_secs(5 * 60);
/// Listing cache TTL for high-churn collections (rentals, customers).
pub const HIGH_CHURN_TTL: Duration = Duration::from_secs(2 * 60);
/// Listing cache TTL for low-churn collections.
pub const LOW_CHURN_TTL: Duration = Duration::from_secs(3 * 60);

/// Read-through cache with a fixed per-instance TTL.
///
/// `get_or_load` returns the cached value while it is younger than the TTL
/// and re-runs the loader otherwise; an expired entry is a miss, never
/// served stale. Invalidation is synchronous: a `get_or_load` issued on the
/// same process after `invalidate` returns is guaranteed to reload.
///
/// Concurrent callers racing on the same missing key may each invoke the
/// loader; the last completed load wins. There is no cross-process
/// invalidation; staleness across instances is bounded only by the TTL.
#[derive(Debug, Clone)]
pub struct TtlCache<K, V> {
    inner: Arc<Mutex<HashMap<K, CacheEntry<V>>>>,
    ttl: Duration,
}

#[derive(Debug)]
struct CacheEntry<V> {
    value: V,
    stored_at: Instant,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone + fmt::Debug,
    V: Clone,
{
    /// Creates a cache whose entries live for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: Arc::new(Mutex::new(HashMap::new())),
            ttl,
        }
    }

    /// Returns the configured TTL.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Returns the cached value or runs `loader`, storing its result.
    ///
    /// Loader failures are returned as-is and never cached.
    pub async fn get_or_load<F, Fut, E>(&self, key: K, loader: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            tracing::trace!(?key, "cache hit");
            return Ok(value);
        }
        tracing::trace!(?key, "cache miss");
        let value = loader().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Returns the cached value if it is still fresh.
    pub fn get(&self, key: &K) -> Option<V> {
        let now = Instant::now();
        let mut guard = self.inner.lock().expect("poisoned lock");
        match guard.get(key) {
            Some(entry) if now.saturating_duration_since(entry.stored_at) < self.ttl => {
                Some(entry.value.clone())
            }
            Some(_) => {
                guard.remove(key);
                None
            }
            None => None,
        }
    }

    /// Stores a value, resetting its age.
    pub fn insert(&self, key: K, value: V) {
        let mut guard = self.inner.lock().expect("poisoned lock");
        guard.insert(
            key,
            CacheEntry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Removes one key.
    pub fn invalidate(&self, key: &K) {
        let mut guard = self.inner.lock().expect("poisoned lock");
        guard.remove(key);
    }

    /// Removes every entry.
    pub fn invalidate_all(&self) {
        let mut guard = self.inner.lock().expect("poisoned lock");
        guard.clear();
    }
}

/// Whole-collection listing cache for high-traffic entity read paths.
///
/// The loader re-runs the full listing query; write paths call
/// [`CollectionCache::invalidate_all`] before returning. Whole-cache
/// invalidation trades key-level precision for read-your-writes within one
/// process, which is sufficient at this scale.
#[derive(Debug, Clone)]
pub struct CollectionCache<T> {
    inner: TtlCache<(), Vec<T>>,
}

impl<T: Clone> CollectionCache<T> {
    /// Creates a listing cache whose snapshot lives for `ttl`.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: TtlCache::new(ttl),
        }
    }

    /// Returns the cached listing or reloads it.
    pub async fn get_or_load<F, Fut, E>(&self, loader: F) -> Result<Vec<T>, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Vec<T>, E>>,
    {
        self.inner.get_or_load((), loader).await
    }

    /// Drops the cached listing; the next read reloads.
    pub fn invalidate_all(&self) {
        self.inner.invalidate_all();
    }
}
