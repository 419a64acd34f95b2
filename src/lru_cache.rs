use std::cell::UnsafeCell;
use std::collections::hash_map::RandomState;
use std::fmt;
use std::hash::{BuildHasher, Hash};

use tracing::debug;

use crate::error::CacheError;
use crate::lock::LockStrategy;
use crate::recency::RecencyList;

/// A fixed-capacity LRU cache, thread-safe when its lock is.
///
/// Every operation runs under a single acquisition of `L`, so operations
/// from different threads are totally ordered. `get` reorders entries, so
/// every operation takes the lock exclusively.
///
/// Values are handed out by `Clone`. Store shared handles such as `Arc<T>`
/// to share one payload between the cache and its callers; evicting an entry
/// only drops the cache's own handle.
///
/// # Type Parameters
///
/// * `K` - Key type. Must implement `Hash + Eq + Clone`
/// * `V` - Value type. Must implement `Clone + Send`; raw pointers are not `Send`
///   and are therefore rejected
/// * `L` - The [`LockStrategy`] protecting the cache state
/// * `S` - The hasher used by the lookup index
///
/// # Examples
///
/// ```rust
/// use lru_shootout::LruCache;
/// use std::sync::Arc;
///
/// let cache: LruCache<&str, Arc<i32>> = LruCache::new(2);
/// cache.set("a", Arc::new(1));
/// cache.set("b", Arc::new(2));
/// assert_eq!(cache.get(&"a").as_deref(), Some(&1));
///
/// // "b" is now the least recently used entry
/// cache.set("c", Arc::new(3));
/// assert_eq!(cache.get(&"b"), None);
/// ```
///
/// Raw pointers cannot be stored:
///
/// ```compile_fail
/// use lru_shootout::LruCache;
///
/// let cache: LruCache<u32, *const u8> = LruCache::new(4);
/// ```
///
/// A cache without locking cannot be shared between threads:
///
/// ```compile_fail
/// use lru_shootout::{LruCache, NoLock};
///
/// let cache: LruCache<u32, u32, NoLock> = LruCache::new(4);
/// std::thread::scope(|s| {
///     s.spawn(|| cache.get(&1));
/// });
/// ```
pub struct LruCache<K, V, L = parking_lot::Mutex<()>, S = RandomState> {
    cap: usize,
    lock: L,
    inner: UnsafeCell<RecencyList<K, V, S>>,
}

// SAFETY: `inner` is only touched while a guard from `lock` is alive, and
// `LockStrategy` guarantees such guards are exclusive across threads. This
// mirrors `Mutex<T>: Sync` requiring `T: Send`.
unsafe impl<K, V, L, S> Sync for LruCache<K, V, L, S>
where
    K: Send,
    V: Send,
    L: LockStrategy + Sync,
    S: Send,
{
}

impl<K, V, L> LruCache<K, V, L, RandomState>
where
    K: Hash + Eq + Clone,
    V: Clone + Send,
    L: LockStrategy,
{
    /// Creates an empty cache holding at most `capacity` entries.
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0
    pub fn new(capacity: usize) -> Self {
        Self::with_hasher(capacity, RandomState::new())
    }

    /// Like [`new`](Self::new), but reports a zero capacity as an error.
    pub fn try_new(capacity: usize) -> Result<Self, CacheError> {
        Self::try_with_hasher(capacity, RandomState::new())
    }
}

impl<K, V, L, S> LruCache<K, V, L, S>
where
    K: Hash + Eq + Clone,
    V: Clone + Send,
    L: LockStrategy,
    S: BuildHasher,
{
    /// Creates an empty cache whose index hashes keys with `hasher`.
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0
    pub fn with_hasher(capacity: usize, hasher: S) -> Self {
        assert!(capacity > 0, "Capacity must be positive");
        Self::build(capacity, hasher)
    }

    /// Like [`with_hasher`](Self::with_hasher), but reports a zero capacity
    /// as an error.
    pub fn try_with_hasher(capacity: usize, hasher: S) -> Result<Self, CacheError> {
        if capacity == 0 {
            return Err(CacheError::ZeroCapacity);
        }
        Ok(Self::build(capacity, hasher))
    }

    fn build(capacity: usize, hasher: S) -> Self {
        debug!(capacity, "creating LRU cache");
        Self {
            cap: capacity,
            lock: L::default(),
            inner: UnsafeCell::new(RecencyList::with_hasher(capacity, hasher)),
        }
    }

    // Runs `f` with exclusive access to the storage. The guard is released
    // before the result is handed back, so whatever `f` returns is dropped
    // outside the critical section.
    fn with_lock<R>(&self, f: impl FnOnce(&mut RecencyList<K, V, S>) -> R) -> R {
        let _guard = self.lock.acquire();
        // SAFETY: the guard proves no other reference to `inner` is live.
        let inner = unsafe { &mut *self.inner.get() };
        f(inner)
    }

    /// Inserts or replaces the value for `key` and makes it the most
    /// recently used entry.
    ///
    /// When a new key arrives at capacity, the least recently used entry is
    /// evicted first, so the cache never holds more than
    /// [`capacity`](Self::capacity) entries.
    pub fn set(&self, key: K, value: V) {
        let displaced = self.with_lock(|lru| lru.insert(key, value));
        drop(displaced);
    }

    /// Returns a clone of the value for `key` and makes it the most recently
    /// used entry. A missing key yields `None`.
    pub fn get(&self, key: &K) -> Option<V> {
        self.with_lock(|lru| lru.get(key).cloned())
    }

    /// Removes `key`, returning whether it was present. The order of the
    /// remaining entries is unchanged.
    pub fn erase(&self, key: &K) -> bool {
        self.with_lock(|lru| lru.remove(key)).is_some()
    }

    /// Removes all entries. The capacity is kept and the cache stays usable.
    pub fn clear(&self) {
        let drained = self.with_lock(RecencyList::take_all);
        debug!(entries = drained.iter().flatten().count(), "cleared LRU cache");
        drop(drained);
    }

    /// Returns a clone of the value for `key` without changing recency.
    pub fn peek(&self, key: &K) -> Option<V> {
        self.with_lock(|lru| lru.peek(key).cloned())
    }

    /// Returns whether `key` is cached, without changing recency.
    pub fn contains(&self, key: &K) -> bool {
        self.with_lock(|lru| lru.contains(key))
    }

    /// Returns the number of entries in the cache.
    pub fn len(&self) -> usize {
        self.with_lock(|lru| lru.len())
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn capacity(&self) -> usize {
        self.cap
    }

    #[cfg(test)]
    pub(crate) fn keys_mru(&self) -> Vec<K> {
        self.with_lock(|lru| lru.keys_mru())
    }

    #[cfg(test)]
    pub(crate) fn check_invariants(&self) {
        self.with_lock(|lru| {
            assert_eq!(lru.capacity(), self.cap);
            lru.check_invariants();
        })
    }
}

impl<K, V, L, S> fmt::Debug for LruCache<K, V, L, S>
where
    K: Hash + Eq + Clone,
    V: Clone + Send,
    L: LockStrategy,
    S: BuildHasher,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LruCache")
            .field("capacity", &self.cap)
            .field("len", &self.len())
            .finish()
    }
}
