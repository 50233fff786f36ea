//! Cache Map Module
//!
//! Main cache engine combining HashMap storage with insertion-order tracking
//! and per-entry TTL expiration.

use std::collections::HashMap;
use std::fmt;
use std::hash::Hash;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{debug, trace};

use crate::cache::options::resolve_policy;
use crate::cache::{CacheEntry, CacheOptions, InsertionOrder};

// == Cache Map ==
/// An in-memory key/value cache with per-entry TTL expiration,
/// insertion-order capacity eviction, and a before-deleted hook.
///
/// Every removal (manual [`delete`], TTL expiration, capacity eviction, or
/// [`clear`]) goes through one unified path: the pending timer is cancelled,
/// the entry's bound hook fires exactly once with `(key, value)`, and the
/// entry leaves storage. Overwriting an existing key is a replace, not a
/// removal: the key moves to the newest insertion position and no hook fires.
///
/// Hooks run while the cache's internal lock is held and must not call back
/// into the same `CacheMap`.
///
/// [`delete`]: CacheMap::delete
/// [`clear`]: CacheMap::clear
pub struct CacheMap<K, V> {
    /// Shared state, also held by pending expiration tasks
    inner: Arc<Mutex<Inner<K, V>>>,
    /// Instance-level default options supplied at construction
    defaults: CacheOptions<K, V>,
    /// Maximum number of live entries; None = unbounded, zero disables `set`
    max_size: Option<usize>,
}

/// State guarded as one atomic unit: entries, their insertion order, and the
/// generation counter that scopes timers to a single insertion.
struct Inner<K, V> {
    entries: HashMap<K, CacheEntry<K, V>>,
    order: InsertionOrder<K>,
    next_generation: u64,
}

impl<K, V> CacheMap<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    // == Constructors ==
    /// Creates an unbounded cache with no default TTL and no default hook.
    pub fn new() -> Self {
        Self::with_options(CacheOptions::default())
    }

    /// Creates a cache with instance-level default options.
    ///
    /// `time_to_live` and `before_deleted` become the instance layer of the
    /// policy resolution; `max_size` fixes the capacity.
    pub fn with_options(options: CacheOptions<K, V>) -> Self {
        let max_size = options.max_size;
        Self {
            inner: Arc::new(Mutex::new(Inner {
                entries: HashMap::new(),
                order: InsertionOrder::new(),
                next_generation: 0,
            })),
            defaults: options,
            max_size,
        }
    }

    // == Get ==
    /// Returns a clone of the cached value, or `None` if the key is absent.
    ///
    /// Pure lookup: no timer interaction, no effect on insertion order. Wrap
    /// expensive payloads in `Arc` to make the clone cheap.
    pub fn get(&self, key: &K) -> Option<V>
    where
        V: Clone,
    {
        let inner = self.inner.lock().unwrap();
        inner.entries.get(key).map(|entry| entry.value.clone())
    }

    // == Has ==
    /// Checks if a value exists in the cache. Pure lookup.
    pub fn has(&self, key: &K) -> bool {
        self.inner.lock().unwrap().entries.contains_key(key)
    }

    // == Set ==
    /// Stores a key/value pair using the instance-level default options.
    ///
    /// If the key already exists, the value is replaced, the old timer is
    /// cancelled, and the key moves to the newest insertion position without
    /// firing the hook. If the cache is bounded and full, the oldest entry is
    /// evicted (with its hook fired) before the new key is stored.
    pub fn set(&self, key: K, value: V) {
        self.set_resolved(key, value, None);
    }

    /// Stores a key/value pair with per-call option overrides.
    ///
    /// Each supplied field overrides the instance default independently;
    /// absent fields are inherited. A per-call `max_size` is ignored.
    pub fn set_with(&self, key: K, value: V, options: CacheOptions<K, V>) {
        self.set_resolved(key, value, Some(&options));
    }

    fn set_resolved(&self, key: K, value: V, call_options: Option<&CacheOptions<K, V>>) {
        // A configured capacity of zero disables insertion entirely: nothing
        // is stored, no hook fires, no timer is scheduled.
        if self.max_size == Some(0) {
            return;
        }

        let policy = resolve_policy(&self.defaults, call_options);

        let mut inner = self.inner.lock().unwrap();

        // Evict the oldest entry only when a *new* key would push a bounded
        // cache past capacity; a replace never evicts.
        if !inner.entries.contains_key(&key) {
            if let Some(max_size) = self.max_size {
                if inner.entries.len() >= max_size {
                    if let Some(oldest) = inner.order.oldest().cloned() {
                        debug!(size = inner.entries.len(), "evicting oldest entry to make room");
                        Self::remove_locked(&mut inner, &oldest);
                    }
                }
            }
        }

        if let Some(mut previous) = inner.entries.remove(&key) {
            // Replace: the old timer dies with the old entry, but the hook
            // stays silent because this is an overwrite, not a removal.
            previous.cancel_expiration();
        }
        inner.order.mark_newest(&key);

        let generation = inner.next_generation;
        inner.next_generation += 1;

        let mut entry = CacheEntry::new(value, policy.before_deleted, generation);
        if let Some(ttl) = policy.time_to_live.filter(|ttl| !ttl.is_zero()) {
            entry.expiration = Some(self.schedule_expiration(key.clone(), generation, ttl));
        }

        trace!(size = inner.entries.len() + 1, "stored entry");
        inner.entries.insert(key, entry);
    }

    // == Delete ==
    /// Deletes a cached value.
    ///
    /// Cancels the pending timer, invokes the bound hook with `(key, value)`,
    /// and removes the entry. Deleting an absent key is a no-op.
    pub fn delete(&self, key: &K) {
        let mut inner = self.inner.lock().unwrap();
        if Self::remove_locked(&mut inner, key) {
            debug!(remaining = inner.entries.len(), "deleted entry");
        }
    }

    // == Clear ==
    /// Removes every entry, oldest first, through the unified removal path:
    /// timers are cancelled and each entry's hook fires exactly once.
    pub fn clear(&self) {
        let mut inner = self.inner.lock().unwrap();
        while let Some(oldest) = inner.order.oldest().cloned() {
            Self::remove_locked(&mut inner, &oldest);
        }
        debug!("cleared cache");
    }

    // == Length ==
    /// Returns the current number of live entries.
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().entries.len()
    }

    // == Is Empty ==
    /// Returns true if the cache holds no entries.
    pub fn is_empty(&self) -> bool {
        self.inner.lock().unwrap().entries.is_empty()
    }

    // == Unified Removal Path ==
    /// Removes one entry: cancels its timer, fires its hook, drops it from
    /// storage and from the insertion order. Manual delete, TTL expiration,
    /// capacity eviction, and `clear` all funnel through here, which is what
    /// keeps the hook at exactly one invocation per removal.
    ///
    /// Returns false if the key was already absent.
    fn remove_locked(inner: &mut Inner<K, V>, key: &K) -> bool {
        let mut entry = match inner.entries.remove(key) {
            Some(entry) => entry,
            None => return false,
        };
        inner.order.remove(key);
        entry.cancel_expiration();
        if let Some(hook) = entry.before_deleted.take() {
            hook(key, &entry.value);
        }
        true
    }

    // == Expiration Scheduling ==
    /// Schedules the one-shot deletion of `key` after `ttl`.
    ///
    /// The task captures the insertion generation; if the key was removed or
    /// re-set by the time the timer fires, the generation no longer matches
    /// and the firing is a no-op. This keeps a stale timer from corrupting a
    /// newer entry stored under the same key.
    fn schedule_expiration(&self, key: K, generation: u64, ttl: Duration) -> JoinHandle<()> {
        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            tokio::time::sleep(ttl).await;

            let mut inner = inner.lock().unwrap();
            let live = inner.entries.get(&key).map(|entry| entry.generation);
            if live == Some(generation) {
                debug!("entry expired");
                Self::remove_locked(&mut inner, &key);
            }
        })
    }
}

impl<K, V> Default for CacheMap<K, V>
where
    K: Eq + Hash + Clone + Send + 'static,
    V: Send + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> Drop for CacheMap<K, V> {
    fn drop(&mut self) {
        // Pending expiration tasks hold a clone of the shared state and would
        // keep it alive until they fire. Dropping the cache is not a
        // per-entry removal event, so no hooks fire here.
        if let Ok(mut inner) = self.inner.lock() {
            for entry in inner.entries.values_mut() {
                entry.cancel_expiration();
            }
        }
    }
}

impl<K, V> fmt::Debug for CacheMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheMap")
            .field("max_size", &self.max_size)
            .field("defaults", &self.defaults)
            .finish_non_exhaustive()
    }
}
