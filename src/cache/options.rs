//! Cache Options Module
//!
//! Defines the configuration options for the cache and the three-tier policy
//! resolution (library default, instance default, per-call override).

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

// == Before-Delete Hook ==
/// Hook invoked with `(key, value)` exactly once, immediately before an entry
/// is removed for any reason (manual delete, TTL expiration, or capacity
/// eviction). It never fires when a value is overwritten in place.
pub type BeforeDelete<K, V> = Arc<dyn Fn(&K, &V) + Send + Sync>;

// == Cache Options ==
/// Configuration accepted by [`CacheMap::with_options`] and, per call, by
/// [`CacheMap::set_with`].
///
/// Every field is optional; absent fields fall through to the next layer
/// (per-call > instance > library default). `max_size` is only honored at
/// construction time.
///
/// [`CacheMap::with_options`]: crate::CacheMap::with_options
/// [`CacheMap::set_with`]: crate::CacheMap::set_with
pub struct CacheOptions<K, V> {
    /// Time to live of the cached value. Absent means the entry never
    /// expires; a zero duration also schedules no expiration.
    pub time_to_live: Option<Duration>,
    /// Maximum number of live entries. Absent means unbounded; zero disables
    /// insertion entirely.
    pub max_size: Option<usize>,
    /// Hook invoked once immediately before an entry is removed.
    pub before_deleted: Option<BeforeDelete<K, V>>,
}

impl<K, V> CacheOptions<K, V> {
    // == Constructor ==
    /// Creates empty options: every field falls through to the next layer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the time to live for cached values.
    pub fn with_time_to_live(mut self, time_to_live: Duration) -> Self {
        self.time_to_live = Some(time_to_live);
        self
    }

    /// Sets the maximum number of live entries.
    pub fn with_max_size(mut self, max_size: usize) -> Self {
        self.max_size = Some(max_size);
        self
    }

    /// Sets the hook invoked before an entry is removed.
    pub fn with_before_deleted<F>(mut self, hook: F) -> Self
    where
        F: Fn(&K, &V) + Send + Sync + 'static,
    {
        self.before_deleted = Some(Arc::new(hook));
        self
    }
}

impl<K, V> Default for CacheOptions<K, V> {
    fn default() -> Self {
        Self {
            time_to_live: None,
            max_size: None,
            before_deleted: None,
        }
    }
}

impl<K, V> Clone for CacheOptions<K, V> {
    fn clone(&self) -> Self {
        Self {
            time_to_live: self.time_to_live,
            max_size: self.max_size,
            before_deleted: self.before_deleted.clone(),
        }
    }
}

impl<K, V> fmt::Debug for CacheOptions<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheOptions")
            .field("time_to_live", &self.time_to_live)
            .field("max_size", &self.max_size)
            .field("before_deleted", &self.before_deleted.is_some())
            .finish()
    }
}

// == Effective Policy ==
/// The policy bound to one entry at insertion time: the TTL and hook that
/// remain after merging all option layers. Never re-resolved later.
pub(crate) struct EffectivePolicy<K, V> {
    pub time_to_live: Option<Duration>,
    pub before_deleted: Option<BeforeDelete<K, V>>,
}

// == Policy Resolution ==
/// Merges the option layers into one effective policy.
///
/// Fields are resolved independently, last present value wins, with
/// precedence per-call > instance > library default (no TTL, no hook).
/// Supplying one field per call does not blank out the other inherited field.
pub(crate) fn resolve_policy<K, V>(
    instance: &CacheOptions<K, V>,
    call: Option<&CacheOptions<K, V>>,
) -> EffectivePolicy<K, V> {
    // Library default layer: never expires, no hook.
    let mut time_to_live = None;
    let mut before_deleted = None;

    for layer in [Some(instance), call].into_iter().flatten() {
        if layer.time_to_live.is_some() {
            time_to_live = layer.time_to_live;
        }
        if let Some(hook) = &layer.before_deleted {
            before_deleted = Some(Arc::clone(hook));
        }
    }

    EffectivePolicy {
        time_to_live,
        before_deleted,
    }
}
