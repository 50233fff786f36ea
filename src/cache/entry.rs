//! Cache Entry Module
//!
//! Defines the structure for individual cache entries.

use tokio::task::JoinHandle;

use crate::cache::options::BeforeDelete;

// == Cache Entry ==
/// Represents a single cache entry with its resolved policy.
///
/// The expiration handle and hook are bound at insertion time and never
/// re-resolved. The generation stamp ties a scheduled expiration to exactly
/// one insertion: a timer firing for an older generation of the same key is
/// ignored.
pub struct CacheEntry<K, V> {
    /// The stored value
    pub value: V,
    /// Handle of the pending scheduled deletion, present iff the entry's
    /// effective time to live is finite and non-zero
    pub expiration: Option<JoinHandle<()>>,
    /// Hook invoked once immediately before the entry is removed
    pub before_deleted: Option<BeforeDelete<K, V>>,
    /// Insertion generation, stamped at set time
    pub generation: u64,
}

impl<K, V> CacheEntry<K, V> {
    // == Constructor ==
    /// Creates a new entry with no expiration scheduled yet.
    pub fn new(value: V, before_deleted: Option<BeforeDelete<K, V>>, generation: u64) -> Self {
        Self {
            value,
            expiration: None,
            before_deleted,
            generation,
        }
    }

    // == Cancel Expiration ==
    /// Cancels the pending scheduled deletion, if any.
    ///
    /// Idempotent: cancelling an already-fired or already-cancelled timer is
    /// a no-op.
    pub fn cancel_expiration(&mut self) {
        if let Some(handle) = self.expiration.take() {
            handle.abort();
        }
    }
}
