//! Insertion Order Module
//!
//! Tracks the insertion order of keys for capacity eviction.

use std::collections::VecDeque;

// == Insertion Order Tracker ==
/// Tracks key insertion order for FIFO-style eviction.
///
/// Keys are stored in a VecDeque where:
/// - Front = Newest insertion
/// - Back = Oldest insertion
///
/// Re-setting an existing key moves it to the newest end; reads never change
/// the order.
#[derive(Debug, Default)]
pub struct InsertionOrder<K> {
    /// Keys ordered by insertion time
    order: VecDeque<K>,
}

impl<K: Clone + PartialEq> InsertionOrder<K> {
    // == Constructor ==
    /// Creates a new empty tracker.
    pub fn new() -> Self {
        Self {
            order: VecDeque::new(),
        }
    }

    // == Mark Newest ==
    /// Records a key at the newest position.
    ///
    /// If the key is already tracked it is moved to the newest end, so a
    /// value overwrite repositions the key without duplicating it.
    pub fn mark_newest(&mut self, key: &K) {
        self.remove(key);
        self.order.push_front(key.clone());
    }

    // == Remove ==
    /// Removes a key from the tracker. Unknown keys are ignored.
    pub fn remove(&mut self, key: &K) {
        self.order.retain(|k| k != key);
    }

    // == Oldest ==
    /// Returns the oldest tracked key without removing it.
    pub fn oldest(&self) -> Option<&K> {
        self.order.back()
    }

    // == Pop Oldest ==
    /// Returns and removes the oldest tracked key.
    #[allow(dead_code)]
    pub fn pop_oldest(&mut self) -> Option<K> {
        self.order.pop_back()
    }

    // == Length ==
    /// Returns the number of tracked keys.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    // == Is Empty ==
    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    // == Contains ==
    /// Checks if a key is being tracked.
    #[allow(dead_code)]
    pub fn contains(&self, key: &K) -> bool {
        self.order.iter().any(|k| k == key)
    }
}
