//! Cache Module
//!
//! Provides the in-memory cache map with TTL expiration, insertion-order
//! eviction, and deletion hooks.

mod entry;
mod map;
mod options;
mod order;


pub(crate) use entry::CacheEntry;
pub(crate) use order::InsertionOrder;

// Re-export public types
pub use map::CacheMap;
pub use options::{BeforeDelete, CacheOptions};
