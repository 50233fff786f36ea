//! CacheMap - a bounded, time-aware in-memory cache
//!
//! Provides a key/value map with per-entry TTL expiration, insertion-order
//! capacity eviction, and a before-deleted notification hook.
//!
//! Expiration timers are scheduled on the Tokio runtime, so inserting an
//! entry with a finite TTL requires a running runtime. Entries without a TTL
//! work anywhere.
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//! use cachemap::{CacheMap, CacheOptions};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let cache: CacheMap<String, u32> = CacheMap::with_options(
//!         CacheOptions::new()
//!             .with_max_size(100)
//!             .with_time_to_live(Duration::from_secs(60)),
//!     );
//!
//!     cache.set("session".to_string(), 1);
//!     assert_eq!(cache.get(&"session".to_string()), Some(1));
//! }
//! ```

pub mod cache;

pub use cache::{BeforeDelete, CacheMap, CacheOptions};
