//! Integration tests for the cache map
//!
//! Exercises the public API end to end: policy layering, TTL expiration,
//! capacity eviction, and hook delivery across mixed workloads.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use cachemap::{CacheMap, CacheOptions};

type HookLog = Arc<Mutex<Vec<(String, String)>>>;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn logged_hook(log: &HookLog) -> impl Fn(&String, &String) + Send + Sync + 'static {
    let log = Arc::clone(log);
    move |key: &String, value: &String| log.lock().unwrap().push((key.clone(), value.clone()))
}

#[tokio::test(start_paused = true)]
async fn session_cache_lifecycle() {
    init_tracing();

    // A bounded session cache: entries idle out after 100ms unless refreshed.
    let log: HookLog = Arc::new(Mutex::new(Vec::new()));
    let cache = CacheMap::with_options(
        CacheOptions::new()
            .with_max_size(2)
            .with_time_to_live(Duration::from_millis(100))
            .with_before_deleted(logged_hook(&log)),
    );

    cache.set("alice".to_string(), "token-a".to_string());
    tokio::time::sleep(Duration::from_millis(60)).await;
    cache.set("bob".to_string(), "token-b".to_string());

    // Refreshing alice reschedules her expiration and repositions her as
    // newest, all without a hook firing.
    tokio::time::sleep(Duration::from_millis(30)).await;
    cache.set("alice".to_string(), "token-a2".to_string());
    assert!(log.lock().unwrap().is_empty());

    // A third session evicts the oldest present entry, which is now bob.
    cache.set("carol".to_string(), "token-c".to_string());
    assert!(!cache.has(&"bob".to_string()));
    assert_eq!(
        log.lock().unwrap().clone(),
        vec![("bob".to_string(), "token-b".to_string())]
    );

    // Alice's refreshed TTL runs from the refresh, not the original insert.
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(cache.get(&"alice".to_string()), Some("token-a2".to_string()));

    tokio::time::sleep(Duration::from_millis(80)).await;
    assert!(cache.is_empty());

    let fired = log.lock().unwrap().clone();
    assert_eq!(fired.len(), 3);
    assert_eq!(fired[0].0, "bob");
    // alice and carol both expired exactly once, in some timer order
    let mut expired: Vec<&str> = fired[1..].iter().map(|(k, _)| k.as_str()).collect();
    expired.sort_unstable();
    assert_eq!(expired, vec!["alice", "carol"]);
}

#[tokio::test(start_paused = true)]
async fn per_call_ttl_overrides_instance_default() {
    init_tracing();

    let cache = CacheMap::with_options(
        CacheOptions::new().with_time_to_live(Duration::from_millis(500)),
    );

    cache.set("long".to_string(), "v".to_string());
    cache.set_with(
        "short".to_string(),
        "v".to_string(),
        CacheOptions::new().with_time_to_live(Duration::from_millis(50)),
    );

    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(cache.has(&"long".to_string()));
    assert!(!cache.has(&"short".to_string()));
}

#[tokio::test(start_paused = true)]
async fn per_call_hook_inherits_instance_ttl() {
    init_tracing();

    let log: HookLog = Arc::new(Mutex::new(Vec::new()));
    let cache = CacheMap::with_options(
        CacheOptions::new().with_time_to_live(Duration::from_millis(100)),
    );

    cache.set_with(
        "a".to_string(),
        "1".to_string(),
        CacheOptions::new().with_before_deleted(logged_hook(&log)),
    );

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert!(cache.has(&"a".to_string()));

    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!cache.has(&"a".to_string()));
    assert_eq!(
        log.lock().unwrap().clone(),
        vec![("a".to_string(), "1".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn delete_then_expiry_deadline_passes_quietly() {
    init_tracing();

    let log: HookLog = Arc::new(Mutex::new(Vec::new()));
    let cache = CacheMap::with_options(CacheOptions::new().with_before_deleted(logged_hook(&log)));

    cache.set_with(
        "a".to_string(),
        "1".to_string(),
        CacheOptions::new().with_time_to_live(Duration::from_millis(50)),
    );
    cache.delete(&"a".to_string());

    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(
        log.lock().unwrap().clone(),
        vec![("a".to_string(), "1".to_string())]
    );
}

#[tokio::test(start_paused = true)]
async fn reinserting_deleted_key_gets_fresh_timer() {
    init_tracing();

    let cache: CacheMap<String, String> = CacheMap::new();

    cache.set_with(
        "a".to_string(),
        "first".to_string(),
        CacheOptions::new().with_time_to_live(Duration::from_millis(50)),
    );
    cache.delete(&"a".to_string());
    cache.set_with(
        "a".to_string(),
        "second".to_string(),
        CacheOptions::new().with_time_to_live(Duration::from_millis(200)),
    );

    // The first insertion's deadline passes; the stale timer must not take
    // down the re-inserted entry.
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert_eq!(cache.get(&"a".to_string()), Some("second".to_string()));

    tokio::time::sleep(Duration::from_millis(150)).await;
    assert!(!cache.has(&"a".to_string()));
}

#[tokio::test(start_paused = true)]
async fn dropping_cache_aborts_timers_without_hooks() {
    init_tracing();

    let log: HookLog = Arc::new(Mutex::new(Vec::new()));
    {
        let cache =
            CacheMap::with_options(CacheOptions::new().with_before_deleted(logged_hook(&log)));
        cache.set_with(
            "a".to_string(),
            "1".to_string(),
            CacheOptions::new().with_time_to_live(Duration::from_millis(50)),
        );
    }

    tokio::time::sleep(Duration::from_millis(200)).await;

    // Dropping the whole cache is not a removal event
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test(start_paused = true)]
async fn clear_cancels_pending_timers() {
    init_tracing();

    let log: HookLog = Arc::new(Mutex::new(Vec::new()));
    let cache = CacheMap::with_options(CacheOptions::new().with_before_deleted(logged_hook(&log)));

    cache.set_with(
        "a".to_string(),
        "1".to_string(),
        CacheOptions::new().with_time_to_live(Duration::from_millis(50)),
    );
    cache.set("b".to_string(), "2".to_string());
    cache.clear();

    tokio::time::sleep(Duration::from_millis(200)).await;

    // Both hooks fired once during clear, oldest first, and the cancelled
    // timer never fired a second time for 'a'.
    assert_eq!(
        log.lock().unwrap().clone(),
        vec![
            ("a".to_string(), "1".to_string()),
            ("b".to_string(), "2".to_string()),
        ]
    );
    assert!(cache.is_empty());
}

#[test]
fn ttl_free_cache_works_without_runtime() {
    init_tracing();

    // No TTL anywhere means no timers, so no runtime is needed.
    let cache = CacheMap::with_options(CacheOptions::new().with_max_size(2));

    cache.set("a".to_string(), "1".to_string());
    cache.set("b".to_string(), "2".to_string());
    cache.set("c".to_string(), "3".to_string());

    assert!(!cache.has(&"a".to_string()));
    assert_eq!(cache.get(&"c".to_string()), Some("3".to_string()));
    assert_eq!(cache.len(), 2);
}
