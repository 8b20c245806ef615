//! Integration tests for store -> bridge -> filter synchronization.

use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

#[cfg(feature = "async")]
use sensitive_word_r::AsyncBridge;
use sensitive_word_r::{
    AcFilter, Bridge, FeedPolicy, Filter, FilterKind, MemoryStore, SensitiveFilter,
    Store, StoreOptions, TrieFilter,
};

const DEADLINE: Duration = Duration::from_secs(5);

/// Poll until `cond` holds; listeners apply events asynchronously.
fn wait_until(mut cond: impl FnMut() -> bool) -> bool {
    let start = Instant::now();
    while start.elapsed() < DEADLINE {
        if cond() {
            return true;
        }
        thread::sleep(Duration::from_millis(5));
    }
    cond()
}

#[test]
fn test_bridge_applies_adds_and_removes() {
    for kind in [FilterKind::Trie, FilterKind::AhoCorasick] {
        let store = MemoryStore::new();
        let filter = Arc::new(SensitiveFilter::new(kind));
        let bridge = Bridge::spawn(&store, Arc::clone(&filter)).unwrap();

        store.add_words(["测试1", "测试2", "成小王"]).unwrap();
        assert!(wait_until(|| filter.len() == 3), "{:?}", kind);
        assert!(filter.is_sensitive("成小王微笑着"));

        store.del_word("成小王").unwrap();
        assert!(wait_until(|| !filter.is_sensitive("成小王微笑着")), "{:?}", kind);
        assert_eq!(filter.len(), 2);

        drop(store);
        bridge.join();
    }
}

#[test]
fn test_bridge_seeds_existing_vocabulary() {
    let store = MemoryStore::new();
    store.add_words(["武汉海鲜市场", "武汉"]).unwrap();

    let filter = Arc::new(AcFilter::new());
    let bridge = Bridge::spawn(&store, Arc::clone(&filter)).unwrap();
    // seeding is synchronous
    assert_eq!(filter.len(), 2);

    store.del_words(["武汉海鲜市场", "武汉"]).unwrap();
    assert!(wait_until(|| filter.is_empty()));
    assert!(!filter.is_sensitive("武汉海鲜市场"));

    drop(store);
    bridge.join();
}

#[test]
fn test_bridge_with_small_blocking_feed() {
    let store = MemoryStore::with_options(
        StoreOptions::new()
            .with_capacity(2)
            .with_policy(FeedPolicy::Block),
    )
    .unwrap();
    let filter = Arc::new(TrieFilter::new());
    let bridge = Bridge::spawn(&store, Arc::clone(&filter)).unwrap();

    let words: Vec<String> = (0..100).map(|i| format!("w{:03}", i)).collect();
    store.add_words(&words).unwrap();
    assert!(wait_until(|| filter.len() == 100));

    drop(store);
    bridge.join();
}

#[test]
fn test_queries_during_updates() {
    let store = Arc::new(MemoryStore::new());
    let filter = Arc::new(AcFilter::new());
    let bridge = Bridge::spawn(store.as_ref(), Arc::clone(&filter)).unwrap();

    let writer = {
        let store = Arc::clone(&store);
        thread::spawn(move || {
            for i in 0..200 {
                store.add_word(&format!("bad{}", i)).unwrap();
            }
        })
    };
    let reader = {
        let filter = Arc::clone(&filter);
        thread::spawn(move || {
            for _ in 0..500 {
                let text = filter.replace("xx bad1 yy", '*');
                assert_eq!(text.chars().count(), 10);
            }
        })
    };

    writer.join().unwrap();
    reader.join().unwrap();
    assert!(wait_until(|| filter.len() == 200));
    assert_eq!(filter.replace("xx bad1 yy", '*'), "xx **** yy");

    drop(store);
    bridge.join();
}

#[test]
fn test_bridge_on_trait_object_store() {
    let store: Box<dyn Store> = Box::new(MemoryStore::new());
    let filter = Arc::new(TrieFilter::new());
    let bridge = Bridge::spawn(store.as_ref(), Arc::clone(&filter)).unwrap();

    store.add_word("gunpowder").unwrap();
    assert!(wait_until(|| filter.is_sensitive("a gunpowder keg")));

    drop(store);
    bridge.join();
}

#[cfg(feature = "async")]
#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_async_bridge() {
    let store = MemoryStore::new();
    store.add_word("seed").unwrap();

    let filter = Arc::new(AcFilter::new());
    let bridge = AsyncBridge::spawn(&store, Arc::clone(&filter)).unwrap();
    assert!(filter.is_sensitive("seed"));

    store.add_word("abc").unwrap();
    let start = Instant::now();
    while !filter.is_sensitive("xxabcxx") && start.elapsed() < DEADLINE {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    assert_eq!(filter.replace("xxabcxx", '*'), "xx***xx");

    drop(store);
    bridge.join().await;
}
