use std::sync::Arc;
use tokio::time::Duration;

use dl_core::services::verification::CodeStoreTrait;

use crate::memory::InMemoryCodeStore;

#[tokio::test]
async fn test_put_if_absent_keeps_first_value() {
    let store = InMemoryCodeStore::new();

    assert!(store.put_if_absent("k", "first", 60).await.unwrap());
    assert!(!store.put_if_absent("k", "second", 60).await.unwrap());
    assert_eq!(store.get("k").await.unwrap(), Some("first".to_string()));
    assert_eq!(store.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_entries_expire() {
    let store = InMemoryCodeStore::new();
    store.put_if_absent("k", "v", 180).await.unwrap();

    tokio::time::advance(Duration::from_secs(179)).await;
    assert!(store.get("k").await.unwrap().is_some());

    tokio::time::advance(Duration::from_secs(1)).await;
    assert_eq!(store.get("k").await.unwrap(), None);
    assert!(store.put_if_absent("k", "again", 180).await.unwrap());
}

#[tokio::test(start_paused = true)]
async fn test_writes_purge_expired_entries() {
    let store = InMemoryCodeStore::new();
    for i in 0..10 {
        store.put_if_absent(&format!("old-{}", i), "v", 60).await.unwrap();
    }
    assert_eq!(store.stored(), 10);

    tokio::time::advance(Duration::from_secs(61)).await;
    store.put_if_absent("fresh", "v", 60).await.unwrap();

    assert_eq!(store.stored(), 1);
    assert_eq!(store.len(), 1);
}

#[tokio::test]
async fn test_out_of_range_ttl_is_an_error() {
    let store = InMemoryCodeStore::new();

    assert!(store.put_if_absent("k", "v", u64::MAX).await.is_err());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_delete_if_equals() {
    let store = InMemoryCodeStore::new();
    store.put_if_absent("k", "v", 60).await.unwrap();

    assert!(!store.delete_if_equals("k", "other").await.unwrap());
    assert!(store.delete_if_equals("k", "v").await.unwrap());
    assert!(!store.delete_if_equals("k", "v").await.unwrap());
    assert!(store.is_empty());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_delete_if_equals_single_winner() {
    let store = Arc::new(InMemoryCodeStore::new());
    store.put_if_absent("k", "v", 60).await.unwrap();

    let handles: Vec<_> = (0..32)
        .map(|_| {
            let store = Arc::clone(&store);
            tokio::spawn(async move { store.delete_if_equals("k", "v").await.unwrap() })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        if handle.await.unwrap() {
            winners += 1;
        }
    }
    assert_eq!(winners, 1);
}
