//! Fetching, refetching after invalidation, and subscription sync

use serde_json::json;
use std::time::Duration;
use taskboard_cache::{fetch, lock, prime_board, shared, spawn_sync, QueryCache, QueryKey};
use taskboard_model::{Board, BoardSnapshot, List};
use taskboard_store::{Collection, DocumentStore, Fields, Filter, InMemoryDocumentStore};

fn store() -> InMemoryDocumentStore {
    let board = Board::new("B", "Roadmap", "u1").with_lists(["L1", "L2"]);
    let snapshot = BoardSnapshot::new(
        board,
        vec![
            List::new("L1", "Todo", "B").with_tasks(["T1", "T2"]),
            List::new("L2", "Done", "B"),
        ],
    );
    InMemoryDocumentStore::from_snapshot(&snapshot).unwrap()
}

fn tasks_field(ids: &[&str]) -> Fields {
    let mut fields = Fields::new();
    fields.insert("tasks".to_string(), json!(ids));
    fields
}

#[tokio::test]
async fn test_prime_board_loads_board_and_lists() {
    let store = store();
    let cache = shared(QueryCache::new());

    let board = prime_board(&cache, &store, "B").await.unwrap();

    assert_eq!(board.lists, vec!["L1", "L2"]);
    let cache = lock(&cache);
    assert!(cache.contains(&QueryKey::list("L1")));
    assert!(cache.contains(&QueryKey::list("L2")));
}

#[tokio::test]
async fn test_fresh_entry_is_served_from_cache() {
    let store = store();
    let cache = shared(QueryCache::new());
    prime_board(&cache, &store, "B").await.unwrap();

    store
        .update(Collection::Lists, "L1", tasks_field(&["T2"]))
        .await
        .unwrap();

    // Not invalidated: the cached value is still trusted.
    let value = fetch(&cache, &store, &QueryKey::list("L1")).await.unwrap();
    assert_eq!(value.into_list().unwrap().tasks, vec!["T1", "T2"]);
}

#[tokio::test]
async fn test_invalidated_entry_is_refetched() {
    let store = store();
    let cache = shared(QueryCache::new());
    prime_board(&cache, &store, "B").await.unwrap();

    store
        .update(Collection::Lists, "L1", tasks_field(&["T2"]))
        .await
        .unwrap();
    lock(&cache).invalidate(&QueryKey::list("L1"));

    let value = fetch(&cache, &store, &QueryKey::list("L1")).await.unwrap();
    assert_eq!(value.into_list().unwrap().tasks, vec!["T2"]);
    assert!(!lock(&cache).is_stale(&QueryKey::list("L1")));
}

#[tokio::test]
async fn test_fetch_of_missing_document_fails() {
    let store = store();
    let cache = shared(QueryCache::new());

    let result = fetch(&cache, &store, &QueryKey::list("L9")).await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_sync_ingests_pushed_documents() {
    let store = store();
    let cache = shared(QueryCache::new());
    let mut changes = lock(&cache).watch();

    let subscription = store.subscribe(Collection::Lists, Filter::field_equals("boardId", "B"));
    let handle = spawn_sync(cache.clone(), subscription);

    // Initial push
    tokio::time::timeout(Duration::from_secs(1), changes.changed())
        .await
        .unwrap()
        .unwrap();
    assert!(lock(&cache).read_list("L1").is_some());

    store
        .update(Collection::Lists, "L2", tasks_field(&["T1"]))
        .await
        .unwrap();

    tokio::time::timeout(Duration::from_secs(1), async {
        loop {
            if lock(&cache).read_list("L2").map(|list| list.tasks.len()) == Some(1) {
                break;
            }
            tokio::task::yield_now().await;
        }
    })
    .await
    .unwrap();

    handle.abort();
}
