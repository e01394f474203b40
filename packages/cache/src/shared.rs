//! Sharing one cache between the drag controller, in-flight commits and
//! subscription feeds.
//!
//! The mutex is only ever held for synchronous reads and writes, never
//! across an `.await`.

use crate::{CacheError, QueryCache, QueryKey, QueryValue};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use taskboard_model::Board;
use taskboard_store::{DocumentStore, Subscription};
use tokio::task::JoinHandle;
use tracing::{debug, warn};

pub type SharedCache = Arc<Mutex<QueryCache>>;

pub fn shared(cache: QueryCache) -> SharedCache {
    Arc::new(Mutex::new(cache))
}

pub fn lock(cache: &SharedCache) -> MutexGuard<'_, QueryCache> {
    cache.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Read a query, refetching it from the store when it is missing or stale
pub async fn fetch(
    cache: &SharedCache,
    store: &dyn DocumentStore,
    key: &QueryKey,
) -> Result<QueryValue, CacheError> {
    {
        let cache = lock(cache);
        if !cache.is_stale(key) {
            if let Some(value) = cache.read(key) {
                return Ok(value);
            }
        }
    }

    debug!(%key, "Fetching query from store");
    let doc = store.fetch_one(key.collection(), key.id()).await?;
    let value = QueryValue::decode(&doc)?;

    let mut cache = lock(cache);
    cache.insert(value.clone());
    Ok(cache.read(key).unwrap_or(value))
}

/// Load a board and every list it references
pub async fn prime_board(
    cache: &SharedCache,
    store: &dyn DocumentStore,
    board_id: &str,
) -> Result<Board, CacheError> {
    let key = QueryKey::board(board_id);
    let board = fetch(cache, store, &key)
        .await?
        .into_board()
        .ok_or_else(|| CacheError::Unexpected {
            key: key.clone(),
            reason: "value is not a board".to_string(),
        })?;

    for list_id in &board.lists {
        fetch(cache, store, &QueryKey::List(list_id.clone())).await?;
    }

    debug!(board_id, lists = board.lists.len(), "Board primed");
    Ok(board)
}

/// Feed every change pushed by `subscription` into the authoritative tier.
///
/// Staged orders are left alone, so a push that lands mid-drag does not
/// clobber the preview.
pub fn spawn_sync(cache: SharedCache, mut subscription: Subscription) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(event) = subscription.recv().await {
            let mut guard = lock(&cache);
            for doc in event.documents() {
                if let Err(error) = guard.ingest(doc) {
                    warn!(collection = %doc.collection, id = %doc.id, %error, "Ignoring undecodable push");
                }
            }
        }
        debug!("Subscription closed, cache sync stopped");
    })
}
