//! # In-Memory Document Store
//!
//! A local [`DocumentStore`] used by tests, fixtures and the replay CLI.
//!
//! Besides the trait it offers:
//! - **Fault injection**: `fail_updates` makes every update of one document
//!   fail with a chosen error until `clear_faults`
//! - **Write log**: every attempted update, successful or not, in arrival order
//! - **Atomic batches**: `update_many` checks the whole batch before applying
//!   any of it

use crate::{
    Collection, Document, DocumentStore, DocumentWrite, Fields, Filter, Record, StoreError,
    StoreResult, Subscription, SubscriptionEvent,
};
use async_trait::async_trait;
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use taskboard_model::BoardSnapshot;
use tokio::sync::mpsc;
use tracing::{debug, instrument, warn};

/// An update the store received, and whether it landed
#[derive(Debug, Clone, PartialEq)]
pub struct WriteAttempt {
    pub write: DocumentWrite,
    pub succeeded: bool,
}

#[derive(Debug)]
enum Target {
    Collection(Collection, Filter),
    Document(Collection, String),
}

#[derive(Debug)]
struct Subscriber {
    target: Target,
    sender: mpsc::UnboundedSender<SubscriptionEvent>,
}

type Subscribers = Arc<Mutex<HashMap<u64, Subscriber>>>;

#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<HashMap<Collection, BTreeMap<String, Fields>>>,
    subscribers: Subscribers,
    next_subscription: AtomicU64,
    faults: Mutex<HashMap<(Collection, String), StoreError>>,
    write_log: Mutex<Vec<WriteAttempt>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store with a board, its lists and its tasks
    pub fn from_snapshot(snapshot: &BoardSnapshot) -> StoreResult<Self> {
        let store = Self::new();
        store.insert_record(&snapshot.board)?;
        for list in &snapshot.lists {
            store.insert_record(list)?;
        }
        for task in &snapshot.tasks {
            store.insert_record(task)?;
        }
        Ok(store)
    }

    /// Insert or replace a record without notifying or logging
    pub fn insert_record<R: Record>(&self, record: &R) -> StoreResult<()> {
        let doc = Document::from_record(record)?;
        write_lock(&self.collections)
            .entry(doc.collection)
            .or_default()
            .insert(doc.id, doc.fields);
        Ok(())
    }

    /// Current state of a document, bypassing faults
    pub fn get(&self, collection: Collection, id: &str) -> Option<Document> {
        read_lock(&self.collections)
            .get(&collection)
            .and_then(|docs| docs.get(id))
            .map(|fields| Document::new(collection, id, fields.clone()))
    }

    /// Decode the current state of a record, bypassing faults
    pub fn get_record<R: Record>(&self, id: &str) -> StoreResult<R> {
        self.get(R::COLLECTION, id)
            .ok_or_else(|| StoreError::not_found(R::COLLECTION, id))?
            .decode()
    }

    /// Make every update of `collection/id` fail with `error`
    pub fn fail_updates(&self, collection: Collection, id: impl Into<String>, error: StoreError) {
        lock(&self.faults).insert((collection, id.into()), error);
    }

    pub fn clear_faults(&self) {
        lock(&self.faults).clear();
    }

    pub fn write_log(&self) -> Vec<WriteAttempt> {
        lock(&self.write_log).clone()
    }

    pub fn subscriber_count(&self) -> usize {
        lock(&self.subscribers).len()
    }

    fn fault_for(&self, collection: Collection, id: &str) -> Option<StoreError> {
        lock(&self.faults).get(&(collection, id.to_string())).cloned()
    }

    fn log(&self, write: &DocumentWrite, succeeded: bool) {
        lock(&self.write_log).push(WriteAttempt {
            write: write.clone(),
            succeeded,
        });
    }

    fn matching(&self, collection: Collection, filter: &Filter) -> Vec<Document> {
        read_lock(&self.collections)
            .get(&collection)
            .map(|docs| {
                docs.iter()
                    .map(|(id, fields)| Document::new(collection, id.as_str(), fields.clone()))
                    .filter(|doc| filter.matches(doc))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Check a single update against faults and existence without applying it
    fn check_update(&self, write: &DocumentWrite) -> StoreResult<()> {
        if let Some(error) = self.fault_for(write.collection, &write.id) {
            return Err(error);
        }
        let exists = read_lock(&self.collections)
            .get(&write.collection)
            .is_some_and(|docs| docs.contains_key(&write.id));
        if !exists {
            return Err(StoreError::not_found(write.collection, write.id.clone()));
        }
        Ok(())
    }

    fn apply_update(&self, write: &DocumentWrite) -> StoreResult<()> {
        {
            let mut collections = write_lock(&self.collections);
            let fields = collections
                .get_mut(&write.collection)
                .and_then(|docs| docs.get_mut(&write.id))
                .ok_or_else(|| StoreError::not_found(write.collection, write.id.clone()))?;
            for (name, value) in &write.fields {
                fields.insert(name.clone(), value.clone());
            }
        }
        self.notify(write.collection, &write.id);
        Ok(())
    }

    /// Push the new state to every subscriber watching `collection/id`
    fn notify(&self, collection: Collection, id: &str) {
        let doc = self.get(collection, id);
        let mut subscribers = lock(&self.subscribers);
        let mut closed = Vec::new();

        for (sub_id, subscriber) in subscribers.iter() {
            let event = match &subscriber.target {
                Target::Document(c, watched) if *c == collection && watched == id => {
                    SubscriptionEvent::Document(doc.clone())
                }
                Target::Collection(c, filter) if *c == collection => {
                    SubscriptionEvent::Collection(self.matching(collection, filter))
                }
                _ => continue,
            };
            if subscriber.sender.send(event).is_err() {
                closed.push(*sub_id);
            }
        }

        for sub_id in closed {
            subscribers.remove(&sub_id);
        }
    }

    fn register(&self, target: Target, initial: SubscriptionEvent) -> Subscription {
        let id = self.next_subscription.fetch_add(1, Ordering::Relaxed);
        let (sender, receiver) = mpsc::unbounded_channel();
        // The receiver is alive, so the initial push cannot fail.
        let _ = sender.send(initial);

        lock(&self.subscribers).insert(id, Subscriber { target, sender });

        let registry = Arc::downgrade(&self.subscribers);
        Subscription::new(id, receiver, move || {
            if let Some(registry) = registry.upgrade() {
                lock(&registry).remove(&id);
            }
        })
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    #[instrument(skip(self))]
    async fn fetch_one(&self, collection: Collection, id: &str) -> StoreResult<Document> {
        tokio::task::yield_now().await;
        self.get(collection, id)
            .ok_or_else(|| StoreError::not_found(collection, id))
    }

    async fn query(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>> {
        tokio::task::yield_now().await;
        Ok(self.matching(collection, filter))
    }

    #[instrument(skip(self, fields))]
    async fn create(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()> {
        tokio::task::yield_now().await;
        {
            let mut collections = write_lock(&self.collections);
            let docs = collections.entry(collection).or_default();
            if docs.contains_key(id) {
                return Err(StoreError::AlreadyExists {
                    collection,
                    id: id.to_string(),
                });
            }
            docs.insert(id.to_string(), fields);
        }
        self.notify(collection, id);
        Ok(())
    }

    #[instrument(skip(self, fields))]
    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()> {
        tokio::task::yield_now().await;
        let write = DocumentWrite::new(collection, id, fields);

        let result = self
            .check_update(&write)
            .and_then(|()| self.apply_update(&write));
        match &result {
            Ok(()) => debug!(%collection, id, "Document updated"),
            Err(error) => warn!(%collection, id, %error, "Document update failed"),
        }
        self.log(&write, result.is_ok());
        result
    }

    #[instrument(skip(self))]
    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()> {
        tokio::task::yield_now().await;
        let removed = write_lock(&self.collections)
            .get_mut(&collection)
            .and_then(|docs| docs.remove(id));
        if removed.is_none() {
            return Err(StoreError::not_found(collection, id));
        }
        self.notify(collection, id);
        Ok(())
    }

    /// All-or-nothing: nothing is applied unless every write would succeed
    #[instrument(skip(self, writes), fields(writes = writes.len()))]
    async fn update_many(&self, writes: Vec<DocumentWrite>) -> StoreResult<()> {
        tokio::task::yield_now().await;

        if let Some(error) = writes.iter().find_map(|write| self.check_update(write).err()) {
            warn!(%error, "Batch rejected, no document updated");
            for write in &writes {
                self.log(write, false);
            }
            return Err(StoreError::Aborted(error.to_string()));
        }

        for write in &writes {
            self.apply_update(write)?;
            self.log(write, true);
        }
        debug!("Batch applied");
        Ok(())
    }

    fn subscribe(&self, collection: Collection, filter: Filter) -> Subscription {
        let initial = SubscriptionEvent::Collection(self.matching(collection, &filter));
        self.register(Target::Collection(collection, filter), initial)
    }

    fn subscribe_doc(&self, collection: Collection, id: &str) -> Subscription {
        let initial = SubscriptionEvent::Document(self.get(collection, id));
        self.register(Target::Document(collection, id.to_string()), initial)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read_lock<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write_lock<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_model::{Board, List};

    fn store() -> InMemoryDocumentStore {
        let board = Board::new("B", "Roadmap", "u1").with_lists(["L1"]);
        let snapshot = BoardSnapshot::new(board, vec![List::new("L1", "Todo", "B")]);
        InMemoryDocumentStore::from_snapshot(&snapshot).unwrap()
    }

    #[test]
    fn test_seeded_records_are_readable() {
        let store = store();
        let list: List = store.get_record("L1").unwrap();
        assert_eq!(list.title, "Todo");
        assert!(store.get(Collection::Tasks, "T1").is_none());
    }

    #[test]
    fn test_dropping_subscription_unregisters_it() {
        let store = store();
        let sub = store.subscribe_doc(Collection::Lists, "L1");
        assert_eq!(store.subscriber_count(), 1);

        drop(sub);
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn test_faults_are_recorded_and_cleared() {
        let store = store();
        store.fail_updates(Collection::Lists, "L1", StoreError::Network("offline".into()));
        assert!(store.fault_for(Collection::Lists, "L1").is_some());

        store.clear_faults();
        assert!(store.fault_for(Collection::Lists, "L1").is_none());
    }
}
