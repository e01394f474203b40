use crate::{CacheError, Order, QueryKey, QueryValue};
use std::collections::HashMap;
use taskboard_model::{Board, List};
use taskboard_store::{Collection, Document};
use tokio::sync::watch;
use tracing::debug;

#[derive(Debug)]
struct Entry {
    value: QueryValue,
    stale: bool,
}

/// Keyed cache with an optimistic overlay of container orders
#[derive(Debug)]
pub struct QueryCache {
    entries: HashMap<QueryKey, Entry>,

    /// Orders staged ahead of the store, keyed by container
    overlay: HashMap<QueryKey, Order>,

    generation: u64,
    changes: watch::Sender<u64>,
}

impl QueryCache {
    pub fn new() -> Self {
        let (changes, _) = watch::channel(0);
        Self {
            entries: HashMap::new(),
            overlay: HashMap::new(),
            generation: 0,
            changes,
        }
    }

    /// Store an authoritative value (fresh from the document store)
    pub fn insert(&mut self, value: QueryValue) {
        self.entries.insert(
            value.key(),
            Entry {
                value,
                stale: false,
            },
        );
        self.bump();
    }

    /// Store a pushed document. Task documents are not cached as queries and are skipped.
    pub fn ingest(&mut self, doc: &Document) -> Result<(), CacheError> {
        if doc.collection == Collection::Tasks {
            return Ok(());
        }
        let value = QueryValue::decode(doc)?;
        self.insert(value);
        Ok(())
    }

    /// Current value with any staged order applied
    pub fn read(&self, key: &QueryKey) -> Option<QueryValue> {
        let mut value = self.entries.get(key)?.value.clone();
        if let Some(order) = self.overlay.get(key) {
            value.apply(order);
        }
        Some(value)
    }

    pub fn read_board(&self, id: &str) -> Option<Board> {
        self.read(&QueryKey::board(id))?.into_board()
    }

    pub fn read_list(&self, id: &str) -> Option<List> {
        self.read(&QueryKey::list(id))?.into_list()
    }

    pub fn contains(&self, key: &QueryKey) -> bool {
        self.entries.contains_key(key)
    }

    /// Whether the entry must be refetched before it is trusted again
    pub fn is_stale(&self, key: &QueryKey) -> bool {
        self.entries.get(key).map_or(true, |entry| entry.stale)
    }

    /// Mutate an authoritative value in place. Returns `false` if the key is not cached.
    pub fn write<F>(&mut self, key: &QueryKey, update: F) -> bool
    where
        F: FnOnce(&mut QueryValue),
    {
        let Some(entry) = self.entries.get_mut(key) else {
            return false;
        };
        update(&mut entry.value);
        self.bump();
        true
    }

    /// Stage any number of container orders as one mutation
    pub fn stage(&mut self, orders: impl IntoIterator<Item = Order>) -> Vec<QueryKey> {
        let mut staged = Vec::new();
        for order in orders {
            let key = order.key();
            self.overlay.insert(key.clone(), order);
            staged.push(key);
        }
        if !staged.is_empty() {
            self.bump();
        }
        staged
    }

    pub fn staged_order(&self, key: &QueryKey) -> Option<&Order> {
        self.overlay.get(key)
    }

    pub fn is_staged(&self, key: &QueryKey) -> bool {
        self.overlay.contains_key(key)
    }

    /// Order held by the authoritative tier, ignoring the overlay
    pub fn committed_order(&self, key: &QueryKey) -> Option<Order> {
        self.entries.get(key).map(|entry| entry.value.order())
    }

    /// Drop staged orders; reads fall back to the authoritative tier
    pub fn discard(&mut self, keys: &[QueryKey]) -> usize {
        let removed = keys
            .iter()
            .filter(|key| self.overlay.remove(*key).is_some())
            .count();
        if removed > 0 {
            debug!(removed, "Discarded staged orders");
            self.bump();
        }
        removed
    }

    /// Apply orders the store accepted to the authoritative tier.
    ///
    /// A staged order is only cleared when it is still the one that was
    /// written; a newer gesture staged on the same container keeps its preview.
    pub fn promote(&mut self, written: &[Order]) {
        for order in written {
            let key = order.key();
            if let Some(entry) = self.entries.get_mut(&key) {
                entry.value.apply(order);
            }
            if self.overlay.get(&key) == Some(order) {
                self.overlay.remove(&key);
            }
        }
        if !written.is_empty() {
            debug!(promoted = written.len(), "Promoted written orders");
            self.bump();
        }
    }

    /// Drop any staged order and mark the entry stale
    pub fn invalidate(&mut self, key: &QueryKey) {
        self.overlay.remove(key);
        if let Some(entry) = self.entries.get_mut(key) {
            entry.stale = true;
        }
        debug!(%key, "Invalidated query");
        self.bump();
    }

    /// Mark the containers of rejected orders stale.
    ///
    /// Like [`QueryCache::promote`], a staged order that has moved on since
    /// the write was issued is kept.
    pub fn invalidate_written(&mut self, written: &[Order]) {
        for order in written {
            let key = order.key();
            if self.overlay.get(&key) == Some(order) {
                self.overlay.remove(&key);
            }
            if let Some(entry) = self.entries.get_mut(&key) {
                entry.stale = true;
            }
            debug!(%key, "Invalidated query");
        }
        if !written.is_empty() {
            self.bump();
        }
    }

    /// Incremented once per mutation
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Receives the generation after every mutation
    pub fn watch(&self) -> watch::Receiver<u64> {
        self.changes.subscribe()
    }

    fn bump(&mut self) {
        self.generation += 1;
        self.changes.send_replace(self.generation);
    }
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskboard_model::{ListId, TaskId};

    fn cache() -> QueryCache {
        let mut cache = QueryCache::new();
        cache.insert(QueryValue::List(
            List::new("L1", "Todo", "B").with_tasks(["T1", "T2"]),
        ));
        cache.insert(QueryValue::List(List::new("L2", "Done", "B")));
        cache
    }

    fn tasks(list: &str, tasks: &[&str]) -> Order {
        Order::Tasks {
            list: ListId::new(list),
            tasks: tasks.iter().map(|id| TaskId::new(*id)).collect(),
        }
    }

    #[test]
    fn test_read_applies_overlay() {
        let mut cache = cache();
        cache.stage([tasks("L1", &["T2", "T1"])]);

        assert_eq!(cache.read_list("L1").unwrap().tasks, vec!["T2", "T1"]);
        assert_eq!(
            cache.committed_order(&QueryKey::list("L1")),
            Some(tasks("L1", &["T1", "T2"]))
        );
    }

    #[test]
    fn test_stage_bumps_generation_once_for_many_containers() {
        let mut cache = cache();
        let before = cache.generation();

        let staged = cache.stage([tasks("L1", &["T2"]), tasks("L2", &["T1"])]);

        assert_eq!(staged.len(), 2);
        assert_eq!(cache.generation(), before + 1);
        let changes = cache.watch();
        assert_eq!(*changes.borrow(), before + 1);
    }

    #[test]
    fn test_discard_restores_authoritative_order() {
        let mut cache = cache();
        cache.stage([tasks("L1", &["T2"])]);

        assert_eq!(cache.discard(&[QueryKey::list("L1")]), 1);
        assert_eq!(cache.read_list("L1").unwrap().tasks, vec!["T1", "T2"]);
        assert_eq!(cache.discard(&[QueryKey::list("L1")]), 0);
    }

    #[test]
    fn test_promote_moves_overlay_into_entries() {
        let mut cache = cache();
        cache.stage([tasks("L1", &["T2"])]);
        cache.promote(&[tasks("L1", &["T2"])]);

        assert!(!cache.is_staged(&QueryKey::list("L1")));
        assert_eq!(
            cache.committed_order(&QueryKey::list("L1")),
            Some(tasks("L1", &["T2"]))
        );
    }

    #[test]
    fn test_promote_keeps_newer_staged_order() {
        let mut cache = cache();
        cache.stage([tasks("L1", &["T2"])]);
        // A later gesture restages the container before the first write lands
        cache.stage([tasks("L1", &["T2", "T3"])]);

        cache.promote(&[tasks("L1", &["T2"])]);

        assert_eq!(
            cache.committed_order(&QueryKey::list("L1")),
            Some(tasks("L1", &["T2"]))
        );
        assert_eq!(
            cache.staged_order(&QueryKey::list("L1")),
            Some(&tasks("L1", &["T2", "T3"]))
        );
        assert_eq!(cache.read_list("L1").unwrap().tasks, vec!["T2", "T3"]);
    }

    #[test]
    fn test_invalidate_written_keeps_newer_staged_order() {
        let mut cache = cache();
        cache.stage([tasks("L1", &["T2"]), tasks("L2", &["T1"])]);
        cache.stage([tasks("L2", &["T1", "T3"])]);

        cache.invalidate_written(&[tasks("L1", &["T2"]), tasks("L2", &["T1"])]);

        assert!(cache.is_stale(&QueryKey::list("L1")));
        assert!(cache.is_stale(&QueryKey::list("L2")));
        assert!(!cache.is_staged(&QueryKey::list("L1")));
        assert!(cache.is_staged(&QueryKey::list("L2")));
        assert_eq!(cache.read_list("L1").unwrap().tasks, vec!["T1", "T2"]);
    }

    #[test]
    fn test_invalidate_drops_overlay_and_marks_stale() {
        let mut cache = cache();
        cache.stage([tasks("L1", &["T2"])]);
        cache.invalidate(&QueryKey::list("L1"));

        assert!(cache.is_stale(&QueryKey::list("L1")));
        assert!(!cache.is_stale(&QueryKey::list("L2")));
        assert_eq!(cache.read_list("L1").unwrap().tasks, vec!["T1", "T2"]);
    }

    #[test]
    fn test_missing_entries_are_stale() {
        let cache = QueryCache::new();
        assert!(cache.is_stale(&QueryKey::board("B")));
        assert!(cache.read_board("B").is_none());
    }

    #[test]
    fn test_write_mutates_authoritative_value() {
        let mut cache = cache();
        let written = cache.write(&QueryKey::list("L2"), |value| {
            if let QueryValue::List(list) = value {
                list.title = "Shipped".to_string();
            }
        });

        assert!(written);
        assert_eq!(cache.read_list("L2").unwrap().title, "Shipped");
        assert!(!cache.write(&QueryKey::list("L9"), |_| {}));
    }
}
