use crate::{DragError, WriteFailure, WriteMode};
use futures::future::join_all;
use std::fmt;
use std::sync::Arc;
use taskboard_cache::{lock, Order, QueryKey, SharedCache};
use taskboard_store::DocumentStore;
use tracing::{info, instrument, warn};

/// What a successful commit persisted
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommitReport {
    pub writes: Vec<Order>,
}

/// The persistence step of one drop.
///
/// Returned by [`crate::DragController::end`] after the controller is back
/// to idle; nothing is written until [`Commit::run`] is awaited.
pub struct Commit {
    store: Arc<dyn DocumentStore>,
    cache: SharedCache,
    orders: Vec<Order>,
    mode: WriteMode,
}

impl Commit {
    pub(crate) fn new(
        store: Arc<dyn DocumentStore>,
        cache: SharedCache,
        orders: Vec<Order>,
        mode: WriteMode,
    ) -> Self {
        Self {
            store,
            cache,
            orders,
            mode,
        }
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }

    pub fn mode(&self) -> WriteMode {
        self.mode
    }

    /// Persist the staged orders.
    ///
    /// On success the written orders are promoted into the authoritative
    /// cache tier. On any failure every container of this commit is
    /// invalidated and the failures are returned; nothing is retried. In both
    /// cases a preview staged by a later gesture on the same container stays.
    #[instrument(name = "commit", skip(self))]
    pub async fn run(self) -> Result<CommitReport, DragError> {
        if self.orders.is_empty() {
            return Ok(CommitReport::default());
        }

        let keys: Vec<QueryKey> = self.orders.iter().map(Order::key).collect();
        let failures = match self.mode {
            WriteMode::Concurrent => self.write_concurrently().await,
            WriteMode::Atomic => self.write_atomically().await,
        };

        if failures.is_empty() {
            lock(&self.cache).promote(&self.orders);
            info!(containers = keys.len(), mode = ?self.mode, "Reorder committed");
            return Ok(CommitReport {
                writes: self.orders,
            });
        }

        lock(&self.cache).invalidate_written(&self.orders);
        for failure in &failures {
            warn!(key = %failure.key, error = %failure.error, "Reorder write failed");
        }

        Err(DragError::Write {
            failures,
            attempted: keys.len(),
            invalidated: keys,
        })
    }

    async fn write_concurrently(&self) -> Vec<WriteFailure> {
        let writes = self.orders.iter().map(|order| {
            let write = order.to_write();
            let store = Arc::clone(&self.store);
            async move {
                store
                    .update(write.collection, &write.id, write.fields)
                    .await
                    .map_err(|error| WriteFailure {
                        key: order.key(),
                        error,
                    })
            }
        });

        join_all(writes)
            .await
            .into_iter()
            .filter_map(Result::err)
            .collect()
    }

    async fn write_atomically(&self) -> Vec<WriteFailure> {
        let writes = self.orders.iter().map(Order::to_write).collect();
        match self.store.update_many(writes).await {
            Ok(()) => Vec::new(),
            Err(error) => self
                .orders
                .iter()
                .map(|order| WriteFailure {
                    key: order.key(),
                    error: error.clone(),
                })
                .collect(),
        }
    }
}

impl fmt::Debug for Commit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Commit")
            .field("orders", &self.orders)
            .field("mode", &self.mode)
            .finish_non_exhaustive()
    }
}
