use crate::{Collection, Document, Fields, Filter, Record, StoreResult, Subscription};
use async_trait::async_trait;
use futures::future::join_all;

/// A partial update addressed to one document
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentWrite {
    pub collection: Collection,
    pub id: String,
    pub fields: Fields,
}

impl DocumentWrite {
    pub fn new(collection: Collection, id: impl Into<String>, fields: Fields) -> Self {
        Self {
            collection,
            id: id.into(),
            fields,
        }
    }
}

/// Remote document database
///
/// All operations may suspend. Implementations must be shareable across
/// tasks (`Arc<dyn DocumentStore>`).
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// One-shot read of a single document
    async fn fetch_one(&self, collection: Collection, id: &str) -> StoreResult<Document>;

    /// One-shot read of every matching document
    async fn query(&self, collection: Collection, filter: &Filter) -> StoreResult<Vec<Document>>;

    async fn create(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()>;

    /// Merge the named fields into an existing document
    async fn update(&self, collection: Collection, id: &str, fields: Fields) -> StoreResult<()>;

    async fn delete(&self, collection: Collection, id: &str) -> StoreResult<()>;

    /// Apply several updates.
    ///
    /// The default issues every write concurrently and independently: some
    /// may land while others fail, and the first failure is returned. Stores
    /// that support multi-document transactions override this to apply the
    /// batch all-or-nothing.
    async fn update_many(&self, writes: Vec<DocumentWrite>) -> StoreResult<()> {
        let results = join_all(
            writes
                .iter()
                .map(|write| self.update(write.collection, &write.id, write.fields.clone())),
        )
        .await;

        results.into_iter().collect()
    }

    /// Watch every document of `collection` matching `filter`
    fn subscribe(&self, collection: Collection, filter: Filter) -> Subscription;

    /// Watch a single document
    fn subscribe_doc(&self, collection: Collection, id: &str) -> Subscription;
}

/// Fetch and decode a typed record
pub async fn fetch_record<R: Record>(store: &dyn DocumentStore, id: &str) -> StoreResult<R> {
    store.fetch_one(R::COLLECTION, id).await?.decode()
}
