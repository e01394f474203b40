//! Error types for the query cache

use crate::QueryKey;
use taskboard_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CacheError {
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    #[error("Unexpected value for query {key}: {reason}")]
    Unexpected { key: QueryKey, reason: String },
}
