//! Error types for drag and drop

use crate::DragKind;
use taskboard_cache::{CacheError, QueryKey};
use taskboard_model::BoardId;
use taskboard_store::StoreError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DragError {
    #[error("Commit failed: {} of {attempted} writes rejected", .failures.len())]
    Write {
        failures: Vec<WriteFailure>,
        attempted: usize,
        /// Queries dropped back to store truth
        invalidated: Vec<QueryKey>,
    },

    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

/// One container whose order could not be persisted
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Persisting {key} failed: {error}")]
pub struct WriteFailure {
    pub key: QueryKey,
    pub error: StoreError,
}

/// Why a drag could not start
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ResolveError {
    #[error("Drag item could not be fetched: {0}")]
    Store(#[from] StoreError),

    #[error("Board could not be refreshed: {0}")]
    Refresh(#[from] CacheError),

    #[error("{kind} {id} is not on board {board}")]
    NotOnBoard {
        kind: DragKind,
        id: String,
        board: BoardId,
    },
}
