//! # Taskboard Store
//!
//! The document store the board reads and writes: documents addressed by
//! collection + id, partial field updates, and live subscriptions.
//!
//! ```text
//! ┌─────────────────────────────┐
//! │ DocumentStore (trait)       │  fetch_one / query / create / update /
//! │                             │  delete / update_many / subscribe
//! └─────────────────────────────┘
//!               ↑
//! ┌─────────────────────────────┐
//! │ InMemoryDocumentStore       │  local implementation with fault
//! │                             │  injection and a write log
//! └─────────────────────────────┘
//! ```
//!
//! Writes overwrite the named fields only. There are no multi-document
//! transactions in the trait contract: `update_many` defaults to independent
//! concurrent writes, and only stores that can apply a batch atomically
//! override it.

mod document;
mod errors;
mod filter;
mod memory;
mod store;
mod subscription;

pub use document::{Collection, Document, Fields, Record};
pub use errors::{StoreError, StoreResult};
pub use filter::Filter;
pub use memory::{InMemoryDocumentStore, WriteAttempt};
pub use store::{fetch_record, DocumentStore, DocumentWrite};
pub use subscription::{Subscription, SubscriptionEvent};
