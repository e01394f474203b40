//! # Taskboard Query Cache
//!
//! Client-side mirror of the board documents, keyed by query
//! (`["boards", id]`, `["lists", id]`).
//!
//! ## Two tiers
//!
//! ```text
//! read(key) ──▶ overlay order (optimistic, per container)
//!                   │ falls through to
//!                   ▼
//!               authoritative entry (last value seen from the store)
//! ```
//!
//! - **Authoritative tier**: the last value fetched from or pushed by the
//!   document store. Only replaced by `insert`/`ingest`, `write`, or
//!   `promote`.
//! - **Overlay**: order arrays staged ahead of the store while a drag is in
//!   progress. `promote` copies written orders into the authoritative tier
//!   once the store accepted them, `discard` drops them, `invalidate` drops
//!   them and marks the entry stale so the next `fetch` reloads it. A staged
//!   order is only cleared by a commit that wrote that exact order.
//!
//! Every mutating call bumps the generation exactly once, so an observer of
//! [`QueryCache::watch`] never sees half of a multi-container update.

mod cache;
mod errors;
mod key;
mod shared;

pub use cache::QueryCache;
pub use errors::CacheError;
pub use key::{Order, QueryKey, QueryValue};
pub use shared::{fetch, lock, prime_board, shared, spawn_sync, SharedCache};
