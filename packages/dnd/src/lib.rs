//! # Taskboard Drag and Drop
//!
//! Drag-and-drop reordering engine for tasks and lists.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ UI: pointer events, overlay rendering       │
//! └─────────────────────────────────────────────┘
//!                     ↓ start / over / end / cancel
//! ┌─────────────────────────────────────────────┐
//! │ DragController: one gesture at a time       │
//! │  Idle → Dragging → Hovering* → Settling     │
//! └─────────────────────────────────────────────┘
//!            ↓ preview                ↓ commit
//! ┌────────────────────────┐ ┌──────────────────────────┐
//! │ Reconciler             │ │ Commit                   │
//! │  order math, staged    │ │  store writes, promote   │
//! │  into cache overlay    │ │  or invalidate           │
//! └────────────────────────┘ └──────────────────────────┘
//!            ↓                            ↓
//!      QueryCache (overlay)        DocumentStore
//! ```
//!
//! ## Core Principles
//!
//! 1. **Preview never writes the store**: hovering only stages orders in the
//!    cache overlay
//! 2. **Commit is the only write**: one commit per gesture, on drop
//! 3. **Failures invalidate, never retry**: a rejected write drops the
//!    optimistic order and marks the query stale
//! 4. **Cancel rolls back**: staged orders of a cancelled gesture are discarded
//!
//! ## Usage
//!
//! ```rust,ignore
//! use taskboard_dnd::{DragConfig, DragController, DragKind};
//!
//! let mut controller = DragController::new("B", store, cache, DragConfig::default());
//! controller.load().await?;
//!
//! controller.start("T1", DragKind::Task).await;
//! controller.over("T1", Some("L2"));
//!
//! // The controller is already idle again; the writes happen when awaited.
//! let commit = controller.end("T1", Some("L2"));
//! commit.run().await?;
//! ```

mod commit;
mod config;
mod errors;
mod item;
mod order;
mod reconciler;
mod sensor;
mod session;

pub use commit::{Commit, CommitReport};
pub use config::{DragConfig, WriteMode};
pub use errors::{DragError, ResolveError, WriteFailure};
pub use item::{ActiveItem, DragItem, DragKind, DragPayload};
pub use order::{array_move, insert_at, without};
pub use reconciler::{PreviewResult, Reconciler};
pub use sensor::{Activation, ActivationSensor, Point};
pub use session::{DragController, DragPhase, StartOutcome};
