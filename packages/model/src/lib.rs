//! # Taskboard Model
//!
//! Typed records for the task board: boards own an ordered list of lists,
//! lists own an ordered list of tasks.
//!
//! ```text
//! Board { lists: [L1, L2, L3] }
//!   └─ List L1 { tasks: [T1, T2] }
//!        ├─ Task T1
//!        └─ Task T2
//! ```
//!
//! A task never stores its own position. Where a task lives is derived
//! entirely from the one `List::tasks` array that contains it, and the order
//! of lists is derived from `Board::lists`.

mod ids;
mod records;
mod snapshot;

pub use ids::{BoardId, ListId, TaskId, UserId};
pub use records::{Board, Checklist, ChecklistItem, Comment, FileRef, Label, List, Task};
pub use snapshot::{BoardSnapshot, InvariantViolation};
