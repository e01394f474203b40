//! # Reorder Reconciler
//!
//! Computes new container orders for a hover and stages them in the cache
//! overlay. Nothing here touches the document store; see [`crate::Commit`]
//! for persistence.
//!
//! Lists are reordered within the board's `lists`. Tasks are reordered
//! within one list's `tasks`, or moved between two lists, in which case both
//! orders are staged together so no reader sees the task in both lists or
//! in neither.

use crate::order::{array_move, insert_at, without};
use crate::{DragItem, DragKind};
use taskboard_cache::{Order, QueryCache, QueryKey};
use taskboard_model::{BoardId, List, TaskId};
use tracing::debug;

/// Outcome of one preview step
#[derive(Debug, Clone, PartialEq)]
pub enum PreviewResult {
    /// Orders were staged for these containers
    Applied { keys: Vec<QueryKey> },
    /// Nothing changed
    Noop { reason: &'static str },
}

impl PreviewResult {
    pub fn is_applied(&self) -> bool {
        matches!(self, PreviewResult::Applied { .. })
    }

    fn noop(reason: &'static str) -> Self {
        debug!(reason, "Preview skipped");
        PreviewResult::Noop { reason }
    }
}

#[derive(Debug, Clone)]
pub struct Reconciler {
    board_id: BoardId,
}

impl Reconciler {
    pub fn new(board_id: impl Into<BoardId>) -> Self {
        Self {
            board_id: board_id.into(),
        }
    }

    pub fn board_id(&self) -> &BoardId {
        &self.board_id
    }

    /// Stage the order change for `active` hovering `over`
    pub fn preview(
        &self,
        cache: &mut QueryCache,
        kind: DragKind,
        active: &str,
        over: &str,
    ) -> PreviewResult {
        if active == over {
            return PreviewResult::noop("hovering itself");
        }
        match kind {
            DragKind::List => self.preview_list(cache, active, over),
            DragKind::Task => self.preview_task(cache, active, over),
        }
    }

    fn preview_list(&self, cache: &mut QueryCache, active: &str, over: &str) -> PreviewResult {
        let Some(board) = cache.read_board(self.board_id.as_str()) else {
            return PreviewResult::noop("board not cached");
        };
        let (Some(from), Some(to)) = (board.index_of(active), board.index_of(over)) else {
            return PreviewResult::noop("list not on board");
        };
        if from == to {
            return PreviewResult::noop("already at target");
        }

        let lists = array_move(board.lists, from, to);
        let keys = cache.stage([Order::Lists {
            board: self.board_id.clone(),
            lists,
        }]);
        debug!(list_id = active, from, to, "Staged list move");
        PreviewResult::Applied { keys }
    }

    fn preview_task(&self, cache: &mut QueryCache, active: &str, over: &str) -> PreviewResult {
        let Some((source, from)) = self.locate_task(cache, active) else {
            return PreviewResult::noop("task not in any list");
        };

        // The target is either a list container or another task
        let (dest, over_index) = match self.board_list(cache, over) {
            Some(list) => (list, None),
            None => match self.locate_task(cache, over) {
                Some((list, index)) => (list, Some(index)),
                None => return PreviewResult::noop("unknown drop target"),
            },
        };

        if dest.id == source.id {
            let Some(to) = over_index else {
                return PreviewResult::noop("hovering own list");
            };
            if to == from {
                return PreviewResult::noop("already at target");
            }
            let tasks = array_move(source.tasks, from, to);
            let keys = cache.stage([Order::Tasks {
                list: source.id,
                tasks,
            }]);
            debug!(task_id = active, from, to, "Staged task reorder");
            return PreviewResult::Applied { keys };
        }

        if dest.contains(active) {
            return PreviewResult::noop("already in destination");
        }

        // Append when hovering the container itself
        let index = over_index.unwrap_or(dest.tasks.len());
        let source_tasks = without(&source.tasks, active);
        let dest_tasks = insert_at(dest.tasks, index, TaskId::from(active));

        debug!(
            task_id = active,
            source = %source.id,
            dest = %dest.id,
            index,
            "Staged cross-list move"
        );
        let keys = cache.stage([
            Order::Tasks {
                list: source.id,
                tasks: source_tasks,
            },
            Order::Tasks {
                list: dest.id,
                tasks: dest_tasks,
            },
        ]);
        PreviewResult::Applied { keys }
    }

    /// Resolve where a drag picks `id` up, as currently displayed
    pub fn locate(&self, cache: &QueryCache, kind: DragKind, id: &str) -> Option<DragItem> {
        let (source_container, source_index) = match kind {
            DragKind::List => {
                let board = cache.read_board(self.board_id.as_str())?;
                let index = board.index_of(id)?;
                (QueryKey::Board(self.board_id.clone()), index)
            }
            DragKind::Task => {
                let (list, index) = self.locate_task(cache, id)?;
                (QueryKey::List(list.id), index)
            }
        };
        Some(DragItem {
            kind,
            id: id.to_string(),
            source_container,
            source_index,
        })
    }

    /// The list currently holding `task_id`, with the task's index in it
    pub fn locate_task(&self, cache: &QueryCache, task_id: &str) -> Option<(List, usize)> {
        let board = cache.read_board(self.board_id.as_str())?;
        board.lists.iter().find_map(|list_id| {
            let list = cache.read_list(list_id.as_str())?;
            let index = list.index_of(task_id)?;
            Some((list, index))
        })
    }

    fn board_list(&self, cache: &QueryCache, list_id: &str) -> Option<List> {
        let board = cache.read_board(self.board_id.as_str())?;
        if !board.lists.iter().any(|id| id == list_id) {
            return None;
        }
        cache.read_list(list_id)
    }

    /// Pick the orders a commit must persist.
    ///
    /// Every container in `touched` whose staged order differs from its
    /// authoritative order is returned. Staged orders equal to the
    /// authoritative one are discarded so they produce no write.
    pub fn plan_commit(&self, cache: &mut QueryCache, touched: &[QueryKey]) -> Vec<Order> {
        let mut writes = Vec::new();
        let mut unchanged = Vec::new();

        for key in touched {
            let Some(staged) = cache.staged_order(key) else {
                continue;
            };
            if cache.committed_order(key).as_ref() == Some(staged) {
                unchanged.push(key.clone());
            } else {
                writes.push(staged.clone());
            }
        }

        if !unchanged.is_empty() {
            cache.discard(&unchanged);
        }
        writes
    }
}
