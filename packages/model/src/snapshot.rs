//! Whole-board view used to check the containment invariants.

use crate::{Board, BoardId, List, ListId, Task, TaskId};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};
use thiserror::Error;

/// A board together with its lists (and optionally its tasks)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoardSnapshot {
    pub board: Board,

    #[serde(default)]
    pub lists: Vec<List>,

    /// Task records. When empty, task existence is not checked.
    #[serde(default)]
    pub tasks: Vec<Task>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvariantViolation {
    #[error("Board references missing list: {0}")]
    MissingList(ListId),

    #[error("Board lists the same list twice: {0}")]
    DuplicateList(ListId),

    #[error("List {list} belongs to board {owner}, not this board")]
    ForeignList { list: ListId, owner: BoardId },

    #[error("List {list} references missing task: {task}")]
    MissingTask { list: ListId, task: TaskId },

    #[error("List {list} contains task {task} more than once")]
    DuplicateTask { list: ListId, task: TaskId },

    #[error("Task {task} is contained by several lists: {lists:?}")]
    TaskInMultipleLists { task: TaskId, lists: Vec<ListId> },
}

impl BoardSnapshot {
    pub fn new(board: Board, lists: Vec<List>) -> Self {
        Self {
            board,
            lists,
            tasks: Vec::new(),
        }
    }

    pub fn with_tasks(mut self, tasks: Vec<Task>) -> Self {
        self.tasks = tasks;
        self
    }

    pub fn list(&self, id: &str) -> Option<&List> {
        self.lists.iter().find(|list| list.id == id)
    }

    /// Lists in board order, skipping ids that do not resolve
    pub fn ordered_lists(&self) -> impl Iterator<Item = &List> {
        self.board.lists.iter().filter_map(|id| self.list(id.as_str()))
    }

    /// Total number of (list, task) membership pairs across the board
    pub fn membership_count(&self) -> usize {
        self.ordered_lists().map(|list| list.tasks.len()).sum()
    }

    /// Check every containment invariant and return all violations found
    pub fn check_invariants(&self) -> Vec<InvariantViolation> {
        let mut violations = Vec::new();
        let lists: HashMap<&str, &List> =
            self.lists.iter().map(|list| (list.id.as_str(), list)).collect();

        let mut seen_lists = HashSet::new();
        for list_id in &self.board.lists {
            if !seen_lists.insert(list_id.as_str()) {
                violations.push(InvariantViolation::DuplicateList(list_id.clone()));
                continue;
            }
            match lists.get(list_id.as_str()) {
                None => violations.push(InvariantViolation::MissingList(list_id.clone())),
                Some(list) if list.board_id != self.board.id => {
                    violations.push(InvariantViolation::ForeignList {
                        list: list_id.clone(),
                        owner: list.board_id.clone(),
                    })
                }
                Some(_) => {}
            }
        }

        let known_tasks: HashSet<&str> = self.tasks.iter().map(|task| task.id.as_str()).collect();
        let mut containers: BTreeMap<&TaskId, Vec<ListId>> = BTreeMap::new();

        for list in self.ordered_lists() {
            let mut seen_tasks = HashSet::new();
            for task_id in &list.tasks {
                if !seen_tasks.insert(task_id.as_str()) {
                    violations.push(InvariantViolation::DuplicateTask {
                        list: list.id.clone(),
                        task: task_id.clone(),
                    });
                    continue;
                }
                if !known_tasks.is_empty() && !known_tasks.contains(task_id.as_str()) {
                    violations.push(InvariantViolation::MissingTask {
                        list: list.id.clone(),
                        task: task_id.clone(),
                    });
                }
                containers.entry(task_id).or_default().push(list.id.clone());
            }
        }

        for (task, lists) in containers {
            if lists.len() > 1 {
                violations.push(InvariantViolation::TaskInMultipleLists {
                    task: task.clone(),
                    lists,
                });
            }
        }

        violations
    }
}
