use serde::{Deserialize, Serialize};
use std::fmt;
use taskboard_cache::QueryKey;
use taskboard_model::{List, Task};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DragKind {
    Task,
    List,
}

impl fmt::Display for DragKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DragKind::Task => write!(f, "task"),
            DragKind::List => write!(f, "list"),
        }
    }
}

/// Where the dragged item was picked up. Lives for one gesture.
#[derive(Debug, Clone, PartialEq)]
pub struct DragItem {
    pub kind: DragKind,
    pub id: String,
    /// The board (for a list) or the list (for a task)
    pub source_container: QueryKey,
    pub source_index: usize,
}

impl DragItem {
    pub fn source_container_id(&self) -> &str {
        self.source_container.id()
    }
}

/// Full record of the dragged item, for overlay rendering
#[derive(Debug, Clone, PartialEq)]
pub enum DragPayload {
    Task(Task),
    List(List),
}

impl DragPayload {
    pub fn title(&self) -> &str {
        match self {
            DragPayload::Task(task) => &task.title,
            DragPayload::List(list) => &list.title,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ActiveItem {
    pub item: DragItem,
    pub payload: DragPayload,
}

impl ActiveItem {
    pub fn id(&self) -> &str {
        &self.item.id
    }

    pub fn kind(&self) -> DragKind {
        self.item.kind
    }
}
