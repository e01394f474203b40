//! # Board Records
//!
//! Documents as they are stored in the `boards`, `lists` and `tasks`
//! collections. Field names serialize in camelCase (`boardId`, `createdAt`,
//! `dueDate`) to match the stored documents.

use crate::{BoardId, ListId, TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A board: the container of lists
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Board {
    pub id: BoardId,

    pub title: String,

    #[serde(default)]
    pub members: Vec<UserId>,

    /// Authoritative order of the lists on this board
    #[serde(default)]
    pub lists: Vec<ListId>,

    pub creator: UserId,
}

impl Board {
    pub fn new(id: impl Into<BoardId>, title: impl Into<String>, creator: impl Into<UserId>) -> Self {
        let creator = creator.into();
        Self {
            id: id.into(),
            title: title.into(),
            members: vec![creator.clone()],
            lists: Vec::new(),
            creator,
        }
    }

    pub fn with_lists<I, L>(mut self, lists: I) -> Self
    where
        I: IntoIterator<Item = L>,
        L: Into<ListId>,
    {
        self.lists = lists.into_iter().map(Into::into).collect();
        self
    }

    /// Position of a list on this board
    pub fn index_of(&self, list_id: &str) -> Option<usize> {
        self.lists.iter().position(|id| id == list_id)
    }
}

/// A list: the container of tasks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct List {
    pub id: ListId,

    pub title: String,

    pub board_id: BoardId,

    /// Authoritative order of the tasks in this list
    #[serde(default)]
    pub tasks: Vec<TaskId>,

    pub created_at: DateTime<Utc>,
}

impl List {
    pub fn new(id: impl Into<ListId>, title: impl Into<String>, board_id: impl Into<BoardId>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            board_id: board_id.into(),
            tasks: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn with_tasks<I, T>(mut self, tasks: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<TaskId>,
    {
        self.tasks = tasks.into_iter().map(Into::into).collect();
        self
    }

    /// Position of a task in this list
    pub fn index_of(&self, task_id: &str) -> Option<usize> {
        self.tasks.iter().position(|id| id == task_id)
    }

    pub fn contains(&self, task_id: &str) -> bool {
        self.index_of(task_id).is_some()
    }
}

/// A task. Its position is not stored here; see [`List::tasks`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,

    pub title: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub labels: Option<Vec<Label>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comments: Option<Vec<Comment>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub members: Option<Vec<UserId>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<FileRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checklists: Option<Vec<Checklist>>,

    pub created_at: DateTime<Utc>,
}

impl Task {
    pub fn new(id: impl Into<TaskId>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            due_date: None,
            labels: None,
            comments: None,
            members: None,
            files: None,
            checklists: None,
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Label {
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: UserId,
    pub body: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileRef {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Checklist {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub items: Vec<ChecklistItem>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChecklistItem {
    pub id: String,
    pub text: String,
    #[serde(default)]
    pub done: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_serializes_camel_case() {
        let list = List::new("L1", "Todo", "B").with_tasks(["T1", "T2"]);
        let json = serde_json::to_value(&list).unwrap();

        assert_eq!(json["boardId"], "B");
        assert_eq!(json["tasks"], serde_json::json!(["T1", "T2"]));
        assert!(json.get("createdAt").is_some());
    }

    #[test]
    fn test_task_omits_absent_optionals() {
        let task = Task::new("T1", "Write tests");
        let json = serde_json::to_value(&task).unwrap();

        assert!(json.get("description").is_none());
        assert!(json.get("dueDate").is_none());
        assert_eq!(json["title"], "Write tests");
    }

    #[test]
    fn test_board_missing_arrays_default_to_empty() {
        let board: Board = serde_json::from_value(serde_json::json!({
            "id": "B",
            "title": "Roadmap",
            "creator": "u1"
        }))
        .unwrap();

        assert!(board.lists.is_empty());
        assert!(board.members.is_empty());
    }

    #[test]
    fn test_index_lookups() {
        let board = Board::new("B", "Roadmap", "u1").with_lists(["L1", "L2"]);
        assert_eq!(board.index_of("L2"), Some(1));
        assert_eq!(board.index_of("L9"), None);

        let list = List::new("L1", "Todo", "B").with_tasks(["T1"]);
        assert!(list.contains("T1"));
        assert!(!list.contains("T2"));
    }
}
