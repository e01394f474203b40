//! Query keys, cached values, and container orders.

use serde_json::Value;
use std::fmt;
use taskboard_model::{Board, BoardId, List, ListId, TaskId};
use taskboard_store::{Collection, Document, DocumentWrite, Fields, StoreError, StoreResult};

/// Key of a cached query. Boards and lists are also the two kinds of
/// container whose order arrays a drag mutates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum QueryKey {
    Board(BoardId),
    List(ListId),
}

impl QueryKey {
    pub fn board(id: impl Into<BoardId>) -> Self {
        QueryKey::Board(id.into())
    }

    pub fn list(id: impl Into<ListId>) -> Self {
        QueryKey::List(id.into())
    }

    pub fn collection(&self) -> Collection {
        match self {
            QueryKey::Board(_) => Collection::Boards,
            QueryKey::List(_) => Collection::Lists,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            QueryKey::Board(id) => id.as_str(),
            QueryKey::List(id) => id.as_str(),
        }
    }

    /// Name of the order array this container owns
    pub fn order_field(&self) -> &'static str {
        match self {
            QueryKey::Board(_) => "lists",
            QueryKey::List(_) => "tasks",
        }
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[\"{}\", \"{}\"]", self.collection(), self.id())
    }
}

/// The order array of one container
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Order {
    Lists { board: BoardId, lists: Vec<ListId> },
    Tasks { list: ListId, tasks: Vec<TaskId> },
}

impl Order {
    pub fn key(&self) -> QueryKey {
        match self {
            Order::Lists { board, .. } => QueryKey::Board(board.clone()),
            Order::Tasks { list, .. } => QueryKey::List(list.clone()),
        }
    }

    pub fn ids(&self) -> Vec<&str> {
        match self {
            Order::Lists { lists, .. } => lists.iter().map(ListId::as_str).collect(),
            Order::Tasks { tasks, .. } => tasks.iter().map(TaskId::as_str).collect(),
        }
    }

    pub fn len(&self) -> usize {
        match self {
            Order::Lists { lists, .. } => lists.len(),
            Order::Tasks { tasks, .. } => tasks.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// The partial update that persists this order: `{ lists: [...] }` or `{ tasks: [...] }`
    pub fn to_fields(&self) -> Fields {
        let ids = self
            .ids()
            .into_iter()
            .map(|id| Value::String(id.to_string()))
            .collect();

        let mut fields = Fields::new();
        fields.insert(self.key().order_field().to_string(), Value::Array(ids));
        fields
    }

    pub fn to_write(&self) -> DocumentWrite {
        let key = self.key();
        DocumentWrite::new(key.collection(), key.id(), self.to_fields())
    }
}

/// A cached query result
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Board(Board),
    List(List),
}

impl QueryValue {
    pub fn decode(doc: &Document) -> StoreResult<Self> {
        match doc.collection {
            Collection::Boards => Ok(QueryValue::Board(doc.decode()?)),
            Collection::Lists => Ok(QueryValue::List(doc.decode()?)),
            other => Err(StoreError::Decode(format!(
                "{} documents are not cached as queries",
                other
            ))),
        }
    }

    pub fn key(&self) -> QueryKey {
        match self {
            QueryValue::Board(board) => QueryKey::Board(board.id.clone()),
            QueryValue::List(list) => QueryKey::List(list.id.clone()),
        }
    }

    pub fn order(&self) -> Order {
        match self {
            QueryValue::Board(board) => Order::Lists {
                board: board.id.clone(),
                lists: board.lists.clone(),
            },
            QueryValue::List(list) => Order::Tasks {
                list: list.id.clone(),
                tasks: list.tasks.clone(),
            },
        }
    }

    /// Replace this container's order array. Orders of another container are ignored.
    pub fn apply(&mut self, order: &Order) {
        match (self, order) {
            (QueryValue::Board(board), Order::Lists { board: id, lists }) if board.id == *id => {
                board.lists = lists.clone();
            }
            (QueryValue::List(list), Order::Tasks { list: id, tasks }) if list.id == *id => {
                list.tasks = tasks.clone();
            }
            _ => {}
        }
    }

    pub fn into_board(self) -> Option<Board> {
        match self {
            QueryValue::Board(board) => Some(board),
            QueryValue::List(_) => None,
        }
    }

    pub fn into_list(self) -> Option<List> {
        match self {
            QueryValue::List(list) => Some(list),
            QueryValue::Board(_) => None,
        }
    }
}
