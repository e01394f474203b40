//! # Documents
//!
//! A stored document is a flat JSON object addressed by collection + id.
//! The id lives beside the fields, not inside them; [`Document::decode`]
//! puts it back so records deserialize with their `id` field populated.

use crate::{StoreError, StoreResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use taskboard_model::{Board, List, Task};

/// Named fields of a document (or of a partial update)
pub type Fields = serde_json::Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Collection {
    Boards,
    Lists,
    Tasks,
}

impl Collection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::Boards => "boards",
            Collection::Lists => "lists",
            Collection::Tasks => "tasks",
        }
    }

    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "boards" => Some(Collection::Boards),
            "lists" => Some(Collection::Lists),
            "tasks" => Some(Collection::Tasks),
            _ => None,
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub collection: Collection,
    pub id: String,
    pub fields: Fields,
}

impl Document {
    pub fn new(collection: Collection, id: impl Into<String>, fields: Fields) -> Self {
        Self {
            collection,
            id: id.into(),
            fields,
        }
    }

    /// Encode a typed record as a document of its collection
    pub fn from_record<R: Record>(record: &R) -> StoreResult<Self> {
        let mut fields = match serde_json::to_value(record)? {
            Value::Object(fields) => fields,
            other => {
                return Err(StoreError::Decode(format!(
                    "{} record did not serialize to an object: {}",
                    R::COLLECTION,
                    other
                )))
            }
        };
        fields.remove("id");

        Ok(Self::new(R::COLLECTION, record.record_id(), fields))
    }

    /// Decode this document into a typed record
    pub fn decode<R: Record>(&self) -> StoreResult<R> {
        if self.collection != R::COLLECTION {
            return Err(StoreError::Decode(format!(
                "expected a {} document, found {}/{}",
                R::COLLECTION,
                self.collection,
                self.id
            )));
        }

        let mut fields = self.fields.clone();
        fields.insert("id".to_string(), Value::String(self.id.clone()));
        Ok(serde_json::from_value(Value::Object(fields))?)
    }

    /// Overwrite the named fields, leaving every other field untouched
    pub fn merge(&mut self, patch: &Fields) {
        for (name, value) in patch {
            self.fields.insert(name.clone(), value.clone());
        }
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }
}

/// A typed record that lives in one collection
pub trait Record: Serialize + DeserializeOwned {
    const COLLECTION: Collection;

    fn record_id(&self) -> &str;
}

impl Record for Board {
    const COLLECTION: Collection = Collection::Boards;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for List {
    const COLLECTION: Collection = Collection::Lists;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for Task {
    const COLLECTION: Collection = Collection::Tasks;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_record_round_trip_keeps_id_outside_fields() {
        let list = List::new("L1", "Todo", "B").with_tasks(["T1"]);
        let doc = Document::from_record(&list).unwrap();

        assert_eq!(doc.collection, Collection::Lists);
        assert_eq!(doc.id, "L1");
        assert!(doc.get("id").is_none());

        let back: List = doc.decode().unwrap();
        assert_eq!(back, list);
    }

    #[test]
    fn test_decode_rejects_wrong_collection() {
        let list = List::new("L1", "Todo", "B");
        let doc = Document::from_record(&list).unwrap();

        let result: StoreResult<Board> = doc.decode();
        assert!(matches!(result, Err(StoreError::Decode(_))));
    }

    #[test]
    fn test_merge_overwrites_named_fields_only() {
        let list = List::new("L1", "Todo", "B").with_tasks(["T1", "T2"]);
        let mut doc = Document::from_record(&list).unwrap();

        let mut patch = Fields::new();
        patch.insert("tasks".to_string(), json!(["T2"]));
        doc.merge(&patch);

        assert_eq!(doc.get("tasks"), Some(&json!(["T2"])));
        assert_eq!(doc.get("title"), Some(&json!("Todo")));
    }

    #[test]
    fn test_collection_names() {
        assert_eq!(Collection::parse("lists"), Some(Collection::Lists));
        assert_eq!(Collection::parse("cards"), None);
        assert_eq!(Collection::Boards.to_string(), "boards");
    }
}
