//! Collection subscription and query filters

use crate::Document;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Default)]
pub enum Filter {
    /// Every document of the collection
    #[default]
    All,

    /// Documents whose field equals the value (`where boardId == "B"`)
    FieldEquals { field: String, value: Value },

    /// Documents whose array field contains the value (`where members contains "u1"`)
    ArrayContains { field: String, value: Value },

    /// Documents with one of the given ids
    IdIn(Vec<String>),
}

impl Filter {
    pub fn field_equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::FieldEquals {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn array_contains(field: impl Into<String>, value: impl Into<Value>) -> Self {
        Filter::ArrayContains {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn matches(&self, doc: &Document) -> bool {
        match self {
            Filter::All => true,
            Filter::FieldEquals { field, value } => doc.get(field) == Some(value),
            Filter::ArrayContains { field, value } => match doc.get(field) {
                Some(Value::Array(items)) => items.contains(value),
                _ => false,
            },
            Filter::IdIn(ids) => ids.iter().any(|id| *id == doc.id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Collection, Fields};
    use serde_json::json;

    fn doc(id: &str, fields: Value) -> Document {
        let Value::Object(fields) = fields else {
            return Document::new(Collection::Lists, id, Fields::new());
        };
        Document::new(Collection::Lists, id, fields)
    }

    #[test]
    fn test_field_equals() {
        let filter = Filter::field_equals("boardId", "B");
        assert!(filter.matches(&doc("L1", json!({ "boardId": "B" }))));
        assert!(!filter.matches(&doc("L2", json!({ "boardId": "C" }))));
        assert!(!filter.matches(&doc("L3", json!({}))));
    }

    #[test]
    fn test_array_contains() {
        let filter = Filter::array_contains("members", "u1");
        assert!(filter.matches(&doc("B", json!({ "members": ["u1", "u2"] }))));
        assert!(!filter.matches(&doc("C", json!({ "members": "u1" }))));
    }

    #[test]
    fn test_id_in() {
        let filter = Filter::IdIn(vec!["L1".to_string()]);
        assert!(filter.matches(&doc("L1", json!({}))));
        assert!(!filter.matches(&doc("L2", json!({}))));
        assert!(Filter::All.matches(&doc("L2", json!({}))));
    }
}
