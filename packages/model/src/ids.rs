//! String-backed document identifiers.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }

            pub fn into_inner(self) -> String {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self(id.to_string())
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }

        impl AsRef<str> for $name {
            fn as_ref(&self) -> &str {
                &self.0
            }
        }

        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }

        impl PartialEq<str> for $name {
            fn eq(&self, other: &str) -> bool {
                self.0 == other
            }
        }

        impl PartialEq<&str> for $name {
            fn eq(&self, other: &&str) -> bool {
                self.0 == *other
            }
        }
    };
}

string_id!(
    /// Identifier of a board document
    BoardId
);
string_id!(
    /// Identifier of a list document
    ListId
);
string_id!(
    /// Identifier of a task document
    TaskId
);
string_id!(
    /// Identifier of a user (board member, task member, comment author)
    UserId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_serializes_transparently() {
        let id = ListId::new("L1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"L1\"");

        let back: ListId = serde_json::from_str("\"L1\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_id_compares_with_str() {
        let id = TaskId::from("T1");
        assert!(id == "T1");
        assert_eq!(id.as_str(), "T1");
        assert_eq!(id.to_string(), "T1");
    }

    #[test]
    fn test_id_borrows_as_str_for_lookups() {
        let mut set = std::collections::HashSet::new();
        set.insert(TaskId::new("T1"));
        assert!(set.contains("T1"));
    }
}
