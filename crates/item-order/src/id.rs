//! Node Identifiers
//!
//! Categories and items share one string domain but are distinct types.
//! Both convert into [`NodeId`], the key/value domain of the order map.

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Fresh random token, generated client side.
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().simple().to_string())
            }

            pub fn as_str(&self) -> &str {
                &self.0
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

        // Lets id-keyed maps be queried with any flavor of id.
        impl Borrow<str> for $name {
            fn borrow(&self) -> &str {
                &self.0
            }
        }
    };
}

string_id!(
    /// A category or an item, as seen by the order map.
    NodeId
);
string_id!(
    /// Identifier of a category (a column of the board).
    CategoryId
);
string_id!(
    /// Identifier of an item (a card of the board).
    ItemId
);

impl From<&CategoryId> for NodeId {
    fn from(id: &CategoryId) -> Self {
        NodeId(id.0.clone())
    }
}

impl From<CategoryId> for NodeId {
    fn from(id: CategoryId) -> Self {
        NodeId(id.0)
    }
}

impl From<&ItemId> for NodeId {
    fn from(id: &ItemId) -> Self {
        NodeId(id.0.clone())
    }
}

impl From<ItemId> for NodeId {
    fn from(id: ItemId) -> Self {
        NodeId(id.0)
    }
}

impl PartialEq<CategoryId> for NodeId {
    fn eq(&self, other: &CategoryId) -> bool {
        self.0 == other.0
    }
}

impl PartialEq<ItemId> for NodeId {
    fn eq(&self, other: &ItemId) -> bool {
        self.0 == other.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ids_convert_into_nodes() {
        let category = CategoryId::new("todo");
        let item = ItemId::new("card-1");

        assert_eq!(NodeId::from(&category), category);
        assert_eq!(NodeId::from(item.clone()), item);
        assert_eq!(NodeId::from(&item).as_str(), "card-1");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        let a = ItemId::generate();
        let b = ItemId::generate();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 32);
    }

    #[test]
    fn test_id_serializes_as_plain_string() {
        let json = serde_json::to_string(&CategoryId::new("done")).unwrap();
        assert_eq!(json, "\"done\"");
    }
}
