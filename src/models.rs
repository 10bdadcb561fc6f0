//! Board Models
//!
//! Data structures matching the REST API payloads.

use item_order::{CategoryId, ItemId, PoolEntry};
use serde::{Deserialize, Serialize};

/// Item (card) as stored in the flat item pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    pub id: ItemId,
    pub date: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl PoolEntry for Item {
    fn id(&self) -> &ItemId {
        &self.id
    }
}

/// Category as listed by the API (creation order, no items)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

/// Uncommitted input of a column's new-item form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemDraft {
    pub date: String,
    pub title: String,
    pub text: Option<String>,
}

/// Category with its materialized items
#[derive(Debug, Clone, PartialEq)]
pub struct Category {
    pub id: CategoryId,
    pub title: Option<String>,
    /// Transient form state, never persisted
    pub draft: Option<ItemDraft>,
    pub(crate) items: Vec<Item>,
}

impl Category {
    pub fn new(record: CategoryRecord) -> Self {
        Self {
            id: record.id,
            title: record.title,
            draft: None,
            items: Vec::new(),
        }
    }

    /// Items in chain order, derived from the order map
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or("(untitled)")
    }
}
