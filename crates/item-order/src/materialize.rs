//! Sequence Materializer
//!
//! Rebuilds the ordered items of a category by walking its chain.

use std::collections::{HashMap, HashSet};

use crate::id::{CategoryId, ItemId, NodeId};
use crate::order_map::OrderMap;

/// Anything that can live in the item pool.
pub trait PoolEntry: Clone {
    fn id(&self) -> &ItemId;
}

/// Flat, category-agnostic pool of items indexed by id.
#[derive(Debug, Clone)]
pub struct ItemPool<T> {
    entries: HashMap<ItemId, T>,
}

impl<T> Default for ItemPool<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T: PoolEntry> ItemPool<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace an entry, returning the replaced one.
    pub fn insert(&mut self, entry: T) -> Option<T> {
        self.entries.insert(entry.id().clone(), entry)
    }

    pub fn remove(&mut self, id: &ItemId) -> Option<T> {
        self.entries.remove(id)
    }

    pub fn get(&self, id: &ItemId) -> Option<&T> {
        self.entries.get(id)
    }

    fn get_node(&self, node: &NodeId) -> Option<&T> {
        self.entries.get(node.as_str())
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.entries.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn values(&self) -> impl Iterator<Item = &T> {
        self.entries.values()
    }
}

impl<T: PoolEntry> FromIterator<T> for ItemPool<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut pool = Self::new();
        for entry in iter {
            pool.insert(entry);
        }
        pool
    }
}

/// Ordered items of `category`.
///
/// Never fails: a dangling id or a cycle ends the sequence early and is only
/// logged.
pub fn materialize<T: PoolEntry>(
    pool: &ItemPool<T>,
    order: &OrderMap,
    category: &CategoryId,
) -> Vec<T> {
    walk(pool, order, category, &mut HashSet::new())
}

/// Ordered items of every category, in the given category order.
///
/// An item reachable from two categories is kept by the first one only.
pub fn materialize_columns<'c, T, I>(pool: &ItemPool<T>, order: &OrderMap, categories: I) -> Vec<Vec<T>>
where
    T: PoolEntry,
    I: IntoIterator<Item = &'c CategoryId>,
{
    let mut claimed = HashSet::new();
    categories
        .into_iter()
        .map(|category| walk(pool, order, category, &mut claimed))
        .collect()
}

fn walk<T: PoolEntry>(
    pool: &ItemPool<T>,
    order: &OrderMap,
    category: &CategoryId,
    claimed: &mut HashSet<NodeId>,
) -> Vec<T> {
    let head = NodeId::from(category);
    let mut sequence = Vec::new();
    let mut visited = HashSet::new();
    let mut cursor = order.successor(&head);

    while let Some(node) = cursor {
        if *node == head {
            break;
        }
        if !visited.insert(node.clone()) {
            log::warn!("cycle in chain of {} at {}", category, node);
            break;
        }
        let Some(entry) = pool.get_node(node) else {
            log::warn!("chain of {} references unknown item {}", category, node);
            break;
        };

        if claimed.insert(node.clone()) {
            sequence.push(entry.clone());
        } else {
            log::warn!("item {} already shown in another category, skipped in {}", node, category);
        }
        cursor = order.successor(node);
    }

    sequence
}
