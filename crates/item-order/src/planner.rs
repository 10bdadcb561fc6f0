//! Patch Planner
//!
//! Computes the successor links that change when an item moves, is created
//! or is removed. Plans are pure functions of the current map, so the same
//! patch can be merged locally and replayed against the remote store.

use std::collections::HashSet;

use crate::id::{CategoryId, ItemId, NodeId};
use crate::order_map::{OrderMap, Patch};

/// Where the moving item should end up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// Immediately before another item.
    Before(ItemId),
    /// First item of a category.
    Front(CategoryId),
    /// Last item of a category.
    End(CategoryId),
    /// Out of every chain (deletion).
    Detach,
}

/// Minimal patch that splices `moving` out of its chain and into `placement`.
///
/// Requests that cannot be satisfied (unknown anchor, detaching an untracked
/// item) and moves that change nothing return an empty patch. A category
/// with no entry in the map is treated as empty, so `Front`/`End` link it.
pub fn reorder_patch(order: &OrderMap, moving: &ItemId, placement: Placement) -> Patch {
    let node = NodeId::from(moving);

    let gap = match &placement {
        Placement::Detach => {
            if !order.contains(&node) {
                log::debug!("detach of untracked item {}", moving);
                return Patch::new();
            }
            None
        }
        other => match insertion_gap(order, other) {
            Some(gap) => Some(gap),
            None => {
                log::debug!("no insertion point for {} at {:?}", moving, other);
                return Patch::new();
            }
        },
    };

    if let Some((before, after)) = &gap {
        if *before == node || *after == node {
            return Patch::new();
        }
    }

    let mut patch = Patch::new();

    if let Some(pred) = order.predecessor(&node) {
        match order
            .successor(&node)
            .cloned()
            .or_else(|| chain_head(order, &node))
        {
            Some(succ) => patch.link(pred.clone(), succ),
            None => patch.unlink(pred.clone()),
        }
    }

    match gap {
        Some((before, after)) => {
            patch.link(before, node.clone());
            patch.link(node, after);
        }
        None => patch.unlink(node),
    }

    minimize(order, patch)
}

/// `{c: c}` for a category that is not linked yet.
pub fn category_patch(order: &OrderMap, category: &CategoryId) -> Patch {
    let head = NodeId::from(category);
    let mut patch = Patch::new();
    if order.successor(&head).is_none() {
        patch.link(head.clone(), head);
    }
    patch
}

/// Minimal patch that makes `category`'s chain exactly `items`.
///
/// `items` is expected to be a permutation of the category's current members
/// (or any items that belong to no other chain).
pub fn chain_patch(order: &OrderMap, category: &CategoryId, items: &[ItemId]) -> Patch {
    let head = NodeId::from(category);
    let mut patch = Patch::new();
    let mut cursor = head.clone();
    for item in items {
        let node = NodeId::from(item);
        patch.link(cursor, node.clone());
        cursor = node;
    }
    patch.link(cursor, head);
    minimize(order, patch)
}

/// The `(before, after)` pair the moving item is inserted between.
fn insertion_gap(order: &OrderMap, placement: &Placement) -> Option<(NodeId, NodeId)> {
    match placement {
        Placement::Before(target) => {
            let target = NodeId::from(target);
            let before = order.predecessor(&target)?.clone();
            Some((before, target))
        }
        Placement::Front(category) => {
            let head = NodeId::from(category);
            let first = order.successor(&head).cloned().unwrap_or_else(|| head.clone());
            Some((head, first))
        }
        Placement::End(category) => {
            let head = NodeId::from(category);
            let tail = chain_tail(order, &head);
            Some((tail, head))
        }
        Placement::Detach => None,
    }
}

/// Last node of the chain starting at `head`; the head itself when the
/// category is empty or not linked at all.
fn chain_tail(order: &OrderMap, head: &NodeId) -> NodeId {
    if order.successor(head).is_none() {
        return head.clone();
    }
    if let Some(tail) = order.predecessor(head) {
        return tail.clone();
    }

    // Chain ends by absence rather than by pointing back at its category.
    let mut visited = HashSet::new();
    let mut cursor = head.clone();
    loop {
        match order.successor(&cursor) {
            Some(next) if next != head && visited.insert(next.clone()) => cursor = next.clone(),
            _ => return cursor,
        }
    }
}

/// Category owning `node`, found by walking predecessors of an
/// absence-terminated chain back to a node nothing points at.
fn chain_head(order: &OrderMap, node: &NodeId) -> Option<NodeId> {
    let mut visited = HashSet::new();
    let mut cursor = node.clone();
    while let Some(pred) = order.predecessor(&cursor) {
        if !visited.insert(pred.clone()) {
            return None;
        }
        cursor = pred.clone();
    }
    (cursor != *node).then_some(cursor)
}

fn minimize(order: &OrderMap, mut patch: Patch) -> Patch {
    patch.retain(|key, value| order.successor(key) != value);
    patch
}
