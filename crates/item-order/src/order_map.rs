//! Order Map
//!
//! Flat successor mapping that encodes one linked chain per category.
//!
//! `next[x] = y` means `y` directly follows `x`. A category key points at the
//! first item of its chain, and the last item points back at its category,
//! so every chain is a ring closed by its category. An empty category is the
//! self-loop `next[c] = c`. A node with no entry at all also ends a chain,
//! which keeps maps written by older clients readable.

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::id::NodeId;

/// A partial order map: only the successor links that change.
///
/// `None` removes the key. On the wire that is a JSON `null`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Patch(BTreeMap<NodeId, Option<NodeId>>);

impl Patch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `next[from] = to`.
    pub fn link(&mut self, from: NodeId, to: NodeId) {
        self.0.insert(from, Some(to));
    }

    /// Drop `from` as a key.
    pub fn unlink(&mut self, from: NodeId) {
        self.0.insert(from, None);
    }

    /// `None` when the patch does not touch `key`, `Some(None)` when it removes it.
    pub fn get(&self, key: &NodeId) -> Option<Option<&NodeId>> {
        self.0.get(key).map(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, Option<&NodeId>)> {
        self.0.iter().map(|(k, v)| (k, v.as_ref()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn retain(&mut self, mut keep: impl FnMut(&NodeId, Option<&NodeId>) -> bool) {
        self.0.retain(|k, v| keep(k, v.as_ref()));
    }
}

impl FromIterator<(NodeId, Option<NodeId>)> for Patch {
    fn from_iter<I: IntoIterator<Item = (NodeId, Option<NodeId>)>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Successor map plus a reverse index for predecessor lookups.
#[derive(Debug, Clone, Default)]
pub struct OrderMap {
    next: BTreeMap<NodeId, NodeId>,
    prev: BTreeMap<NodeId, NodeId>,
}

impl OrderMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a map from raw `(node, successor)` links.
    pub fn from_links<I: IntoIterator<Item = (NodeId, NodeId)>>(links: I) -> Self {
        let next: BTreeMap<NodeId, NodeId> = links.into_iter().collect();
        let mut prev = BTreeMap::new();
        for (key, value) in &next {
            if let Some(earlier) = prev.insert(value.clone(), key.clone()) {
                log::warn!("order map: {} follows both {} and {}", value, earlier, key);
            }
        }
        Self { next, prev }
    }

    pub fn successor(&self, node: &NodeId) -> Option<&NodeId> {
        self.next.get(node)
    }

    pub fn predecessor(&self, node: &NodeId) -> Option<&NodeId> {
        self.prev.get(node)
    }

    /// Whether `node` takes part in any chain, as key or as value.
    pub fn contains(&self, node: &NodeId) -> bool {
        self.next.contains_key(node) || self.prev.contains_key(node)
    }

    pub fn len(&self) -> usize {
        self.next.len()
    }

    pub fn is_empty(&self) -> bool {
        self.next.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NodeId, &NodeId)> {
        self.next.iter()
    }

    /// Merge `patch` over this map and return the result.
    ///
    /// Only the patched keys are visited. The reverse index is first cleared
    /// of every link the patch replaces, then refilled, so the outcome does
    /// not depend on the order of the patch entries.
    pub fn merge(mut self, patch: &Patch) -> Self {
        for (key, _) in patch.iter() {
            if let Some(old) = self.next.get(key) {
                if self.prev.get(old) == Some(key) {
                    self.prev.remove(old);
                }
            }
        }

        for (key, value) in patch.iter() {
            match value {
                Some(value) => {
                    self.next.insert(key.clone(), value.clone());
                    self.prev.insert(value.clone(), key.clone());
                }
                None => {
                    self.next.remove(key);
                }
            }
        }

        self
    }
}

impl PartialEq for OrderMap {
    fn eq(&self, other: &Self) -> bool {
        self.next == other.next
    }
}

impl Eq for OrderMap {}

impl Serialize for OrderMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.next.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OrderMap {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Stores that applied a removal patch verbatim may still hold nulls.
        let raw = BTreeMap::<NodeId, Option<NodeId>>::deserialize(deserializer)?;
        Ok(Self::from_links(
            raw.into_iter().filter_map(|(k, v)| v.map(|v| (k, v))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(id: &str) -> NodeId {
        NodeId::new(id)
    }

    fn map(links: &[(&str, &str)]) -> OrderMap {
        OrderMap::from_links(links.iter().map(|(k, v)| (node(k), node(v))))
    }

    #[test]
    fn test_lookup_both_directions() {
        let order = map(&[("A", "i1"), ("i1", "i2"), ("i2", "A")]);

        assert_eq!(order.successor(&node("A")), Some(&node("i1")));
        assert_eq!(order.predecessor(&node("i2")), Some(&node("i1")));
        assert_eq!(order.predecessor(&node("A")), Some(&node("i2")));
        assert!(order.contains(&node("i2")));
        assert!(!order.contains(&node("zz")));
        assert_eq!(order.len(), 3);
    }

    #[test]
    fn test_merge_rewires_reverse_index() {
        let order = map(&[("A", "i1"), ("i1", "i2"), ("i2", "A")]);
        let patch: Patch = [
            (node("A"), Some(node("i2"))),
            (node("i2"), Some(node("i1"))),
            (node("i1"), Some(node("A"))),
        ]
        .into_iter()
        .collect();

        let merged = order.merge(&patch);

        assert_eq!(merged, map(&[("A", "i2"), ("i2", "i1"), ("i1", "A")]));
        assert_eq!(merged.predecessor(&node("i2")), Some(&node("A")));
        assert_eq!(merged.predecessor(&node("i1")), Some(&node("i2")));
        assert_eq!(merged.predecessor(&node("A")), Some(&node("i1")));
    }

    #[test]
    fn test_merge_removes_keys() {
        let order = map(&[("A", "i1"), ("i1", "i2"), ("i2", "A")]);
        let mut patch = Patch::new();
        patch.link(node("A"), node("i2"));
        patch.unlink(node("i1"));

        let merged = order.merge(&patch);

        assert_eq!(merged.successor(&node("i1")), None);
        assert!(!merged.contains(&node("i1")));
        assert_eq!(merged.predecessor(&node("i2")), Some(&node("A")));
    }

    #[test]
    fn test_merge_twice_is_merge_once() {
        let order = map(&[("A", "i1"), ("i1", "A"), ("B", "B")]);
        let mut patch = Patch::new();
        patch.link(node("A"), node("A"));
        patch.link(node("B"), node("i1"));
        patch.link(node("i1"), node("B"));

        let once = order.clone().merge(&patch);
        let twice = order.merge(&patch).merge(&patch);
        assert_eq!(once, twice);
        assert_eq!(once.predecessor(&node("i1")), twice.predecessor(&node("i1")));
    }

    #[test]
    fn test_wire_format() {
        let order: OrderMap =
            serde_json::from_str(r#"{"A":"i1","i1":"A","gone":null}"#).unwrap();
        assert_eq!(order, map(&[("A", "i1"), ("i1", "A")]));
        assert_eq!(serde_json::to_string(&order).unwrap(), r#"{"A":"i1","i1":"A"}"#);

        let mut patch = Patch::new();
        patch.link(node("A"), node("A"));
        patch.unlink(node("i1"));
        assert_eq!(serde_json::to_string(&patch).unwrap(), r#"{"A":"A","i1":null}"#);
    }
}
