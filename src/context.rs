//! Interaction Context
//!
//! Single-valued slots for the drag gesture and the delete confirmation.

use item_order::{CategoryId, ItemId, Placement};

/// Where a dragged card was released
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// On another card: insert before it
    Item(ItemId),
    /// On a column's empty area: append to it
    Column(CategoryId),
}

impl DropTarget {
    pub fn placement(&self) -> Placement {
        match self {
            DropTarget::Item(id) => Placement::Before(id.clone()),
            DropTarget::Column(id) => Placement::End(id.clone()),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct Interaction {
    dragging: Option<ItemId>,
    deleting: Option<ItemId>,
}

impl Interaction {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starting a new drag replaces any unfinished one.
    pub fn start_drag(&mut self, id: ItemId) {
        self.dragging = Some(id);
    }

    pub fn dragging(&self) -> Option<&ItemId> {
        self.dragging.as_ref()
    }

    pub fn take_drag(&mut self) -> Option<ItemId> {
        self.dragging.take()
    }

    pub fn cancel_drag(&mut self) {
        self.dragging = None;
    }

    pub fn request_delete(&mut self, id: ItemId) {
        self.deleting = Some(id);
    }

    pub fn take_delete(&mut self) -> Option<ItemId> {
        self.deleting.take()
    }

    pub fn cancel_delete(&mut self) {
        self.deleting = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_drag_slot_is_single_valued() {
        let mut ctx = Interaction::new();
        ctx.start_drag(ItemId::new("c1"));
        ctx.start_drag(ItemId::new("c2"));

        assert_eq!(ctx.take_drag(), Some(ItemId::new("c2")));
        assert_eq!(ctx.take_drag(), None);
    }

    #[test]
    fn test_drop_targets() {
        assert_eq!(
            DropTarget::Item(ItemId::new("c1")).placement(),
            Placement::Before(ItemId::new("c1"))
        );
        assert_eq!(
            DropTarget::Column(CategoryId::new("todo")).placement(),
            Placement::End(CategoryId::new("todo"))
        );
    }
}
