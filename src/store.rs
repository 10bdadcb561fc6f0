//! Board State Store
//!
//! Categories, the flat item pool and the order map. Column contents are a
//! derived view: every mutation ends by re-materializing all columns.

use item_order::{materialize_columns, CategoryId, ItemId, ItemPool, OrderMap, Patch};

use crate::models::{Category, CategoryRecord, Item, ItemDraft};

#[derive(Debug, Clone, Default)]
pub struct BoardState {
    /// In creation order
    categories: Vec<Category>,
    pool: ItemPool<Item>,
    order: OrderMap,
}

impl BoardState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from the three fetch results.
    pub fn from_parts(categories: Vec<CategoryRecord>, items: Vec<Item>, order: OrderMap) -> Self {
        let mut state = Self {
            categories: categories.into_iter().map(Category::new).collect(),
            pool: items.into_iter().collect(),
            order,
        };
        state.refresh();
        state
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category(&self, id: &CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| &c.id == id)
    }

    pub fn order(&self) -> &OrderMap {
        &self.order
    }

    pub fn pool(&self) -> &ItemPool<Item> {
        &self.pool
    }

    /// Category whose column currently shows `item`
    pub fn category_of(&self, item: &ItemId) -> Option<&Category> {
        self.categories
            .iter()
            .find(|c| c.items.iter().any(|i| &i.id == item))
    }

    /// Item whose id equals or uniquely starts with `query`
    pub fn find_item(&self, query: &str) -> Option<&Item> {
        if let Some(item) = self.pool.get(&ItemId::new(query)) {
            return Some(item);
        }
        let mut matches = self.pool.values().filter(|i| i.id.as_str().starts_with(query));
        match (matches.next(), matches.next()) {
            (Some(item), None) => Some(item),
            _ => None,
        }
    }

    /// Category by exact id, exact title, or unique id prefix
    pub fn find_category(&self, query: &str) -> Option<&Category> {
        if let Some(category) = self
            .categories
            .iter()
            .find(|c| c.id.as_str() == query || c.title.as_deref() == Some(query))
        {
            return Some(category);
        }
        let mut matches = self.categories.iter().filter(|c| c.id.as_str().starts_with(query));
        match (matches.next(), matches.next()) {
            (Some(category), None) => Some(category),
            _ => None,
        }
    }

    pub fn apply_patch(&mut self, patch: &Patch) {
        self.merge(patch);
        self.refresh();
    }

    pub fn add_category(&mut self, record: CategoryRecord, patch: &Patch) {
        self.categories.push(Category::new(record));
        self.merge(patch);
        self.refresh();
    }

    pub fn add_item(&mut self, item: Item, patch: &Patch) {
        self.pool.insert(item);
        self.merge(patch);
        self.refresh();
    }

    pub fn remove_item(&mut self, id: &ItemId, patch: &Patch) -> Option<Item> {
        let removed = self.pool.remove(id);
        self.merge(patch);
        self.refresh();
        removed
    }

    /// Returns false for an unknown category.
    pub fn set_draft(&mut self, id: &CategoryId, draft: ItemDraft) -> bool {
        match self.categories.iter_mut().find(|c| &c.id == id) {
            Some(category) => {
                category.draft = Some(draft);
                true
            }
            None => false,
        }
    }

    /// Keep date and text for the next card, forget the title.
    pub fn clear_draft_title(&mut self, id: &CategoryId) {
        if let Some(draft) = self
            .categories
            .iter_mut()
            .find(|c| &c.id == id)
            .and_then(|c| c.draft.as_mut())
        {
            draft.title.clear();
        }
    }

    fn merge(&mut self, patch: &Patch) {
        let order = std::mem::take(&mut self.order);
        self.order = order.merge(patch);
    }

    fn refresh(&mut self) {
        let columns = materialize_columns(&self.pool, &self.order, self.categories.iter().map(|c| &c.id));
        for (category, items) in self.categories.iter_mut().zip(columns) {
            category.items = items;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_order::NodeId;

    fn make_item(id: &str) -> Item {
        Item {
            id: ItemId::new(id),
            date: "2024-05-01".to_string(),
            title: format!("Item {}", id),
            text: None,
        }
    }

    fn record(id: &str, title: &str) -> CategoryRecord {
        CategoryRecord {
            id: CategoryId::new(id),
            title: Some(title.to_string()),
        }
    }

    fn order(links: &[(&str, &str)]) -> OrderMap {
        OrderMap::from_links(links.iter().map(|(k, v)| (NodeId::new(*k), NodeId::new(*v))))
    }

    fn column_ids(category: &Category) -> Vec<&str> {
        category.items().iter().map(|i| i.id.as_str()).collect()
    }

    fn sample() -> BoardState {
        BoardState::from_parts(
            vec![record("todo", "To do"), record("done", "Done")],
            vec![make_item("c1"), make_item("c2"), make_item("c3")],
            order(&[
                ("todo", "c2"),
                ("c2", "c1"),
                ("c1", "todo"),
                ("done", "c3"),
                ("c3", "done"),
            ]),
        )
    }

    #[test]
    fn test_columns_follow_order_map() {
        let state = sample();

        assert_eq!(column_ids(&state.categories()[0]), vec!["c2", "c1"]);
        assert_eq!(column_ids(&state.categories()[1]), vec!["c3"]);
        assert_eq!(state.category_of(&ItemId::new("c3")).unwrap().id, CategoryId::new("done"));
    }

    #[test]
    fn test_columns_recomputed_after_patch() {
        let mut state = sample();
        let mut patch = Patch::new();
        patch.link(NodeId::new("todo"), NodeId::new("c1"));
        patch.link(NodeId::new("c1"), NodeId::new("c2"));
        patch.link(NodeId::new("c2"), NodeId::new("todo"));

        state.apply_patch(&patch);

        assert_eq!(column_ids(state.category(&CategoryId::new("todo")).unwrap()), vec!["c1", "c2"]);
    }

    #[test]
    fn test_item_without_chain_is_hidden() {
        let mut state = sample();
        state.add_item(make_item("loose"), &Patch::new());

        assert!(state.pool().contains(&ItemId::new("loose")));
        assert!(state.category_of(&ItemId::new("loose")).is_none());
    }

    #[test]
    fn test_find_by_prefix_and_title() {
        let mut state = sample();
        state.add_item(make_item("abc1"), &Patch::new());
        state.add_item(make_item("abd2"), &Patch::new());

        assert_eq!(state.find_item("abc").unwrap().id, ItemId::new("abc1"));
        assert!(state.find_item("ab").is_none());
        assert_eq!(state.find_category("Done").unwrap().id, CategoryId::new("done"));
        assert_eq!(state.find_category("to").unwrap().id, CategoryId::new("todo"));
        assert!(state.find_category("nothing").is_none());
    }

    #[test]
    fn test_draft_title_cleared() {
        let mut state = sample();
        let todo = CategoryId::new("todo");
        let draft = ItemDraft {
            date: "2024-06-01".to_string(),
            title: "Call mom".to_string(),
            text: Some("evening".to_string()),
        };

        assert!(state.set_draft(&todo, draft));
        assert!(!state.set_draft(&CategoryId::new("ghost"), ItemDraft::default()));
        state.clear_draft_title(&todo);

        let draft = state.category(&todo).unwrap().draft.clone().unwrap();
        assert_eq!(draft.title, "");
        assert_eq!(draft.date, "2024-06-01");
        assert_eq!(draft.text.as_deref(), Some("evening"));
    }
}
