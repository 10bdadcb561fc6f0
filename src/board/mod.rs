//! Board Sync Façade
//!
//! Applies every change to the local state first, then forwards the same
//! requests to the remote API on background tasks. Local state is
//! authoritative once updated: a failed request is logged and reported by
//! `settle`, but the optimistic change is not rolled back.

use std::future::Future;
use std::sync::Arc;

use item_order::{category_patch, reorder_patch, CategoryId, ItemId, Patch, Placement};
use tokio::task::{JoinError, JoinSet};

use crate::api::{ApiError, ApiResult, BoardApi};
use crate::context::{DropTarget, Interaction};
use crate::models::{CategoryRecord, Item, ItemDraft};
use crate::store::BoardState;


/// Dropping the board aborts requests that were never settled.
pub struct Board<A: BoardApi + 'static> {
    api: Arc<A>,
    state: BoardState,
    interaction: Interaction,
    in_flight: JoinSet<ApiResult<()>>,
    /// Failures of requests already collected from `in_flight`
    failures: Vec<ApiError>,
}

impl<A: BoardApi + 'static> Board<A> {
    /// Empty board, nothing fetched yet.
    pub fn new(api: Arc<A>) -> Self {
        Self {
            api,
            state: BoardState::new(),
            interaction: Interaction::new(),
            in_flight: JoinSet::new(),
            failures: Vec::new(),
        }
    }

    /// Fetch categories, then items and order concurrently.
    pub async fn load(api: Arc<A>) -> ApiResult<Self> {
        let mut board = Self::new(api);
        board.reload().await?;
        Ok(board)
    }

    pub async fn reload(&mut self) -> ApiResult<()> {
        let categories = self.api.list_categories().await?;
        let (items, order) = tokio::try_join!(self.api.list_items(), self.api.get_order())?;
        tracing::info!(
            categories = categories.len(),
            items = items.len(),
            links = order.len(),
            "board loaded"
        );
        self.state = BoardState::from_parts(categories, items, order);
        Ok(())
    }

    pub fn state(&self) -> &BoardState {
        &self.state
    }

    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    pub fn api(&self) -> &Arc<A> {
        &self.api
    }

    // ========================
    // Drag and drop
    // ========================

    pub fn start_drag(&mut self, id: ItemId) {
        self.interaction.start_drag(id);
    }

    /// Drag ended without a drop: nothing happens.
    pub fn cancel_drag(&mut self) {
        self.interaction.cancel_drag();
    }

    /// Finish the current drag on `target`. Returns the applied patch.
    pub fn drop_on(&mut self, target: DropTarget) -> Patch {
        let Some(from) = self.interaction.take_drag() else {
            return Patch::new();
        };
        if target == DropTarget::Item(from.clone()) {
            return Patch::new();
        }
        self.move_item(&from, target.placement())
    }

    /// Move an item and send the patch. Returns the applied patch.
    pub fn move_item(&mut self, id: &ItemId, placement: Placement) -> Patch {
        if let Placement::Front(category) | Placement::End(category) = &placement {
            if self.state.category(category).is_none() {
                tracing::debug!(category = %category, "move to unknown category");
                return Patch::new();
            }
        }
        let patch = reorder_patch(self.state.order(), id, placement);
        if patch.is_empty() {
            tracing::debug!(item = %id, "move changes nothing");
            return patch;
        }

        self.state.apply_patch(&patch);
        self.send_patch(patch.clone());
        patch
    }

    // ========================
    // Creation
    // ========================

    pub fn set_draft(&mut self, category: &CategoryId, draft: ItemDraft) -> bool {
        self.state.set_draft(category, draft)
    }

    /// Create a card from the category's draft at the top of its column.
    pub fn add_item(&mut self, category: &CategoryId) -> Option<ItemId> {
        let Some(column) = self.state.category(category) else {
            tracing::debug!(category = %category, "add item to unknown category");
            return None;
        };
        let draft = column.draft.clone().unwrap_or_default();
        let item = Item {
            id: ItemId::generate(),
            date: draft.date,
            title: draft.title,
            text: draft.text,
        };

        // Links the category too when it has no entry yet.
        let patch = reorder_patch(self.state.order(), &item.id, Placement::Front(category.clone()));

        let id = item.id.clone();
        self.state.add_item(item.clone(), &patch);
        self.state.clear_draft_title(category);

        self.dispatch("POST /v1/items", move |api| async move { api.create_item(&item).await });
        self.send_patch(patch);
        Some(id)
    }

    /// Create an empty category after the existing ones.
    pub fn add_category(&mut self, title: &str) -> CategoryId {
        let record = CategoryRecord {
            id: CategoryId::generate(),
            title: Some(title.to_string()),
        };
        let id = record.id.clone();
        let patch = category_patch(self.state.order(), &id);

        self.state.add_category(record.clone(), &patch);

        self.dispatch("POST /v1/categories", move |api| async move {
            api.create_category(&record).await
        });
        self.send_patch(patch);
        id
    }

    // ========================
    // Deletion
    // ========================

    pub fn request_delete(&mut self, id: ItemId) {
        self.interaction.request_delete(id);
    }

    pub fn cancel_delete(&mut self) {
        self.interaction.cancel_delete();
    }

    /// Delete the item awaiting confirmation, if any.
    pub fn confirm_delete(&mut self) -> Option<Item> {
        let id = self.interaction.take_delete()?;
        self.delete_item(&id)
    }

    /// Remove an item from the pool and from its chain.
    pub fn delete_item(&mut self, id: &ItemId) -> Option<Item> {
        if !self.state.pool().contains(id) {
            tracing::debug!(item = %id, "delete of unknown item");
            return None;
        }
        let patch = reorder_patch(self.state.order(), id, Placement::Detach);
        let removed = self.state.remove_item(id, &patch);

        let target = id.clone();
        self.dispatch("DELETE /v1/item", move |api| async move { api.delete_item(&target).await });
        self.send_patch(patch);
        removed
    }

    // ========================
    // Remote dispatch
    // ========================

    /// Wait for every request sent so far and return the failed ones,
    /// including those that finished before this call.
    pub async fn settle(&mut self) -> Vec<ApiError> {
        while let Some(outcome) = self.in_flight.join_next().await {
            self.record(outcome);
        }
        std::mem::take(&mut self.failures)
    }

    /// Requests sent but not collected yet.
    pub fn pending_requests(&self) -> usize {
        self.in_flight.len()
    }

    /// Collect finished requests without waiting.
    fn reap(&mut self) {
        while let Some(outcome) = self.in_flight.try_join_next() {
            self.record(outcome);
        }
    }

    fn record(&mut self, outcome: Result<ApiResult<()>, JoinError>) {
        match outcome {
            Ok(Ok(())) => {}
            Ok(Err(e)) => self.failures.push(e),
            Err(e) => {
                tracing::error!("request task ended abnormally: {}", e);
                self.failures.push(ApiError::Aborted { reason: e.to_string() });
            }
        }
    }

    fn send_patch(&mut self, patch: Patch) {
        if patch.is_empty() {
            return;
        }
        self.dispatch("PATCH /v1/itemsOrder", move |api| async move {
            api.patch_order(&patch).await.map(|_| ())
        });
    }

    fn dispatch<F, Fut>(&mut self, request: &'static str, call: F)
    where
        F: FnOnce(Arc<A>) -> Fut,
        Fut: Future<Output = ApiResult<()>> + Send + 'static,
    {
        self.reap();
        let fut = call(Arc::clone(&self.api));
        self.in_flight.spawn(async move {
            let result = fut.await;
            if let Err(e) = &result {
                tracing::warn!(request, error = %e, "remote update failed, local change kept");
            }
            result
        });
    }
}
