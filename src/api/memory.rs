//! In-Process Implementation
//!
//! Holds the board in memory and answers the same contract as the REST
//! endpoint. Used for offline demos and tests; can be switched to fail every
//! request to exercise the error path.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use item_order::{ItemId, OrderMap, Patch};
use tokio::sync::Mutex;

use super::{ApiError, ApiResult, BoardApi};
use crate::models::{CategoryRecord, Item};

#[derive(Debug, Default)]
struct Stored {
    categories: Vec<CategoryRecord>,
    items: Vec<Item>,
    order: OrderMap,
    calls: Vec<String>,
}

#[derive(Debug, Default)]
pub struct MemoryApi {
    stored: Mutex<Stored>,
    failing: AtomicBool,
}

impl MemoryApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_board(categories: Vec<CategoryRecord>, items: Vec<Item>, order: OrderMap) -> Self {
        Self {
            stored: Mutex::new(Stored {
                categories,
                items,
                order,
                calls: Vec::new(),
            }),
            failing: AtomicBool::new(false),
        }
    }

    /// Make every following request fail with `503 Service Unavailable`.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn order(&self) -> OrderMap {
        self.stored.lock().await.order.clone()
    }

    pub async fn items(&self) -> Vec<Item> {
        self.stored.lock().await.items.clone()
    }

    pub async fn categories(&self) -> Vec<CategoryRecord> {
        self.stored.lock().await.categories.clone()
    }

    /// `"METHOD path"` of every request received, failed ones included.
    pub async fn calls(&self) -> Vec<String> {
        self.stored.lock().await.calls.clone()
    }

    async fn begin(&self, method: &str, path: &str) -> ApiResult<tokio::sync::MutexGuard<'_, Stored>> {
        let mut stored = self.stored.lock().await;
        stored.calls.push(format!("{} {}", method, path));
        if self.failing.load(Ordering::SeqCst) {
            return Err(ApiError::Status {
                method: method.to_string(),
                url: format!("memory://{}", path),
                status: 503,
                status_text: "Service Unavailable".to_string(),
                body: String::new(),
            });
        }
        Ok(stored)
    }
}

#[async_trait]
impl BoardApi for MemoryApi {
    async fn list_categories(&self) -> ApiResult<Vec<CategoryRecord>> {
        let stored = self.begin("GET", "/v1/categories").await?;
        Ok(stored.categories.clone())
    }

    async fn create_category(&self, category: &CategoryRecord) -> ApiResult<()> {
        let mut stored = self.begin("POST", "/v1/categories").await?;
        stored.categories.push(category.clone());
        Ok(())
    }

    async fn list_items(&self) -> ApiResult<Vec<Item>> {
        let stored = self.begin("GET", "/v1/items").await?;
        Ok(stored.items.clone())
    }

    async fn create_item(&self, item: &Item) -> ApiResult<()> {
        let mut stored = self.begin("POST", "/v1/items").await?;
        stored.items.push(item.clone());
        Ok(())
    }

    async fn delete_item(&self, id: &ItemId) -> ApiResult<()> {
        let path = format!("/v1/item/{}", id);
        let mut stored = self.begin("DELETE", &path).await?;
        stored.items.retain(|item| &item.id != id);
        Ok(())
    }

    async fn get_order(&self) -> ApiResult<OrderMap> {
        let stored = self.begin("GET", "/v1/itemsOrder").await?;
        Ok(stored.order.clone())
    }

    async fn patch_order(&self, patch: &Patch) -> ApiResult<Patch> {
        let mut stored = self.begin("PATCH", "/v1/itemsOrder").await?;
        let order = std::mem::take(&mut stored.order);
        stored.order = order.merge(patch);
        Ok(patch.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use item_order::NodeId;

    #[tokio::test]
    async fn test_patch_merges_into_stored_order() {
        let api = MemoryApi::new();
        let mut patch = Patch::new();
        patch.link(NodeId::new("todo"), NodeId::new("todo"));

        let echoed = api.patch_order(&patch).await.unwrap();

        assert_eq!(echoed, patch);
        assert_eq!(api.order().await.successor(&NodeId::new("todo")), Some(&NodeId::new("todo")));
        assert_eq!(api.calls().await, vec!["PATCH /v1/itemsOrder".to_string()]);
    }

    #[tokio::test]
    async fn test_failing_requests_change_nothing() {
        let api = MemoryApi::new();
        api.set_failing(true);

        let record = CategoryRecord {
            id: "todo".into(),
            title: None,
        };
        let err = api.create_category(&record).await.unwrap_err();

        assert!(err.to_string().contains("503"));
        assert!(api.categories().await.is_empty());
        assert_eq!(api.calls().await.len(), 1);
    }
}
