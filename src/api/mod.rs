//! REST API Bindings
//!
//! The wire contract the board relies on, organized as one trait with an
//! HTTP implementation and an in-process one.

mod http;
pub mod memory;

use async_trait::async_trait;
use item_order::{ItemId, OrderMap, Patch};
use thiserror::Error;

use crate::models::{CategoryRecord, Item};

pub use http::HttpApi;
pub use memory::MemoryApi;

/// Common result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

/// Transport-level failures. The ordering core never produces these.
#[derive(Debug, Clone, Error)]
pub enum ApiError {
    /// Server answered with a non-success status.
    #[error("{method} {url} {status} ({status_text})")]
    Status {
        method: String,
        url: String,
        status: u16,
        status_text: String,
        body: String,
    },

    /// Request never got an answer (connection, timeout, client setup).
    #[error("{method} {url} failed: {reason}")]
    Transport {
        method: String,
        url: String,
        reason: String,
    },

    /// The task carrying the request panicked or was cancelled.
    #[error("request task ended abnormally: {reason}")]
    Aborted { reason: String },

    /// Answer was not the expected JSON.
    #[error("{method} {url} returned malformed JSON: {reason}")]
    Decode {
        method: String,
        url: String,
        reason: String,
    },
}

/// Remote board store.
///
/// Creation/deletion and the order patch that links or unlinks the entity are
/// always separate calls.
#[async_trait]
pub trait BoardApi: Send + Sync {
    /// `GET /v1/categories`
    async fn list_categories(&self) -> ApiResult<Vec<CategoryRecord>>;

    /// `POST /v1/categories`
    async fn create_category(&self, category: &CategoryRecord) -> ApiResult<()>;

    /// `GET /v1/items`
    async fn list_items(&self) -> ApiResult<Vec<Item>>;

    /// `POST /v1/items`
    async fn create_item(&self, item: &Item) -> ApiResult<()>;

    /// `DELETE /v1/item/{id}`
    async fn delete_item(&self, id: &ItemId) -> ApiResult<()>;

    /// `GET /v1/itemsOrder`
    async fn get_order(&self) -> ApiResult<OrderMap>;

    /// `PATCH /v1/itemsOrder`, returns the applied mapping
    async fn patch_order(&self, patch: &Patch) -> ApiResult<Patch>;
}
