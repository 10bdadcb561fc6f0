//! Kanban Board Client
//!
//! Categories hold ordered cards. The order lives in one flat linked map
//! maintained by `item_order`; this crate loads the board from the REST
//! store, applies changes locally and forwards them as minimal patches.

pub mod api;
pub mod board;
pub mod config;
pub mod context;
pub mod models;
pub mod store;

pub use api::{ApiError, ApiResult, BoardApi, HttpApi, MemoryApi};
pub use board::Board;
pub use config::{Config, ConfigError};
pub use context::{DropTarget, Interaction};
pub use item_order;
pub use models::{Category, CategoryRecord, Item, ItemDraft};
pub use store::BoardState;
