//! Item Order
//!
//! Keeps the order of board items as linked chains inside one flat map:
//! - order_map: the successor map and the patches merged into it
//! - materialize: chain traversal into ordered columns
//! - planner: minimal patches for moves, insertions and deletions

mod id;
mod materialize;
mod order_map;
mod planner;

pub use id::{CategoryId, ItemId, NodeId};
pub use materialize::{materialize, materialize_columns, ItemPool, PoolEntry};
pub use order_map::{OrderMap, Patch};
pub use planner::{category_patch, chain_patch, reorder_patch, Placement};
