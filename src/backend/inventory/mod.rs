//! Local inventory
//!
//! - **`db`** - Upsert and listing of inventory items
//! - **`handlers`** - `GET /api/inventory`

pub mod db;
pub mod handlers;
