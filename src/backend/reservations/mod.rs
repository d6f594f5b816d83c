//! Local reservations
//!
//! - **`db`** - Upsert and listing of canonical reservations
//! - **`handlers`** - `GET /api/reservations`

pub mod db;
pub mod handlers;
