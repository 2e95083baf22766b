//! Database module: models, schema and stores for persistent storage.
//!
//! Layout:
//! - `models.rs`: Rust structs mirroring DB rows plus the form-facing draft type
//! - `schema.rs`: SQL DDL for initializing the database (SQLite-first)
//! - `sqlite.rs`: pool construction and schema bootstrap
//! - `items.rs` / `users.rs`: one store per table

pub mod items;
pub mod models;
pub mod schema;
pub mod sqlite;
pub mod users;

pub use items::ItemStore;
pub use models::{AdminUser, Item, ItemDraft};
pub use schema::SQLITE_INIT;
pub use sqlite::{SqlitePool, open};
pub use users::UserStore;
