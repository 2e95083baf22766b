//! SQL DDL for initializing the catalog storage.

/// SQLite schema with:
/// - `items`: catalog rows; `image` holds the raw uploaded bytes
/// - `users`: administrator accounts; `username` UNIQUE so the seed step can upsert on it
///
/// `created_at` / `last_login` are RFC3339 text.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS items (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    title TEXT NOT NULL,
    category TEXT NOT NULL,
    quantity INTEGER NOT NULL,
    details TEXT NULL,
    price REAL NOT NULL,
    image BLOB NULL
);

CREATE INDEX IF NOT EXISTS idx_items_category ON items(category);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    created_at TEXT NOT NULL,
    last_login TEXT NULL
);
"#;
