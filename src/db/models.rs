use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// One catalog row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Item {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub quantity: i64,
    pub details: Option<String>,
    pub price: f64,
    pub image: Option<Vec<u8>>,
}

/// Validated, image-less field set written by insert and update.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub title: String,
    pub category: String,
    pub quantity: i64,
    pub details: Option<String>,
    pub price: f64,
}

/// Administrator account. The hash is an argon2 PHC string, never the password itself.
#[derive(Debug, Clone, PartialEq)]
pub struct AdminUser {
    pub id: i64,
    pub username: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}
