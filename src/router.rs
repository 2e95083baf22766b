use axum::{
    Router,
    extract::{DefaultBodyLimit, FromRef},
    routing::{get, post},
};
use axum_extra::extract::cookie::Key;
use std::sync::Arc;
use time::Duration;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::Config;
use crate::db::{self, ItemStore, SqlitePool, UserStore};
use crate::error::CatalogError;
use crate::handlers::{auth, catalog, items};
use crate::middleware::session::CookiePolicy;
use crate::service::admin_seed;
use crate::service::uploads::UploadPolicy;

/// Minimum secret length accepted for cookie key derivation.
pub const MIN_SECRET_LEN: usize = 32;

/// Shared handler state. Cheap to clone; stores wrap a pooled connection handle.
#[derive(Clone)]
pub struct CatalogState {
    pub items: ItemStore,
    pub users: UserStore,
    pub uploads: Arc<UploadPolicy>,
    pub cookies: CookiePolicy,
    pub body_limit: usize,
    key: Key,
}

impl FromRef<CatalogState> for Key {
    fn from_ref(state: &CatalogState) -> Self {
        state.key.clone()
    }
}

impl CatalogState {
    pub fn new(pool: SqlitePool, cfg: &Config) -> Result<Self, CatalogError> {
        Ok(Self {
            items: ItemStore::new(pool.clone()),
            users: UserStore::new(pool),
            uploads: Arc::new(UploadPolicy::from_config(&cfg.uploads)),
            cookies: CookiePolicy {
                secure: cfg.cookie_secure(),
                session_ttl: Duration::seconds(
                    i64::try_from(cfg.basic.session_ttl_secs).unwrap_or(i64::MAX),
                ),
            },
            body_limit: cfg.uploads.max_upload_bytes,
            key: cookie_key(&cfg.basic.secret_key)?,
        })
    }

    /// Open the database, prepare the upload directory and seed the administrator.
    pub async fn bootstrap(cfg: &Config) -> Result<Self, CatalogError> {
        let pool = db::open(&cfg.basic.database_url).await?;
        let state = Self::new(pool, cfg)?;
        state.uploads.ensure_dir().await?;
        admin_seed::seed_admin(&state.users, &cfg.admin).await?;
        info!(
            upload_dir = %state.uploads.dir().display(),
            secure_cookies = state.cookies.secure,
            "catalog state initialized"
        );
        Ok(state)
    }

    pub fn key(&self) -> &Key {
        &self.key
    }
}

/// Derive the cookie key from the configured secret; an empty secret gets a random per-process key.
pub fn cookie_key(secret: &str) -> Result<Key, CatalogError> {
    if secret.is_empty() {
        warn!("no secret_key configured; sessions will not survive a restart");
        return Ok(Key::generate());
    }
    if secret.len() < MIN_SECRET_LEN {
        return Err(CatalogError::InvalidSecretKey(format!(
            "must be at least {MIN_SECRET_LEN} bytes, got {}",
            secret.len()
        )));
    }
    Ok(Key::derive_from(secret.as_bytes()))
}

pub fn catalog_router(state: CatalogState) -> Router {
    let body_limit = state.body_limit;
    Router::new()
        .route("/", get(catalog::browse))
        .route("/login", get(auth::login_page).post(auth::login_submit))
        .route("/logout", get(auth::logout))
        .route(
            "/admin/add_item",
            get(items::add_item_page).post(items::add_item_submit),
        )
        .route(
            "/admin/edit_item/{item_id}",
            get(items::edit_item_page).post(items::edit_item_submit),
        )
        .route("/admin/delete_item/{item_id}", post(items::delete_item))
        .fallback(catalog::not_found)
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_secrets_are_refused() {
        assert!(matches!(
            cookie_key("too-short"),
            Err(CatalogError::InvalidSecretKey(_))
        ));
        assert!(cookie_key(&"k".repeat(MIN_SECRET_LEN)).is_ok());
        assert!(cookie_key("").is_ok());
    }

    #[test]
    fn same_secret_derives_the_same_key() {
        let secret = "s".repeat(48);
        let a = cookie_key(&secret).unwrap();
        let b = cookie_key(&secret).unwrap();
        assert_eq!(a.master(), b.master());
    }
}
