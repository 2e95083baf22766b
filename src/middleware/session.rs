//! Login session carried in a private (encrypted and authenticated) cookie.
//!
//! The cookie holds only the user id and an absolute expiry; nothing is persisted server-side.

use axum_extra::extract::cookie::{Cookie, PrivateCookieJar, SameSite};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use time::Duration;
use tracing::debug;

use crate::db::models::AdminUser;
use crate::error::CatalogError;

pub const SESSION_COOKIE: &str = "stockroom_session";

/// Attributes shared by every cookie the service sets.
#[derive(Debug, Clone, Copy)]
pub struct CookiePolicy {
    pub secure: bool,
    pub session_ttl: Duration,
}

#[derive(Debug, Serialize, Deserialize)]
struct SessionClaims {
    uid: i64,
    /// Unix seconds.
    exp: i64,
}

/// Start a session for `user`.
pub fn establish(
    jar: PrivateCookieJar,
    policy: &CookiePolicy,
    user: &AdminUser,
) -> Result<PrivateCookieJar, CatalogError> {
    let claims = SessionClaims {
        uid: user.id,
        exp: Utc::now()
            .timestamp()
            .saturating_add(policy.session_ttl.whole_seconds()),
    };
    let value = serde_json::to_string(&claims)?;
    let cookie = build_cookie(SESSION_COOKIE, value, policy, Some(policy.session_ttl));
    Ok(jar.add(cookie))
}

pub fn tear_down(jar: PrivateCookieJar) -> PrivateCookieJar {
    jar.remove(clear_cookie(SESSION_COOKIE))
}

/// User id of a live session, if the cookie decrypts and has not expired.
pub fn session_user_id(jar: &PrivateCookieJar) -> Option<i64> {
    let cookie = jar.get(SESSION_COOKIE)?;
    let claims: SessionClaims = serde_json::from_str(cookie.value()).ok()?;
    if claims.exp <= Utc::now().timestamp() {
        debug!(user_id = claims.uid, "session expired");
        return None;
    }
    Some(claims.uid)
}

pub(crate) fn build_cookie(
    name: &str,
    value: String,
    policy: &CookiePolicy,
    max_age: Option<Duration>,
) -> Cookie<'static> {
    let mut cookie = Cookie::build(Cookie::new(name.to_string(), value))
        .path("/")
        .http_only(true)
        .secure(policy.secure)
        .same_site(SameSite::Lax)
        .build();
    if let Some(age) = max_age {
        cookie.set_max_age(age);
    }
    cookie
}

pub(crate) fn clear_cookie(name: &str) -> Cookie<'static> {
    Cookie::build(Cookie::new(name.to_string(), ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .build()
}
