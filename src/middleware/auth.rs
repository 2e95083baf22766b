use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::debug;

use crate::db::models::AdminUser;
use crate::error::CatalogError;
use crate::middleware::flash::{self, FlashLevel};
use crate::middleware::session;
use crate::router::CatalogState;

pub const LOGIN_PATH: &str = "/login";
pub const LOGIN_REQUIRED_MESSAGE: &str = "Please log in to access this page.";

/// Resolve the session cookie to a live administrator.
///
/// The session counts only when the cookie decrypts, is unexpired, and its user still exists.
pub async fn current_admin(
    parts: &Parts,
    state: &CatalogState,
) -> Result<Option<AdminUser>, CatalogError> {
    let jar = PrivateCookieJar::from_headers(&parts.headers, state.key().clone());
    let Some(user_id) = session::session_user_id(&jar) else {
        return Ok(None);
    };
    let user = state.users.find_by_id(user_id).await?;
    if user.is_none() {
        debug!(user_id, "session refers to a missing user");
    }
    Ok(user)
}

/// `/login?next=<path and query>` for the request being turned away.
pub fn login_redirect_target(parts: &Parts) -> String {
    let original = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");
    let query = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("next", original)
        .finish();
    format!("{LOGIN_PATH}?{query}")
}

/// Gate for item-mutation routes and logout.
/// Without a session the request is redirected to the login page, remembering where it was going.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub AdminUser);

impl FromRequestParts<CatalogState> for RequireAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CatalogState,
    ) -> Result<Self, Self::Rejection> {
        match current_admin(parts, state).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => {
                let jar = PrivateCookieJar::from_headers(&parts.headers, state.key().clone());
                let jar = session::tear_down(jar);
                let jar = flash::push(
                    jar,
                    &state.cookies,
                    FlashLevel::Info,
                    LOGIN_REQUIRED_MESSAGE,
                );
                Err((jar, Redirect::to(&login_redirect_target(parts))).into_response())
            }
            Err(e) => Err(e.into_response()),
        }
    }
}

/// Public pages use this to show admin controls when someone is logged in.
#[derive(Debug, Clone)]
pub struct MaybeAdmin(pub Option<AdminUser>);

impl FromRequestParts<CatalogState> for MaybeAdmin {
    type Rejection = Response;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &CatalogState,
    ) -> Result<Self, Self::Rejection> {
        current_admin(parts, state)
            .await
            .map(Self)
            .map_err(IntoResponse::into_response)
    }
}
