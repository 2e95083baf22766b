use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::middleware::auth::{MaybeAdmin, RequireAdmin};
use crate::middleware::flash::{self, Flash};
use crate::middleware::session;
use crate::router::CatalogState;
use crate::views::{LoginTemplate, PageContext, render};

#[derive(Debug, Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

#[derive(Deserialize)]
pub struct LoginForm {
    username: String,
    password: String,
    #[serde(default)]
    next: Option<String>,
}

/// Only local absolute paths are followed after login; anything else falls back to `/`.
pub fn safe_next(next: Option<&str>) -> &str {
    match next {
        Some(n)
            if n.starts_with('/')
                && !n.starts_with("//")
                && !n.contains('\\')
                && !n.chars().any(char::is_control) =>
        {
            n
        }
        _ => "/",
    }
}

/// GET /login
pub async fn login_page(
    MaybeAdmin(admin): MaybeAdmin,
    jar: PrivateCookieJar,
    Query(query): Query<NextQuery>,
) -> Result<Response, CatalogError> {
    if admin.is_some() {
        return Ok(Redirect::to(safe_next(query.next.as_deref())).into_response());
    }

    let (jar, flashes) = flash::take(jar);
    let template = LoginTemplate {
        page: PageContext::new(None, flashes),
        username: String::new(),
        next: remembered_next(query.next.as_deref()),
    };
    Ok((jar, render(&template)?).into_response())
}

/// POST /login -> session + redirect on success; the form again with a notice on failure.
pub async fn login_submit(
    State(state): State<CatalogState>,
    jar: PrivateCookieJar,
    Query(query): Query<NextQuery>,
    Form(form): Form<LoginForm>,
) -> Result<Response, CatalogError> {
    let next = form
        .next
        .as_deref()
        .filter(|n| !n.is_empty())
        .or(query.next.as_deref());

    match state
        .users
        .verify_credentials(&form.username, &form.password)
        .await?
    {
        Some(user) => {
            info!(user_id = user.id, username = %user.username, "admin logged in");
            let jar = session::establish(jar, &state.cookies, &user)?;
            Ok((jar, Redirect::to(safe_next(next))).into_response())
        }
        None => {
            warn!(username = %form.username, "rejected login attempt");
            let (jar, mut flashes) = flash::take(jar);
            flashes.push(Flash::error(CatalogError::AuthFailure.to_string()));
            let template = LoginTemplate {
                page: PageContext::new(None, flashes),
                username: form.username,
                next: remembered_next(next),
            };
            Ok((jar, render(&template)?).into_response())
        }
    }
}

/// GET /logout
pub async fn logout(RequireAdmin(user): RequireAdmin, jar: PrivateCookieJar) -> impl IntoResponse {
    info!(user_id = user.id, username = %user.username, "admin logged out");
    (session::tear_down(jar), Redirect::to("/"))
}

fn remembered_next(next: Option<&str>) -> String {
    match safe_next(next) {
        "/" => String::new(),
        n => n.to_string(),
    }
}
