use axum::{
    extract::{Query, State},
    response::IntoResponse,
};
use axum_extra::extract::cookie::PrivateCookieJar;
use serde::Deserialize;

use crate::error::CatalogError;
use crate::middleware::auth::MaybeAdmin;
use crate::middleware::flash;
use crate::router::CatalogState;
use crate::views::{IndexTemplate, ItemView, PageContext, render};

#[derive(Debug, Deserialize)]
pub struct BrowseQuery {
    pub search: Option<String>,
}

/// GET / -> every item, or those whose category contains `search` (trimmed).
pub async fn browse(
    State(state): State<CatalogState>,
    MaybeAdmin(admin): MaybeAdmin,
    jar: PrivateCookieJar,
    Query(query): Query<BrowseQuery>,
) -> Result<impl IntoResponse, CatalogError> {
    let search = query.search.as_deref().unwrap_or_default().trim().to_string();
    let items = if search.is_empty() {
        state.items.list_all().await?
    } else {
        state.items.search_by_category(&search).await?
    };

    let (jar, flashes) = flash::take(jar);
    let template = IndexTemplate {
        page: PageContext::new(admin.as_ref(), flashes),
        items: items.iter().map(ItemView::from).collect(),
        search,
    };
    Ok((jar, render(&template)?))
}

pub async fn not_found() -> CatalogError {
    CatalogError::NotFound
}
