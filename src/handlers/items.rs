use axum::{
    extract::{Multipart, Path, State},
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::PrivateCookieJar;
use tracing::{info, warn};

use crate::error::CatalogError;
use crate::middleware::auth::RequireAdmin;
use crate::middleware::flash::{self, FlashLevel};
use crate::middleware::session::CookiePolicy;
use crate::router::CatalogState;
use crate::service::item_form::ItemSubmission;
use crate::views::{AddItemTemplate, EditItemTemplate, ItemView, PageContext, render};

pub const ADD_ITEM_PATH: &str = "/admin/add_item";
pub const NO_IMAGE_MESSAGE: &str = "No image selected for upload";

fn edit_item_path(id: i64) -> String {
    format!("/admin/edit_item/{id}")
}

/// Non-numeric ids are treated like unknown ones.
fn parse_item_id(raw: &str) -> Result<i64, CatalogError> {
    raw.parse().map_err(|_| CatalogError::NotFound)
}

/// Send the browser back to the form with an error notice; nothing has been written.
fn reject(
    jar: PrivateCookieJar,
    cookies: &CookiePolicy,
    back_to: &str,
    message: String,
) -> Response {
    warn!(path = back_to, reason = %message, "item form rejected");
    let jar = flash::push(jar, cookies, FlashLevel::Error, message);
    (jar, Redirect::to(back_to)).into_response()
}

fn done(jar: PrivateCookieJar, cookies: &CookiePolicy, message: &str) -> Response {
    let jar = flash::push(jar, cookies, FlashLevel::Success, message);
    (jar, Redirect::to("/")).into_response()
}

/// GET /admin/add_item
pub async fn add_item_page(
    RequireAdmin(user): RequireAdmin,
    jar: PrivateCookieJar,
) -> Result<impl IntoResponse, CatalogError> {
    let (jar, flashes) = flash::take(jar);
    let template = AddItemTemplate {
        page: PageContext::new(Some(&user), flashes),
    };
    Ok((jar, render(&template)?))
}

/// POST /admin/add_item -> requires an allow-listed image; stores it on disk and in the row.
pub async fn add_item_submit(
    State(state): State<CatalogState>,
    RequireAdmin(user): RequireAdmin,
    jar: PrivateCookieJar,
    multipart: Multipart,
) -> Result<Response, CatalogError> {
    let submission = ItemSubmission::from_multipart(multipart).await?;

    let Some(image) = submission.image.as_ref() else {
        return Ok(reject(
            jar,
            &state.cookies,
            ADD_ITEM_PATH,
            NO_IMAGE_MESSAGE.to_string(),
        ));
    };
    if !state.uploads.is_allowed(&image.file_name) {
        let message = state.uploads.rejection_message();
        return Ok(reject(jar, &state.cookies, ADD_ITEM_PATH, message));
    }
    let draft = match submission.draft() {
        Ok(draft) => draft,
        Err(CatalogError::Validation(message)) => {
            return Ok(reject(jar, &state.cookies, ADD_ITEM_PATH, message));
        }
        Err(e) => return Err(e),
    };

    state.uploads.save(image).await?;
    let id = state.items.insert(&draft, Some(&image.bytes)).await?;
    info!(
        item_id = id,
        title = %draft.title,
        category = %draft.category,
        image_bytes = image.bytes.len(),
        user_id = user.id,
        "item added"
    );
    Ok(done(jar, &state.cookies, "Item added successfully!"))
}

/// GET /admin/edit_item/{item_id}
pub async fn edit_item_page(
    State(state): State<CatalogState>,
    RequireAdmin(user): RequireAdmin,
    jar: PrivateCookieJar,
    Path(item_id): Path<String>,
) -> Result<impl IntoResponse, CatalogError> {
    let item = state.items.get(parse_item_id(&item_id)?).await?;

    let (jar, flashes) = flash::take(jar);
    let template = EditItemTemplate {
        page: PageContext::new(Some(&user), flashes),
        item: ItemView::from(&item),
    };
    Ok((jar, render(&template)?))
}

/// POST /admin/edit_item/{item_id} -> overwrite all fields; a new image is optional.
pub async fn edit_item_submit(
    State(state): State<CatalogState>,
    RequireAdmin(user): RequireAdmin,
    jar: PrivateCookieJar,
    Path(item_id): Path<String>,
    multipart: Multipart,
) -> Result<Response, CatalogError> {
    let id = parse_item_id(&item_id)?;
    state.items.get(id).await?;
    let back_to = edit_item_path(id);

    let submission = ItemSubmission::from_multipart(multipart).await?;
    let draft = match submission.draft() {
        Ok(draft) => draft,
        Err(CatalogError::Validation(message)) => {
            return Ok(reject(jar, &state.cookies, &back_to, message));
        }
        Err(e) => return Err(e),
    };
    if let Some(image) = submission.image.as_ref() {
        if !state.uploads.is_allowed(&image.file_name) {
            let message = state.uploads.rejection_message();
            return Ok(reject(jar, &state.cookies, &back_to, message));
        }
        state.uploads.save(image).await?;
    }

    let new_image = submission.image.as_ref().map(|f| f.bytes.as_slice());
    state.items.update(id, &draft, new_image).await?;
    info!(
        item_id = id,
        title = %draft.title,
        image_replaced = new_image.is_some(),
        user_id = user.id,
        "item updated"
    );
    Ok(done(jar, &state.cookies, "Item updated successfully!"))
}

/// POST /admin/delete_item/{item_id}
pub async fn delete_item(
    State(state): State<CatalogState>,
    RequireAdmin(user): RequireAdmin,
    jar: PrivateCookieJar,
    Path(item_id): Path<String>,
) -> Result<Response, CatalogError> {
    let id = parse_item_id(&item_id)?;
    state.items.delete(id).await?;
    info!(item_id = id, user_id = user.id, "item deleted");
    Ok(done(jar, &state.cookies, "Item deleted successfully!"))
}
