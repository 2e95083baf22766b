//! Askama templates for the catalog pages.

use askama::Template;
use axum::response::Html;
use base64::Engine;

use crate::db::models::{AdminUser, Item};
use crate::error::CatalogError;
use crate::middleware::flash::Flash;

/// Data every page shares through `base.html`.
#[derive(Debug, Default)]
pub struct PageContext {
    pub admin: Option<String>,
    pub flashes: Vec<Flash>,
}

impl PageContext {
    pub fn new(admin: Option<&AdminUser>, flashes: Vec<Flash>) -> Self {
        Self {
            admin: admin.map(|u| u.username.clone()),
            flashes,
        }
    }
}

/// Item as the templates see it.
#[derive(Debug)]
pub struct ItemView {
    pub id: i64,
    pub title: String,
    pub category: String,
    pub quantity: i64,
    pub details: String,
    pub price: String,
    pub price_input: String,
    pub image_src: Option<String>,
}

impl From<&Item> for ItemView {
    fn from(item: &Item) -> Self {
        Self {
            id: item.id,
            title: item.title.clone(),
            category: item.category.clone(),
            quantity: item.quantity,
            details: item.details.clone().unwrap_or_default(),
            price: format!("{:.2}", item.price),
            price_input: item.price.to_string(),
            image_src: item.image.as_deref().filter(|b| !b.is_empty()).map(data_uri),
        }
    }
}

/// Inline `data:` URI for stored image bytes.
pub fn data_uri(bytes: &[u8]) -> String {
    format!(
        "data:{};base64,{}",
        sniff_image_mime(bytes),
        base64::engine::general_purpose::STANDARD.encode(bytes)
    )
}

/// MIME type from magic bytes; JPEG when unrecognised.
pub fn sniff_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0x89, b'P', b'N', b'G', ..] => "image/png",
        [b'G', b'I', b'F', b'8', ..] => "image/gif",
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [b'R', b'I', b'F', b'F', _, _, _, _, b'W', b'E', b'B', b'P', ..] => "image/webp",
        _ => "image/jpeg",
    }
}

pub fn render<T: Template>(template: &T) -> Result<Html<String>, CatalogError> {
    Ok(Html(template.render()?))
}

#[derive(Template)]
#[template(path = "index.html")]
pub struct IndexTemplate {
    pub page: PageContext,
    pub items: Vec<ItemView>,
    pub search: String,
}

#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub username: String,
    pub next: String,
}

#[derive(Template)]
#[template(path = "add_item.html")]
pub struct AddItemTemplate {
    pub page: PageContext,
}

#[derive(Template)]
#[template(path = "edit_item.html")]
pub struct EditItemTemplate {
    pub page: PageContext,
    pub item: ItemView,
}

#[derive(Template)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub page: PageContext,
    pub status: u16,
    pub reason: &'static str,
    pub message: String,
}
