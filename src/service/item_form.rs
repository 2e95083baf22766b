//! Add/edit item form: multipart decoding and field validation.

use axum::extract::Multipart;
use std::collections::HashMap;

use crate::db::models::ItemDraft;
use crate::error::CatalogError;
use crate::service::uploads::UploadedFile;

pub const IMAGE_FIELD: &str = "image";

/// Raw submission: text fields plus the optional image part.
#[derive(Debug, Default)]
pub struct ItemSubmission {
    pub fields: HashMap<String, String>,
    pub image: Option<UploadedFile>,
}

impl ItemSubmission {
    /// Drain a multipart body. An image part with no filename or no bytes is treated as absent.
    pub async fn from_multipart(mut multipart: Multipart) -> Result<Self, CatalogError> {
        let mut submission = Self::default();
        while let Some(field) = multipart.next_field().await? {
            let Some(name) = field.name().map(str::to_string) else {
                continue;
            };
            if name == IMAGE_FIELD {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let bytes = field.bytes().await?.to_vec();
                let file = UploadedFile { file_name, bytes };
                submission.image = (!file.is_empty()).then_some(file);
            } else {
                let value = field.text().await?;
                submission.fields.insert(name, value);
            }
        }
        Ok(submission)
    }

    fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or_default()
    }

    /// Validate the text fields. Title, category, quantity and price are required;
    /// blank details are stored as NULL.
    pub fn draft(&self) -> Result<ItemDraft, CatalogError> {
        let title = self.field("title").trim();
        if title.is_empty() {
            return Err(CatalogError::Validation("Title is required.".into()));
        }
        let category = self.field("category").trim();
        if category.is_empty() {
            return Err(CatalogError::Validation("Category is required.".into()));
        }
        let quantity = self
            .field("quantity")
            .trim()
            .parse::<i64>()
            .map_err(|_| CatalogError::Validation("Quantity must be a whole number.".into()))?;
        let price = self
            .field("price")
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|p| p.is_finite())
            .ok_or_else(|| CatalogError::Validation("Price must be a number.".into()))?;
        let details = Some(self.field("details").trim())
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        Ok(ItemDraft {
            title: title.to_string(),
            category: category.to_string(),
            quantity,
            details,
            price,
        })
    }
}
