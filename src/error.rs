use askama::Template;
use axum::extract::multipart::MultipartError;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

use crate::views::{ErrorTemplate, PageContext};

#[derive(Debug, ThisError)]
pub enum CatalogError {
    #[error("Item not found")]
    NotFound,

    #[error("{0}")]
    Validation(String),

    #[error("Invalid username or password")]
    AuthFailure,

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Multipart error: {0}")]
    Multipart(#[from] MultipartError),

    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    #[error("Invalid secret key: {0}")]
    InvalidSecretKey(String),
}

impl From<figment::Error> for CatalogError {
    fn from(e: figment::Error) -> Self {
        CatalogError::Config(Box::new(e))
    }
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::NotFound => StatusCode::NOT_FOUND,
            CatalogError::Validation(_) => StatusCode::BAD_REQUEST,
            CatalogError::AuthFailure => StatusCode::UNAUTHORIZED,
            CatalogError::Multipart(e) => e.status(),
            CatalogError::Json(_)
            | CatalogError::DatabaseError(_)
            | CatalogError::Io(_)
            | CatalogError::Template(_)
            | CatalogError::PasswordHash(_)
            | CatalogError::Config(_)
            | CatalogError::InvalidSecretKey(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            CatalogError::NotFound => "The requested URL was not found on the server.".to_string(),
            CatalogError::Validation(msg) => msg.clone(),
            CatalogError::AuthFailure => self.to_string(),
            CatalogError::Multipart(e) => e.body_text(),
            _ => {
                error!(error = %self, "request failed");
                "An internal server error occurred.".to_string()
            }
        };

        let page = ErrorTemplate {
            page: PageContext::default(),
            status: status.as_u16(),
            reason: status.canonical_reason().unwrap_or("Error"),
            message,
        };
        match page.render() {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                error!(error = %e, "failed to render error page");
                (status, status.canonical_reason().unwrap_or("Error")).into_response()
            }
        }
    }
}
