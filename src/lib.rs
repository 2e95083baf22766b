pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod service;
pub mod views;

pub use config::Config;
pub use error::CatalogError;
pub use router::{CatalogState, catalog_router};
