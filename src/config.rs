//! Service configuration.
//!
//! Sources, lowest to highest priority:
//! 1. `Config::default()`
//! 2. TOML file (`CATALOG_CONFIG`, falling back to `config.toml`); optional
//! 3. Environment variables prefixed `CATALOG_`, nested with `__`
//!    (e.g. `CATALOG_BASIC__SECRET_KEY`, `CATALOG_UPLOADS__DIR`)

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;

use crate::error::CatalogError;

pub const DEFAULT_CONFIG_FILE: &str = "config.toml";
pub const CONFIG_PATH_ENV: &str = "CATALOG_CONFIG";
pub const ENV_PREFIX: &str = "CATALOG_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub uploads: UploadsConfig,
    pub admin: AdminSeedConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub listen_addr: String,
    pub database_url: String,
    pub loglevel: String,
    /// Cookie signing/encryption secret. At least 32 bytes; empty means "generate per process".
    pub secret_key: String,
    /// Drop the `Secure` cookie attribute (plain HTTP deployments and local dev).
    pub insecure_cookie: bool,
    pub session_ttl_secs: u64,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            listen_addr: "0.0.0.0:5000".to_string(),
            database_url: "sqlite:catalog.db".to_string(),
            loglevel: "info".to_string(),
            secret_key: String::new(),
            insecure_cookie: false,
            session_ttl_secs: 7 * 24 * 60 * 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UploadsConfig {
    pub dir: PathBuf,
    pub allowed_extensions: BTreeSet<String>,
    pub max_upload_bytes: usize,
}

impl Default for UploadsConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("uploads"),
            allowed_extensions: ["png", "jpg", "jpeg", "gif", "jfif"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Administrator account upserted at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AdminSeedConfig {
    pub username: String,
    pub password: String,
    /// Overwrite the password of an already existing admin on every start.
    pub reset_password_on_start: bool,
}

impl Default for AdminSeedConfig {
    fn default() -> Self {
        Self {
            username: "admin".to_string(),
            password: "123".to_string(),
            reset_password_on_start: false,
        }
    }
}

impl Config {
    /// Load defaults, then the TOML file, then `CATALOG_*` environment overrides.
    pub fn load() -> Result<Self, CatalogError> {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.into());
        Self::figment(Toml::file(path)).extract().map_err(Into::into)
    }

    fn figment(file: figment::providers::Data<Toml>) -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(file)
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn cookie_secure(&self) -> bool {
        !self.basic.insecure_cookie
    }
}
