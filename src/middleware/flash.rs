//! One-shot notices that survive a single redirect.

use axum_extra::extract::cookie::PrivateCookieJar;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::middleware::session::{CookiePolicy, build_cookie, clear_cookie};

pub const FLASH_COOKIE: &str = "stockroom_flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlashLevel {
    Success,
    Info,
    Error,
}

impl FlashLevel {
    pub fn css_class(&self) -> &'static str {
        match self {
            FlashLevel::Success => "success",
            FlashLevel::Info => "info",
            FlashLevel::Error => "danger",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }
}

/// Queue a notice for the next rendered page.
pub fn push(
    jar: PrivateCookieJar,
    policy: &CookiePolicy,
    level: FlashLevel,
    message: impl Into<String>,
) -> PrivateCookieJar {
    let mut queued = peek(&jar);
    queued.push(Flash {
        level,
        message: message.into(),
    });
    match serde_json::to_string(&queued) {
        Ok(value) => jar.add(build_cookie(FLASH_COOKIE, value, policy, None)),
        Err(e) => {
            warn!(error = %e, "failed to encode flash messages");
            jar
        }
    }
}

/// Drain queued notices.
pub fn take(jar: PrivateCookieJar) -> (PrivateCookieJar, Vec<Flash>) {
    if jar.get(FLASH_COOKIE).is_none() {
        return (jar, Vec::new());
    }
    let queued = peek(&jar);
    (jar.remove(clear_cookie(FLASH_COOKIE)), queued)
}

fn peek(jar: &PrivateCookieJar) -> Vec<Flash> {
    jar.get(FLASH_COOKIE)
        .and_then(|c| serde_json::from_str(c.value()).ok())
        .unwrap_or_default()
}
