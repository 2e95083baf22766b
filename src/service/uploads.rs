//! Image upload policy: extension allow-list, filename sanitising, and the on-disk copy.

use crate::config::UploadsConfig;
use crate::error::CatalogError;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// File part received from a multipart form.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Browsers submit an empty part when no file was chosen.
    pub fn is_empty(&self) -> bool {
        self.file_name.is_empty() || self.bytes.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct UploadPolicy {
    dir: PathBuf,
    allowed_extensions: BTreeSet<String>,
}

impl UploadPolicy {
    pub fn new(
        dir: impl Into<PathBuf>,
        allowed_extensions: impl IntoIterator<Item = String>,
    ) -> Self {
        Self {
            dir: dir.into(),
            allowed_extensions: allowed_extensions
                .into_iter()
                .map(|ext| ext.to_ascii_lowercase())
                .collect(),
        }
    }

    pub fn from_config(cfg: &UploadsConfig) -> Self {
        Self::new(cfg.dir.clone(), cfg.allowed_extensions.iter().cloned())
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// `filename` must contain a `.` and its lowercased final suffix must be allow-listed.
    pub fn is_allowed(&self, filename: &str) -> bool {
        filename
            .rsplit_once('.')
            .is_some_and(|(_, ext)| self.allowed_extensions.contains(&ext.to_lowercase()))
    }

    /// User-facing rejection notice listing the accepted extensions.
    pub fn rejection_message(&self) -> String {
        let allowed: Vec<&str> = self.allowed_extensions.iter().map(String::as_str).collect();
        format!(
            "Invalid file type for image. Allowed types are {}.",
            allowed.join(", ")
        )
    }

    pub async fn ensure_dir(&self) -> Result<(), CatalogError> {
        tokio::fs::create_dir_all(&self.dir).await?;
        debug!(path = %self.dir.display(), "upload directory ready");
        Ok(())
    }

    /// Write the upload under its sanitised name, replacing any earlier file of that name.
    pub async fn save(&self, file: &UploadedFile) -> Result<PathBuf, CatalogError> {
        let path = self.dir.join(secure_filename(&file.file_name));
        tokio::fs::write(&path, &file.bytes).await?;
        info!(path = %path.display(), bytes = file.bytes.len(), "stored upload");
        Ok(path)
    }
}

/// Reduce a client-supplied filename to `[A-Za-z0-9_.-]` with no leading/trailing `.` or `_`.
///
/// Path separators become word breaks, so the result never leaves the upload directory.
pub fn secure_filename(name: &str) -> String {
    let spaced: String = name
        .chars()
        .filter(char::is_ascii)
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();
    let joined = spaced.split_whitespace().collect::<Vec<_>>().join("_");
    let cleaned: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
        .collect();
    let trimmed = cleaned.trim_matches(|c| c == '.' || c == '_');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}
