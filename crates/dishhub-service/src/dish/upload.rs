//! Upload form input: the image and the free-text tag field.

use std::path::Path;

use bytes::Bytes;

use dishhub_core::config::UploadConfig;
use dishhub_core::error::AppError;
use dishhub_core::result::AppResult;

/// Content type assumed when none is declared and none can be guessed.
const FALLBACK_MIME: &str = "application/octet-stream";

/// An image picked for upload.
#[derive(Debug, Clone)]
pub struct ImageUpload {
    /// Original file name.
    pub file_name: String,
    /// Declared content type, if the source supplied one.
    pub content_type: Option<String>,
    /// File content.
    pub data: Bytes,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read an image from disk.
    pub async fn from_path(path: &Path) -> AppResult<Self> {
        let data = tokio::fs::read(path).await.map_err(|e| {
            AppError::validation(format!("Cannot read {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        Ok(Self::new(file_name, data))
    }

    /// Declared content type, else one guessed from the file name.
    pub fn mime_type(&self) -> String {
        self.content_type
            .clone()
            .filter(|ct| !ct.trim().is_empty())
            .or_else(|| {
                mime_guess::from_path(&self.file_name)
                    .first_raw()
                    .map(str::to_string)
            })
            .unwrap_or_else(|| FALLBACK_MIME.to_string())
    }

    /// Check the image against upload rules and return its content type.
    pub fn validate(&self, rules: &UploadConfig) -> AppResult<String> {
        if self.data.is_empty() {
            return Err(AppError::validation("Please select an image to upload"));
        }

        let mime = self.mime_type();
        if !mime.starts_with(&rules.accepted_mime_prefix) {
            return Err(AppError::validation(format!(
                "Please select an image file (got {mime})"
            )));
        }

        if self.data.len() as u64 > rules.max_size_bytes {
            let limit_mib = rules.max_size_bytes as f64 / (1024.0 * 1024.0);
            return Err(AppError::validation(format!(
                "Image must be smaller than {limit_mib:.0} MB"
            )));
        }

        Ok(mime)
    }
}

/// Turn the upload form's tag field into a tag list: split on commas,
/// trim each item, drop empties.
pub fn parse_tag_input(input: &str) -> Vec<String> {
    input
        .split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}
