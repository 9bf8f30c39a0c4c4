use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaType {
    Image,
    Audio,
    Video,
    Document,
    Unknown,
}

impl MediaType {
    #[must_use]
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            Self::Image
        } else if mime.starts_with("audio/") {
            Self::Audio
        } else if mime.starts_with("video/") {
            Self::Video
        } else if mime.starts_with("application/pdf") || mime.starts_with("text/") {
            Self::Document
        } else {
            Self::Unknown
        }
    }
}

/// Caller-supplied upload fields, after schema validation.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct UploadRequest {
    pub filename: String,
    pub base64: Option<String>,
    pub url: Option<String>,
    pub title: Option<String>,
    pub alt_text: Option<String>,
    pub caption: Option<String>,
    pub description: Option<String>,
}

/// Result of a successful ingestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestedMedia {
    pub id: u64,
    pub url: String,
    pub filename: String,
    pub title: String,
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaConfig {
    /// Upload directory; defaults to `uploads` beside the config file.
    pub storage_dir: Option<String>,
    #[serde(default = "default_download_timeout_secs")]
    pub download_timeout_secs: u64,
    #[serde(default = "default_max_upload_size_mb")]
    pub max_upload_size_mb: u64,
    /// Exact types (`application/pdf`) or wildcards (`image/*`).
    #[serde(default = "default_allowed_mime_types")]
    pub allowed_mime_types: Vec<String>,
    #[serde(default = "default_true")]
    pub block_private_hosts: bool,
}

fn default_download_timeout_secs() -> u64 {
    30
}

fn default_max_upload_size_mb() -> u64 {
    25
}

fn default_true() -> bool {
    true
}

fn default_allowed_mime_types() -> Vec<String> {
    [
        "image/*",
        "audio/*",
        "video/*",
        "application/pdf",
        "application/msword",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "application/vnd.openxmlformats-officedocument.presentationml.presentation",
        "application/vnd.oasis.opendocument.text",
        "text/plain",
        "text/csv",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            storage_dir: None,
            download_timeout_secs: default_download_timeout_secs(),
            max_upload_size_mb: default_max_upload_size_mb(),
            allowed_mime_types: default_allowed_mime_types(),
            block_private_hosts: true,
        }
    }
}

impl MediaConfig {
    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_size_mb * 1_024 * 1_024
    }

    pub fn download_timeout(&self) -> Duration {
        Duration::from_secs(self.download_timeout_secs)
    }
}
