//! Analysis backend client
//!
//! The backend does the real work (type detection, stem separation,
//! instrument and pitch analysis). This module only knows its HTTP contract:
//! one multipart `POST /upload/` answered by a [`ClassificationResponse`].

use async_trait::async_trait;
use std::path::Path;

use crate::error::UploadError;
use crate::models::ClassificationResponse;

pub mod http;
pub mod media;

pub use http::HttpAnalysisClient;
pub use media::resolve_media_url;

/// Audio file selected by the user
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioUpload {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

impl AudioUpload {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            content_type: None,
            bytes,
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Read a file from disk; the file name part becomes the upload name
    pub async fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

/// Backend seam - the controller only talks to this trait
#[async_trait]
pub trait AnalysisBackend: Send + Sync {
    /// Send one upload and return the decoded response
    ///
    /// Exactly one attempt; no retries.
    async fn upload(&self, upload: &AudioUpload) -> Result<ClassificationResponse, UploadError>;

    /// Origin used to resolve media URLs found in responses
    fn base_url(&self) -> &str;
}
