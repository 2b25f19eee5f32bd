//! reqwest implementation of [`AnalysisBackend`]

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use std::time::Duration;
use tracing::{debug, info, warn};

use super::{AnalysisBackend, AudioUpload};
use crate::error::UploadError;
use crate::models::ClassificationResponse;

const USER_AGENT: &str = concat!("stemview/", env!("CARGO_PKG_VERSION"));
const UPLOAD_PATH: &str = "/upload/";
/// Multipart field the backend reads the audio from
pub const UPLOAD_FIELD: &str = "file";

/// HTTP client for the analysis backend
pub struct HttpAnalysisClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl HttpAnalysisClient {
    /// `base_url` is an origin without trailing slash, e.g. `http://127.0.0.1:8000`
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, UploadError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    pub fn upload_url(&self) -> String {
        format!("{}{}", self.base_url, UPLOAD_PATH)
    }

    fn build_part(upload: &AudioUpload) -> Part {
        let part = Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone());
        let Some(content_type) = upload.content_type.as_deref() else {
            return part;
        };

        match part.mime_str(content_type) {
            Ok(part) => part,
            Err(e) => {
                warn!(content_type, "Ignoring unusable content type: {}", e);
                Part::bytes(upload.bytes.clone()).file_name(upload.file_name.clone())
            }
        }
    }
}

#[async_trait]
impl AnalysisBackend for HttpAnalysisClient {
    async fn upload(&self, upload: &AudioUpload) -> Result<ClassificationResponse, UploadError> {
        let url = self.upload_url();
        let form = Form::new().part(UPLOAD_FIELD, Self::build_part(upload));

        debug!(
            url = %url,
            file_name = %upload.file_name,
            bytes = upload.bytes.len(),
            "Sending upload to analysis backend"
        );

        let response = self
            .http_client
            .post(&url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(UploadError::HttpStatus {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| UploadError::Transport(e.to_string()))?;

        let parsed: ClassificationResponse =
            serde_json::from_str(&body).map_err(|e| UploadError::Decode(e.to_string()))?;

        info!(
            audio_type = %parsed.audio_type,
            is_monophonic = parsed.is_monophonic,
            stems = parsed.stems.as_ref().map(|s| s.len()).unwrap_or(0),
            "Analysis backend responded"
        );

        Ok(parsed)
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation_trims_base() {
        let client =
            HttpAnalysisClient::new("http://127.0.0.1:8000/", Duration::from_secs(5)).unwrap();
        assert_eq!(client.base_url(), "http://127.0.0.1:8000");
        assert_eq!(client.upload_url(), "http://127.0.0.1:8000/upload/");
    }

    #[tokio::test]
    async fn test_connection_refused_is_transport_error() {
        // Port 9 (discard) is essentially never listening on loopback
        let client = HttpAnalysisClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let err = client
            .upload(&AudioUpload::new("a.wav", vec![0u8; 4]))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Transport(_)), "got {:?}", err);
    }
}
