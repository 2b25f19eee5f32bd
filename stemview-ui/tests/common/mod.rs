//! Shared helpers for stemview-ui integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::Request;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use stemview_common::config::ProgressConfig;
use stemview_common::events::EventBus;
use stemview_ui::client::{AnalysisBackend, AudioUpload};
use stemview_ui::controller::UploadController;
use stemview_ui::models::ClassificationResponse;
use stemview_ui::UploadError;

pub const BASE_URL: &str = "http://127.0.0.1:8000";
pub const BOUNDARY: &str = "stemview-test-boundary";

/// Backend answering from a queue of canned replies
#[derive(Default)]
pub struct ScriptedBackend {
    replies: Mutex<VecDeque<Result<Value, UploadError>>>,
    received: Mutex<Vec<AudioUpload>>,
}

impl ScriptedBackend {
    pub fn with_replies(replies: Vec<Result<Value, UploadError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            received: Mutex::new(Vec::new()),
        })
    }

    pub fn received(&self) -> Vec<AudioUpload> {
        self.received.lock().unwrap().clone()
    }
}

#[async_trait]
impl AnalysisBackend for ScriptedBackend {
    async fn upload(&self, upload: &AudioUpload) -> Result<ClassificationResponse, UploadError> {
        self.received.lock().unwrap().push(upload.clone());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(UploadError::Transport("no scripted reply".to_string())))?;
        serde_json::from_value(reply).map_err(|e| UploadError::Decode(e.to_string()))
    }

    fn base_url(&self) -> &str {
        BASE_URL
    }
}

pub fn controller(backend: Arc<ScriptedBackend>) -> Arc<UploadController> {
    Arc::new(UploadController::new(
        backend,
        EventBus::new(100),
        ProgressConfig::default(),
    ))
}

pub fn instrument(name: &str, confidence: f64, category: &str) -> Value {
    json!({
        "instrument": name,
        "confidence": confidence,
        "category": category
    })
}

pub fn monophonic_response() -> Value {
    json!({
        "type": "monophonic",
        "confidence": 0.95,
        "is_monophonic": true,
        "message": "Processing complete",
        "instrument": {
            "instrument": "acoustic_guitar",
            "confidence": 0.87,
            "category": "string instrument",
            "characteristics": "Bright plucked attack"
        }
    })
}

pub fn polyphonic_response() -> Value {
    json!({
        "type": "polyphonic",
        "confidence": 0.91,
        "is_monophonic": false,
        "stems": {
            "vocals": "/stems/vocals.wav",
            "drums": "/stems/drums.wav",
            "bass": "/stems/bass.wav",
            "other": "/stems/other.wav"
        },
        "instruments": {
            "bass": [instrument("electric_bass", 0.8, "string instrument")],
            "other": [
                instrument("grand_piano", 0.7, "keyboard"),
                instrument("rhythm_guitar", 0.4, "string instrument")
            ]
        }
    })
}

/// Browser-style multipart body; `None` sends an empty file part
pub fn multipart_request(file: Option<(&str, &[u8])>) -> Request<Body> {
    let no_bytes: &[u8] = &[];
    let (file_name, bytes) = file.unwrap_or(("", no_bytes));
    let mut body = Vec::new();
    body.extend_from_slice(
        format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{f}\"\r\nContent-Type: application/octet-stream\r\n\r\n",
            b = BOUNDARY,
            f = file_name
        )
        .as_bytes(),
    );
    body.extend_from_slice(bytes);
    body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

    Request::builder()
        .method("POST")
        .uri("/upload")
        .header(
            "content-type",
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

pub fn empty_request(method: &str, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}

pub async fn extract_text(body: Body) -> String {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}
