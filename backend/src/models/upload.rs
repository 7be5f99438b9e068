use bytes::Bytes;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A file on its way to the asset store.
#[derive(Debug, Clone)]
pub struct AssetUpload {
    pub file_name: String,
    pub content_type: String,
    pub data: Bytes,
    pub folder: String,
    /// `image`, `icon` or `video`.
    pub asset_type: String,
    pub event_id: Option<String>,
}

/// Reply of `POST /api/upload`. `simulated` is set when the backend has no
/// asset store configured and returned a placeholder URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadResponse {
    pub url: String,
    #[serde(default)]
    pub simulated: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Bytes handed to the transport so far.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UploadProgress {
    pub sent: u64,
    pub total: u64,
}

impl UploadProgress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 100;
        }
        ((self.sent.min(self.total) * 100) / self.total) as u8
    }
}
