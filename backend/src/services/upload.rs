use bytes::Bytes;
use futures_util::{stream, StreamExt};
use reqwest::{
    multipart::{Form, Part},
    Body,
};
use tokio::sync::watch;

use crate::models::upload::{AssetUpload, UploadProgress, UploadResponse};

use super::api_client::{ApiError, BackendClient};

const CHUNK_SIZE: usize = 64 * 1024;

impl BackendClient {
    /// Send a file to `POST /api/upload`. `progress` is updated as chunks of
    /// the file are handed to the connection.
    pub async fn upload_asset(
        &self,
        upload: AssetUpload,
        progress: watch::Sender<UploadProgress>,
    ) -> Result<UploadResponse, ApiError> {
        let total = upload.data.len() as u64;
        progress.send_replace(UploadProgress { sent: 0, total });

        let chunks: Vec<Bytes> = (0..upload.data.len())
            .step_by(CHUNK_SIZE)
            .map(|start| upload.data.slice(start..(start + CHUNK_SIZE).min(upload.data.len())))
            .collect();
        let mut sent = 0u64;
        let body = stream::iter(chunks).map(move |chunk| {
            sent += chunk.len() as u64;
            progress.send_replace(UploadProgress { sent, total });
            Ok::<_, std::io::Error>(chunk)
        });

        let part = Part::stream_with_length(Body::wrap_stream(body), total)
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| ApiError::Malformed(format!("type de fichier invalide: {e}")))?;

        let mut form = Form::new()
            .part("file", part)
            .text("folder", upload.folder.clone())
            .text("asset_type", upload.asset_type.clone());
        if let Some(event_id) = &upload.event_id {
            form = form.text("event_id", event_id.clone());
        }

        let value = self
            .send(self.http().post(self.url("/api/upload")).multipart(form))
            .await?;
        let response: UploadResponse =
            serde_json::from_value(value).map_err(|e| ApiError::Malformed(e.to_string()))?;

        if response.simulated {
            tracing::info!("Upload of {} simulated by the asset store", upload.file_name);
        } else {
            tracing::info!("Uploaded {} ({} bytes) to {}", upload.file_name, total, response.url);
        }
        Ok(response)
    }
}
