use axum::{
    extract::{Multipart, State},
    Json,
};
use serde_json::json;
use tokio::sync::watch;

use crate::{
    models::{auth::AdminSession, upload::{AssetUpload, UploadProgress}},
    routes::{bad_request, ApiResult, Rejection},
    services::api_client::ApiError,
    AppState,
};

/// Fields of an upload form, before they are checked.
#[derive(Default)]
pub(crate) struct UploadForm {
    pub file_name: Option<String>,
    pub content_type: Option<String>,
    pub data: Option<axum::body::Bytes>,
    pub folder: Option<String>,
    pub asset_type: Option<String>,
    pub event_id: Option<String>,
}

impl UploadForm {
    pub(crate) async fn read(mut multipart: Multipart) -> Result<Self, Rejection> {
        let mut form = UploadForm::default();
        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| bad_request(e.to_string()))?
        {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                "file" => {
                    form.file_name = field.file_name().map(str::to_string);
                    form.content_type = field.content_type().map(str::to_string);
                    form.data = Some(field.bytes().await.map_err(|e| bad_request(e.to_string()))?);
                }
                "folder" | "asset_type" | "event_id" => {
                    let value = field.text().await.map_err(|e| bad_request(e.to_string()))?;
                    let value = (!value.is_empty()).then_some(value);
                    match name.as_str() {
                        "folder" => form.folder = value,
                        "asset_type" => form.asset_type = value,
                        _ => form.event_id = value,
                    }
                }
                _ => {}
            }
        }
        Ok(form)
    }

    /// The upload to send, with the given defaults for folder and type.
    pub(crate) fn into_upload(self, folder: &str, asset_type: &str) -> Result<AssetUpload, Rejection> {
        let data = self.data.ok_or_else(|| bad_request("Aucun fichier reçu"))?;
        let file_name = self.file_name.unwrap_or_else(|| "upload".into());
        let content_type = self.content_type.unwrap_or_else(|| {
            mime_guess::from_path(&file_name)
                .first_or_octet_stream()
                .to_string()
        });

        let asset_type = self.asset_type.unwrap_or_else(|| asset_type.to_string());

        let mime: mime::Mime = content_type
            .parse()
            .map_err(|_| bad_request(format!("Type de fichier invalide: {content_type}")))?;
        let expected = if asset_type == "video" { mime::VIDEO } else { mime::IMAGE };
        if mime.type_() != expected {
            return Err(bad_request(format!(
                "Type de fichier non autorisé pour un asset {asset_type}: {content_type}"
            )));
        }

        Ok(AssetUpload {
            file_name,
            content_type,
            data,
            folder: self.folder.unwrap_or_else(|| folder.to_string()),
            asset_type,
            event_id: self.event_id,
        })
    }
}

/// Watch an upload and log its progress in quarters.
pub(crate) fn log_progress(file_name: String) -> watch::Sender<UploadProgress> {
    let (tx, mut rx) = watch::channel(UploadProgress::default());
    tokio::spawn(async move {
        let mut last_quarter = 0;
        while rx.changed().await.is_ok() {
            let percent = rx.borrow_and_update().percent();
            if percent / 25 > last_quarter {
                last_quarter = percent / 25;
                tracing::debug!("Upload of {}: {}%", file_name, percent);
            }
        }
    });
    tx
}

pub async fn upload_asset(
    State(state): State<AppState>,
    _session: AdminSession,
    multipart: Multipart,
) -> ApiResult {
    let upload = UploadForm::read(multipart).await?.into_upload("assets", "image")?;
    let progress = log_progress(upload.file_name.clone());
    let response = state
        .backend
        .upload_asset(upload, progress)
        .await
        .map_err(ApiError::into_rejection)?;
    Ok(Json(json!(response)))
}
