//! Image upload handlers
//!
//! Uploads are restricted to an allow-list of image formats and a
//! per-context size ceiling, decoded to prove they really are images, then
//! re-encoded to JPEG and stored under a content-hash filename (identical
//! uploads share one file).

use axum::{
    Json,
    body::Body,
    extract::{Multipart, Path, Query, State},
    http::{StatusCode, header},
    response::Response,
};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::io::Cursor;
use std::path::PathBuf;

use crate::core::ServerState;
use crate::utils::{AppError, AppResponse, AppResult, ok};

/// Supported source image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// JPEG quality for stored images
const JPEG_QUALITY: u8 = 85;

/// What the image is for; decides the size ceiling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadContext {
    EventBanner,
    TicketBanner,
    Logo,
    Profile,
}

impl UploadContext {
    fn max_bytes(&self, state: &ServerState) -> usize {
        match self {
            UploadContext::EventBanner => state.config.event_banner_max_bytes,
            UploadContext::TicketBanner | UploadContext::Logo | UploadContext::Profile => {
                state.config.ticket_banner_max_bytes
            }
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UploadQuery {
    pub context: UploadContext,
}

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    pub original_name: String,
    pub size: usize,
    pub url: String,
}

fn calculate_hash(data: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hex::encode(hasher.finalize())
}

fn extension_of(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .map(|e| e.to_string_lossy().to_lowercase())
}

/// Decode the upload and re-encode as JPEG
fn process_image(data: &[u8]) -> Result<Vec<u8>, AppError> {
    let img = image::load_from_memory(data)
        .map_err(|e| AppError::validation(format!("Invalid image: {e}")))?;

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb = img.to_rgb8();
        let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb.write_with_encoder(encoder)
            .map_err(|e| AppError::internal(format!("Failed to encode image: {e}")))?;
    }
    Ok(buffer)
}

/// POST /api/upload?context=event_banner
pub async fn upload(
    State(state): State<ServerState>,
    Query(query): Query<UploadQuery>,
    mut multipart: Multipart,
) -> AppResult<Json<AppResponse<UploadResponse>>> {
    let max_bytes = query.context.max_bytes(&state);

    let field = multipart
        .next_field()
        .await?
        .ok_or_else(|| AppError::validation("missing file field"))?;

    let original_name = field.file_name().unwrap_or("upload").to_string();
    let ext = extension_of(&original_name)
        .ok_or_else(|| AppError::validation("file has no extension"))?;
    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::validation(format!(
            "unsupported format '{ext}', allowed: {}",
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    let data = field.bytes().await?;
    if data.len() > max_bytes {
        return Err(AppError::validation(format!(
            "file too large ({} bytes, max {} bytes)",
            data.len(),
            max_bytes
        )));
    }
    if data.is_empty() {
        return Err(AppError::validation("file is empty"));
    }

    let encoded = process_image(&data)?;
    let hash = calculate_hash(&data);
    let filename = format!("{hash}.jpg");

    let uploads_dir = state.config.uploads_dir();
    let path = uploads_dir.join(&filename);
    if !path.exists() {
        tokio::fs::write(&path, &encoded)
            .await
            .map_err(|e| AppError::internal(format!("Failed to store upload: {e}")))?;
    }

    tracing::info!(
        filename = %filename,
        size = encoded.len(),
        context = ?query.context,
        "image uploaded"
    );

    Ok(ok(UploadResponse {
        url: format!("/uploads/{filename}"),
        filename,
        original_name,
        size: encoded.len(),
    }))
}

/// GET /uploads/{filename}
pub async fn serve(
    State(state): State<ServerState>,
    Path(filename): Path<String>,
) -> AppResult<Response> {
    // Content-hash filenames only; reject anything path-like
    if filename.contains('/') || filename.contains("..") || filename.contains('\\') {
        return Err(AppError::validation("invalid filename"));
    }

    let path: PathBuf = state.config.uploads_dir().join(&filename);
    let data = tokio::fs::read(&path)
        .await
        .map_err(|_| AppError::not_found(format!("file {filename} not found")))?;

    let mime = mime_guess::from_path(&path).first_or_octet_stream();

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(data))
        .map_err(|e| AppError::internal(format!("Failed to build response: {e}")))
}
