//! Image API endpoints: staging upload, explicit processing, auto-processing.

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::{header, HeaderMap},
    Json,
};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use super::{success, ApiResult};
use crate::auth::{identity_from_headers, require_admin};
use crate::errors::AppError;
use crate::images::{classify_destination, content_type_for};
use crate::models::{
    AutoProcessRequest, AutoProcessResult, NewStoredImage, ProcessImageRequest, ProcessedImage,
    StoredImage, UploadReceipt,
};
use crate::storage::ObjectMetadata;
use crate::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadQuery {
    pub file_name: String,
}

/// POST /api/images/upload - Stage raw image bytes for processing.
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(query): Query<UploadQuery>,
    body: Bytes,
) -> ApiResult<UploadReceipt> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    let account = require_admin(&state.repo, identity.as_ref()).await?;

    if query.file_name.is_empty()
        || query.file_name.contains('/')
        || query.file_name.contains('\\')
        || query.file_name.contains("..")
    {
        return Err(AppError::invalid("Invalid file name"));
    }
    if body.is_empty() {
        return Err(AppError::invalid("Empty upload"));
    }

    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(|s| s.to_string())
        .unwrap_or_else(|| content_type_for(&query.file_name).to_string());

    let temp_path = format!("uploads/{}/{}", account.uid, query.file_name);
    state
        .store
        .upload_bytes(
            &temp_path,
            body.to_vec(),
            &ObjectMetadata {
                content_type,
                access_token: Uuid::new_v4().to_string(),
            },
        )
        .await?;

    tracing::info!("Staged upload {} ({} bytes)", temp_path, body.len());
    success(UploadReceipt { temp_path })
}

/// GET /api/images - List stored-image records.
pub async fn list_images(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<StoredImage>> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;

    let images = state.repo.list_images().await?;
    success(images)
}

/// POST /api/images/process - Run the pipeline on a staged upload.
pub async fn process_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ProcessImageRequest>,
) -> ApiResult<ProcessedImage> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let processed = state.pipeline.process(&input).await?;
    tracing::info!("Processed image into {}", processed.original_path);
    success(processed)
}

/// POST /api/images/auto - Classify a staged upload by file name and process
/// it with default options, recording the stored variants.
pub async fn auto_process_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<AutoProcessRequest>,
) -> ApiResult<AutoProcessResult> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    let account = require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    if !input.content_type.starts_with("image/") {
        return Err(AppError::invalid("Only image uploads are auto-processed"));
    }

    let folder = classify_destination(&input.file_name);
    let request = ProcessImageRequest {
        temp_path: input.file_path.clone(),
        destination_folder: folder.to_string(),
        file_name: input.file_name.clone(),
        generate_thumbnail: true,
        optimize_image: true,
        thumbnail_width: 300,
        thumbnail_height: 300,
        quality: 80,
    };

    let processed = state.pipeline.process(&request).await?;

    state
        .repo
        .record_image(&NewStoredImage {
            original_path: processed.original_path.clone(),
            optimized_path: processed.optimized_path.clone(),
            thumbnail_path: processed.thumbnail_path.clone(),
            content_type: input.content_type.clone(),
            folder: folder.to_string(),
            uploaded_by: account.uid.clone(),
        })
        .await?;

    tracing::info!("Auto-processed {} into {}", input.file_name, folder);
    success(AutoProcessResult {
        original_path: processed.original_path,
        optimized_path: processed.optimized_path,
        thumbnail_path: processed.thumbnail_path,
    })
}
