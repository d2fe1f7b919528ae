//! Image pipeline request/response shapes and stored-image metadata.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Metadata recorded after the pipeline stores an image's variants.
///
/// The bytes themselves live in the object store; this row is bookkeeping only.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredImage {
    pub id: String,
    pub original_path: String,
    pub optimized_path: String,
    pub thumbnail_path: String,
    pub content_type: String,
    pub folder: String,
    pub uploaded_by: String,
    pub created_at: String,
}

/// Fields for a stored-image row before the repository assigns id/timestamp.
#[derive(Debug, Clone)]
pub struct NewStoredImage {
    pub original_path: String,
    pub optimized_path: String,
    pub thumbnail_path: String,
    pub content_type: String,
    pub folder: String,
    pub uploaded_by: String,
}

/// Request body for explicit image processing.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProcessImageRequest {
    #[validate(length(min = 1, message = "Temp path is required"))]
    pub temp_path: String,
    #[validate(length(min = 1, message = "Destination folder is required"))]
    pub destination_folder: String,
    #[validate(length(min = 1, message = "File name is required"))]
    pub file_name: String,
    #[serde(default = "default_true")]
    pub generate_thumbnail: bool,
    #[serde(default = "default_true")]
    pub optimize_image: bool,
    #[serde(default = "default_thumbnail_dim")]
    #[validate(range(min = 1, message = "Thumbnail width must be positive"))]
    pub thumbnail_width: u32,
    #[serde(default = "default_thumbnail_dim")]
    #[validate(range(min = 1, message = "Thumbnail height must be positive"))]
    pub thumbnail_height: u32,
    #[serde(default = "default_quality")]
    #[validate(range(min = 1, max = 100, message = "Quality must be between 1 and 100"))]
    pub quality: u8,
}

fn default_true() -> bool {
    true
}

fn default_thumbnail_dim() -> u32 {
    300
}

fn default_quality() -> u8 {
    80
}

/// Paths and read URLs of the variants a pipeline run produced.
///
/// When a variant is skipped, `optimized*` falls back to the original and
/// `thumbnail*` is empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProcessedImage {
    pub original_url: String,
    pub original_path: String,
    pub optimized_url: String,
    pub optimized_path: String,
    pub thumbnail_url: String,
    pub thumbnail_path: String,
}

/// Request body for the auto-classify entry point.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AutoProcessRequest {
    #[validate(length(min = 1, message = "File path is required"))]
    pub file_path: String,
    #[validate(length(min = 1, message = "Content type is required"))]
    pub content_type: String,
    #[validate(length(min = 1, message = "File name is required"))]
    pub file_name: String,
}

/// Paths recorded after an auto-process run.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoProcessResult {
    pub original_path: String,
    pub optimized_path: String,
    pub thumbnail_path: String,
}

/// Returned by the staging upload endpoint.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadReceipt {
    pub temp_path: String,
}
