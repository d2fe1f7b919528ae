//! Image ingestion pipeline.
//!
//! Linear flow: download the staged temp object into a scratch directory,
//! persist the original, optionally encode an optimized re-encode and a
//! center-cropped thumbnail, delete the temp object, and issue read URLs.
//! The scratch directory is removed on every exit path when its guard drops.
//! Variants already uploaded before a failure are not rolled back.

use std::path::Path;
use std::sync::Arc;

use image::imageops::FilterType;
use tempfile::TempDir;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::{ProcessImageRequest, ProcessedImage};
use crate::storage::{ObjectMetadata, ObjectStore};

/// Runs image processing against the object store.
pub struct ImagePipeline {
    store: Arc<ObjectStore>,
    public_url_base: String,
}

impl ImagePipeline {
    pub fn new(store: Arc<ObjectStore>, public_url_base: &str) -> Self {
        Self {
            store,
            public_url_base: public_url_base.trim_end_matches('/').to_string(),
        }
    }

    /// Long-lived read URL for a stored object.
    fn read_url(&self, path: &str, token: &str) -> String {
        format!("{}/{}?token={}", self.public_url_base, path, token)
    }

    /// Process a staged upload into original/optimized/thumbnail variants.
    pub async fn process(&self, request: &ProcessImageRequest) -> Result<ProcessedImage, AppError> {
        // The file name becomes a scratch path component and an object path
        // segment; it must not traverse either.
        if request.file_name.contains('/')
            || request.file_name.contains('\\')
            || request.file_name.contains("..")
        {
            return Err(AppError::invalid("Invalid file name"));
        }

        let scratch = TempDir::new()?;
        let source_path = scratch.path().join(&request.file_name);

        self.store
            .download_to(&request.temp_path, &source_path)
            .await?;

        let original_dest = format!(
            "images/{}/original/{}",
            request.destination_folder, request.file_name
        );
        let optimized_dest = format!(
            "images/{}/optimized/{}",
            request.destination_folder, request.file_name
        );
        let thumbnail_dest = format!(
            "images/{}/thumbnails/{}",
            request.destination_folder, request.file_name
        );

        let original_token = Uuid::new_v4().to_string();
        self.store
            .upload_file(
                &source_path,
                &original_dest,
                &ObjectMetadata {
                    content_type: content_type_for(&request.file_name).to_string(),
                    access_token: original_token.clone(),
                },
            )
            .await?;
        let original_url = self.read_url(&original_dest, &original_token);

        let mut optimized_url = String::new();
        if request.optimize_image {
            let local = scratch.path().join(format!("optimized-{}", request.file_name));
            let src = source_path.clone();
            let dst = local.clone();
            let quality = request.quality;
            tokio::task::spawn_blocking(move || encode_optimized(&src, &dst, quality)).await??;

            let token = Uuid::new_v4().to_string();
            self.store
                .upload_file(
                    &local,
                    &optimized_dest,
                    &ObjectMetadata {
                        content_type: "image/jpeg".to_string(),
                        access_token: token.clone(),
                    },
                )
                .await?;
            optimized_url = self.read_url(&optimized_dest, &token);
        }

        let mut thumbnail_url = String::new();
        if request.generate_thumbnail {
            let local = scratch.path().join(format!("thumbnail-{}", request.file_name));
            let src = source_path.clone();
            let dst = local.clone();
            let (width, height, quality) = (
                request.thumbnail_width,
                request.thumbnail_height,
                request.quality,
            );
            tokio::task::spawn_blocking(move || encode_thumbnail(&src, &dst, width, height, quality))
                .await??;

            let token = Uuid::new_v4().to_string();
            self.store
                .upload_file(
                    &local,
                    &thumbnail_dest,
                    &ObjectMetadata {
                        content_type: "image/jpeg".to_string(),
                        access_token: token.clone(),
                    },
                )
                .await?;
            thumbnail_url = self.read_url(&thumbnail_dest, &token);
        }

        // The staged temp object is consumed by the pipeline
        self.store.delete(&request.temp_path).await?;

        Ok(ProcessedImage {
            original_path: original_dest.clone(),
            optimized_url: if request.optimize_image {
                optimized_url
            } else {
                original_url.clone()
            },
            optimized_path: if request.optimize_image {
                optimized_dest
            } else {
                original_dest
            },
            thumbnail_url: if request.generate_thumbnail {
                thumbnail_url
            } else {
                String::new()
            },
            thumbnail_path: if request.generate_thumbnail {
                thumbnail_dest
            } else {
                String::new()
            },
            original_url,
        })
    }
}

/// Destination folder for an auto-processed upload, chosen by file-name hint.
pub fn classify_destination(file_name: &str) -> &'static str {
    if file_name.contains("case-study") {
        "case-studies"
    } else if file_name.contains("blog") {
        "blog-posts"
    } else if file_name.contains("profile") {
        "profile"
    } else {
        "misc"
    }
}

/// Content type inferred from a file extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name.rsplit('.').next().unwrap_or("").to_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        _ => "application/octet-stream",
    }
}

/// Re-encode as JPEG at the requested quality without resizing.
fn encode_optimized(src: &Path, dst: &Path, quality: u8) -> Result<(), AppError> {
    let img = image::open(src)?;
    write_jpeg(&img, dst, quality)
}

/// Resize to exactly `width`x`height`, cropping to cover anchored at center,
/// then encode as JPEG at the requested quality.
fn encode_thumbnail(
    src: &Path,
    dst: &Path,
    width: u32,
    height: u32,
    quality: u8,
) -> Result<(), AppError> {
    let img = image::open(src)?;
    let thumb = img.resize_to_fill(width, height, FilterType::Lanczos3);
    write_jpeg(&thumb, dst, quality)
}

fn write_jpeg(img: &image::DynamicImage, dst: &Path, quality: u8) -> Result<(), AppError> {
    let file = std::fs::File::create(dst)?;
    let mut writer = std::io::BufWriter::new(file);
    let encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(&mut writer, quality);
    // JPEG carries no alpha channel
    img.to_rgb8().write_with_encoder(encoder)?;
    Ok(())
}
