//! REST API module.
//!
//! Contains all API routes and handlers. Every handler authenticates and
//! authorizes before validating, and validates before touching the store.

mod admin;
mod blog_posts;
mod case_studies;
mod contact;
mod images;
mod profile;

pub use admin::*;
pub use blog_posts::*;
pub use case_studies::*;
pub use contact::*;
pub use images::*;
pub use profile::*;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::errors::AppError;

/// Success response envelope.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}

/// Response type that is either the success envelope or an error envelope.
pub type ApiResult<T> = Result<ApiResponse<T>, AppError>;

/// Create a successful API response.
pub fn success<T: Serialize>(data: T) -> ApiResult<T> {
    Ok(ApiResponse::new(data))
}
