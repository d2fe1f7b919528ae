//! Blog post API endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use validator::Validate;

use super::{success, ApiResult};
use crate::auth::{identity_from_headers, require_admin};
use crate::errors::AppError;
use crate::models::{BlogPost, BlogPostInput};
use crate::AppState;

/// GET /api/blog-posts - List all blog posts.
pub async fn list_blog_posts(State(state): State<AppState>) -> ApiResult<Vec<BlogPost>> {
    let posts = state.repo.list_blog_posts().await?;
    success(posts)
}

/// GET /api/blog-posts/:id - Get a single blog post.
pub async fn get_blog_post(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<BlogPost> {
    let post = state
        .repo
        .get_blog_post(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Blog post not found".to_string()))?;
    success(post)
}

/// POST /api/blog-posts - Create a new blog post.
pub async fn create_blog_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<BlogPostInput>,
) -> ApiResult<BlogPost> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let post = state.repo.create_blog_post(&input).await?;
    tracing::info!("Created blog post {} ({})", post.id, post.slug);
    success(post)
}

/// PUT /api/blog-posts/:id - Update a blog post.
pub async fn update_blog_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<BlogPostInput>,
) -> ApiResult<BlogPost> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let post = state.repo.update_blog_post(&id, &input).await?;
    success(post)
}

/// DELETE /api/blog-posts/:id - Delete a blog post.
pub async fn delete_blog_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;

    state.repo.delete_blog_post(&id).await?;
    tracing::info!("Deleted blog post {}", id);
    success(())
}
