//! Contact form API endpoints.
//!
//! Submission is the one unauthenticated write in the system.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use validator::Validate;

use super::{success, ApiResult};
use crate::auth::{identity_from_headers, require_admin};
use crate::models::{ContactFormInput, ContactSubmission, SubmissionReceipt};
use crate::AppState;

/// POST /api/contact - Submit the public contact form.
pub async fn submit_contact_form(
    State(state): State<AppState>,
    Json(input): Json<ContactFormInput>,
) -> ApiResult<SubmissionReceipt> {
    input.validate()?;

    let submission = state.repo.create_contact_submission(&input).await?;
    tracing::info!("Contact submission received from {}", submission.email);
    success(SubmissionReceipt { id: submission.id })
}

/// GET /api/contact - List contact submissions.
pub async fn list_contact_submissions(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> ApiResult<Vec<ContactSubmission>> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;

    let submissions = state.repo.list_contact_submissions().await?;
    success(submissions)
}

/// POST /api/contact/:id/read - Mark a contact submission as read.
pub async fn mark_contact_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;

    state.repo.mark_contact_read(&id).await?;
    success(())
}

/// DELETE /api/contact/:id - Delete a contact submission.
pub async fn delete_contact_submission(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;

    state.repo.delete_contact_submission(&id).await?;
    success(())
}
