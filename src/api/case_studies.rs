//! Case study API endpoints, including dependent sections and metrics.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use validator::Validate;

use super::{success, ApiResult};
use crate::auth::{identity_from_headers, require_admin};
use crate::errors::AppError;
use crate::models::{
    CaseStudy, CaseStudyInput, CaseStudyMetric, CaseStudySection, MetricInput, SectionInput,
};
use crate::AppState;

/// GET /api/case-studies - List all case studies.
pub async fn list_case_studies(State(state): State<AppState>) -> ApiResult<Vec<CaseStudy>> {
    let studies = state.repo.list_case_studies().await?;
    success(studies)
}

/// GET /api/case-studies/:id - Get a single case study.
pub async fn get_case_study(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<CaseStudy> {
    let study = state
        .repo
        .get_case_study(&id)
        .await?
        .ok_or_else(|| AppError::NotFound("Case study not found".to_string()))?;
    success(study)
}

/// POST /api/case-studies - Create a new case study.
pub async fn create_case_study(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CaseStudyInput>,
) -> ApiResult<CaseStudy> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let study = state.repo.create_case_study(&input).await?;
    tracing::info!("Created case study {} ({})", study.id, study.slug);
    success(study)
}

/// PUT /api/case-studies/:id - Update a case study.
pub async fn update_case_study(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<CaseStudyInput>,
) -> ApiResult<CaseStudy> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let study = state.repo.update_case_study(&id, &input).await?;
    success(study)
}

/// DELETE /api/case-studies/:id - Delete a case study with its sections and
/// metrics.
pub async fn delete_case_study(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> ApiResult<()> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;

    state.repo.delete_case_study(&id).await?;
    tracing::info!("Deleted case study {} and its dependents", id);
    success(())
}

/// GET /api/case-studies/:id/sections - List a case study's sections.
pub async fn list_case_study_sections(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<CaseStudySection>> {
    let sections = state.repo.list_case_study_sections(&id).await?;
    success(sections)
}

/// POST /api/case-studies/:id/sections - Add a section to a case study.
pub async fn add_case_study_section(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<SectionInput>,
) -> ApiResult<CaseStudySection> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let section = state.repo.add_case_study_section(&id, &input).await?;
    success(section)
}

/// GET /api/case-studies/:id/metrics - List a case study's metrics.
pub async fn list_case_study_metrics(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Vec<CaseStudyMetric>> {
    let metrics = state.repo.list_case_study_metrics(&id).await?;
    success(metrics)
}

/// POST /api/case-studies/:id/metrics - Add a metric to a case study.
pub async fn add_case_study_metric(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    Json(input): Json<MetricInput>,
) -> ApiResult<CaseStudyMetric> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let metric = state.repo.add_case_study_metric(&id, &input).await?;
    success(metric)
}
