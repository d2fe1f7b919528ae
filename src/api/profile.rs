//! Profile API endpoints.

use axum::{extract::State, http::HeaderMap, Json};
use validator::Validate;

use super::{success, ApiResult};
use crate::auth::{identity_from_headers, require_admin};
use crate::errors::AppError;
use crate::models::{
    Education, EducationInput, Profile, ProfileInput, ProfileView, Skill, SkillInput,
    WorkExperience, WorkExperienceInput,
};
use crate::AppState;

/// GET /api/profile - The profile with its ordered sub-resources.
pub async fn get_profile(State(state): State<AppState>) -> ApiResult<ProfileView> {
    let profile = state
        .repo
        .get_profile()
        .await?
        .ok_or_else(|| AppError::NotFound("Profile not found".to_string()))?;

    let work_experiences = state.repo.list_work_experiences().await?;
    let education = state.repo.list_education().await?;
    let skills = state.repo.list_skills().await?;

    success(ProfileView {
        profile,
        work_experiences,
        education,
        skills,
    })
}

/// PUT /api/profile - Create or replace the profile.
pub async fn update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<ProfileInput>,
) -> ApiResult<Profile> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let profile = state.repo.upsert_profile(&input).await?;
    success(profile)
}

/// POST /api/profile/experience - Add a work experience entry.
pub async fn add_work_experience(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<WorkExperienceInput>,
) -> ApiResult<WorkExperience> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let experience = state.repo.add_work_experience(&input).await?;
    success(experience)
}

/// POST /api/profile/education - Add an education entry.
pub async fn add_education(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<EducationInput>,
) -> ApiResult<Education> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let education = state.repo.add_education(&input).await?;
    success(education)
}

/// POST /api/profile/skills - Add a skill.
pub async fn add_skill(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<SkillInput>,
) -> ApiResult<Skill> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    require_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let skill = state.repo.add_skill(&input).await?;
    success(skill)
}
