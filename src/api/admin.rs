//! Admin account API endpoints.

use axum::{
    extract::{Path, State},
    http::HeaderMap,
    Json,
};
use validator::Validate;

use super::{success, ApiResult};
use crate::auth::{
    hash_password, identity_from_headers, issue_token, require_super_admin, verify_password,
};
use crate::errors::AppError;
use crate::models::{
    CreateAdminRequest, CreatedAdmin, LoginRequest, LoginResponse, Role, UpdateAdminRoleRequest,
};
use crate::AppState;

/// POST /api/admin/login - Exchange credentials for an identity token.
pub async fn login(
    State(state): State<AppState>,
    Json(input): Json<LoginRequest>,
) -> ApiResult<LoginResponse> {
    input.validate()?;

    let account = state
        .repo
        .find_admin_by_email(&input.email)
        .await?
        .filter(|account| verify_password(&input.password, &account.password_hash))
        .ok_or_else(|| AppError::Unauthenticated("Invalid email or password".to_string()))?;

    let token = issue_token(
        &account.uid,
        &state.config.jwt_secret,
        state.config.token_ttl_secs,
    )?;
    tracing::info!("Issued token for {}", account.email);
    success(LoginResponse { token })
}

/// POST /api/admin/accounts - Create a new admin account.
pub async fn create_admin(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(input): Json<CreateAdminRequest>,
) -> ApiResult<CreatedAdmin> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    let caller = require_super_admin(&state.repo, identity.as_ref()).await?;
    input.validate()?;

    let password_hash = hash_password(&input.password)?;
    let account = state
        .repo
        .create_admin_account(
            &input.email,
            &password_hash,
            input.display_name.as_deref(),
            Role::Admin,
            Some(&caller.uid),
        )
        .await?;

    tracing::info!("Admin account {} created by {}", account.email, caller.email);
    success(CreatedAdmin { uid: account.uid })
}

/// PUT /api/admin/accounts/:uid/role - Change an account's role.
pub async fn update_admin_role(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(uid): Path<String>,
    Json(input): Json<UpdateAdminRoleRequest>,
) -> ApiResult<()> {
    let identity = identity_from_headers(&headers, &state.config.jwt_secret)?;
    let caller = require_super_admin(&state.repo, identity.as_ref()).await?;

    state.repo.update_admin_role(&uid, input.role).await?;
    tracing::info!(
        "Role of account {} set to {} by {}",
        uid,
        input.role.as_str(),
        caller.email
    );
    success(())
}
