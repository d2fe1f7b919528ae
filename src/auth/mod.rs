//! Identity tokens and the role-based authorization gate.
//!
//! Bearer tokens carry identity only. The account role is re-read from the
//! database on every authorization check, so a revocation takes effect on the
//! caller's next request.

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::http::{header, HeaderMap};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};

use crate::db::Repository;
use crate::errors::AppError;
use crate::models::{AdminAccount, Role};

/// The verified caller principal attached to a request.
#[derive(Debug, Clone)]
pub struct Identity {
    pub uid: String,
}

/// Claims carried by issued identity tokens.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Account uid
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
}

/// Issue a signed identity token for an account.
pub fn issue_token(uid: &str, secret: &str, ttl_secs: i64) -> Result<String, AppError> {
    let now = Utc::now().timestamp();
    let claims = Claims {
        sub: uid.to_string(),
        iat: now,
        exp: now + ttl_secs,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| {
        tracing::error!("Failed to sign token: {:?}", e);
        AppError::Internal("Failed to issue token".to_string())
    })
}

/// Decode and verify an identity token.
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(data.claims)
}

/// Extract the caller identity from the `Authorization` header, if any.
///
/// A missing header yields `None`; a present but invalid or expired token is
/// an `Unauthenticated` error.
pub fn identity_from_headers(
    headers: &HeaderMap,
    secret: &str,
) -> Result<Option<Identity>, AppError> {
    let bearer = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "));

    match bearer {
        Some(token) => {
            let claims = decode_token(token, secret)?;
            Ok(Some(Identity { uid: claims.sub }))
        }
        None => Ok(None),
    }
}

/// Require an authenticated caller whose account carries the admin role.
///
/// Returns the account so handlers can attribute writes to it.
pub async fn require_admin(
    repo: &Repository,
    identity: Option<&Identity>,
) -> Result<AdminAccount, AppError> {
    let identity = identity
        .ok_or_else(|| AppError::Unauthenticated("User must be authenticated".to_string()))?;

    let account = repo.get_admin_account(&identity.uid).await?;
    match account {
        Some(account) if account.role.is_admin() => Ok(account),
        _ => Err(AppError::PermissionDenied(
            "User must be an admin".to_string(),
        )),
    }
}

/// Require an authenticated caller whose account carries the super admin role.
pub async fn require_super_admin(
    repo: &Repository,
    identity: Option<&Identity>,
) -> Result<AdminAccount, AppError> {
    let identity = identity
        .ok_or_else(|| AppError::Unauthenticated("User must be authenticated".to_string()))?;

    let account = repo.get_admin_account(&identity.uid).await?;
    match account {
        Some(account) if account.role == Role::SuperAdmin => Ok(account),
        _ => Err(AppError::PermissionDenied(
            "User must be a super admin".to_string(),
        )),
    }
}

/// Hash a password for storage.
pub fn hash_password(password: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| {
            tracing::error!("Password hashing failed: {:?}", e);
            AppError::Internal("Failed to hash password".to_string())
        })
}

/// Verify a password against a stored hash.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(password_hash) else {
        return false;
    };

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok()
}
