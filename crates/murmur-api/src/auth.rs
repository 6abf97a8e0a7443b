use std::sync::Arc;

use anyhow::anyhow;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::{SaltString, rand_core::OsRng}};
use axum::{Json, extract::{Query, State}, http::StatusCode, response::IntoResponse};
use jsonwebtoken::{EncodingKey, Header, encode};
use uuid::Uuid;

use murmur_db::Database;
use murmur_types::api::{
    Claims, SignInRequest, SignInResponse, SignUpRequest, SignUpResponse, UsernameCheckQuery,
    UsernameCheckResponse,
};

use crate::error::ApiError;
use crate::suggestions::Suggester;
use crate::validate;

pub type AppState = Arc<AppStateInner>;

pub struct AppStateInner {
    pub db: Database,
    pub jwt_secret: String,
    pub suggester: Suggester,
}

/// Account provisioning. Verification is disabled in this revision, so new
/// accounts are stored verified and accepting messages; no email is sent.
pub async fn sign_up(
    State(state): State<AppState>,
    Json(req): Json<SignUpRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate::sign_up(&req.username, &req.email, &req.password)?;

    // Username uniqueness is scoped to verified accounts; email is global.
    // These are point-in-time checks with no reservation -- the email UNIQUE
    // constraint below backstops a raced sign-up, the username check does not
    // (documented race, kept from the original design).
    if state
        .db
        .get_verified_user_by_username(&req.username)?
        .is_some()
    {
        return Err(ApiError::Conflict("username"));
    }
    if state.db.get_user_by_email(&req.email)?.is_some() {
        return Err(ApiError::Conflict("email"));
    }

    // Hash password with Argon2id
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(req.password.as_bytes(), &salt)
        .map_err(|e| ApiError::Store(anyhow!("password hashing failed: {e}")))?
        .to_string();

    let user_id = Uuid::new_v4();

    if let Err(e) = state
        .db
        .create_user(&user_id.to_string(), &req.username, &req.email, &password_hash)
    {
        if murmur_db::is_unique_violation(&e) {
            return Err(ApiError::Conflict("email"));
        }
        return Err(e.into());
    }

    Ok((
        StatusCode::CREATED,
        Json(SignUpResponse {
            user_id,
            username: req.username,
        }),
    ))
}

/// Credential collaborator: identifier is a username or an email.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(req): Json<SignInRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user = state
        .db
        .get_user_by_identifier(&req.identifier)?
        .ok_or(ApiError::Auth)?;

    let parsed_hash = PasswordHash::new(&user.password)
        .map_err(|e| ApiError::Store(anyhow!("corrupt credential hash: {e}")))?;

    Argon2::default()
        .verify_password(req.password.as_bytes(), &parsed_hash)
        .map_err(|_| ApiError::Auth)?;

    let user_id: Uuid = user
        .id
        .parse()
        .map_err(|e| ApiError::Store(anyhow!("corrupt account id '{}': {e}", user.id)))?;

    let token = create_token(&state.jwt_secret, user_id, &user.username)?;

    Ok(Json(SignInResponse {
        user_id,
        username: user.username,
        token,
    }))
}

/// Point-in-time availability check, no reservation. "Taken" means a
/// *verified* account holds the exact username.
pub async fn check_username(
    State(state): State<AppState>,
    Query(query): Query<UsernameCheckQuery>,
) -> Result<impl IntoResponse, ApiError> {
    validate::username(&query.username).map_err(|e| ApiError::Validation(vec![e]))?;

    let taken = state
        .db
        .get_verified_user_by_username(&query.username)?
        .is_some();

    Ok(Json(UsernameCheckResponse {
        username: query.username,
        available: !taken,
    }))
}

fn create_token(secret: &str, user_id: Uuid, username: &str) -> anyhow::Result<String> {
    let claims = Claims {
        sub: user_id,
        username: username.to_string(),
        exp: (chrono::Utc::now() + chrono::Duration::days(30)).timestamp() as usize,
    };

    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )?;

    Ok(token)
}
