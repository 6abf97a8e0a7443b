use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{DecodingKey, Validation, decode};

use murmur_types::api::Claims;

use crate::auth::AppState;
use crate::error::ApiError;

/// Principal resolver: validates the Bearer JWT against the key held in
/// application state (injected, never read from ambient env) and attaches the
/// Claims as a request extension.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or(ApiError::Auth)?;

    let token = auth_header.strip_prefix("Bearer ").ok_or(ApiError::Auth)?;

    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(|_| ApiError::Auth)?;

    req.extensions_mut().insert(token_data.claims);
    Ok(next.run(req).await)
}
