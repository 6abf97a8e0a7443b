use axum::{Extension, Json, extract::State};

use murmur_types::api::{AcceptanceResponse, Claims, SetAcceptanceRequest};

use crate::auth::AppState;
use crate::error::ApiError;

/// The acceptance flag gates future intake only; stored messages are never
/// affected by toggling it. Both operations act on the authenticated
/// principal's own account, so ownership holds by construction.
pub async fn get_acceptance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<AcceptanceResponse>, ApiError> {
    let user = state
        .db
        .get_user_by_id(&claims.sub.to_string())?
        .ok_or(ApiError::Auth)?;

    Ok(Json(AcceptanceResponse {
        is_accepting_messages: user.is_accepting_messages,
    }))
}

/// Unconditional overwrite, idempotent; returns the new value.
pub async fn set_acceptance(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SetAcceptanceRequest>,
) -> Result<Json<AcceptanceResponse>, ApiError> {
    let updated = state
        .db
        .set_accepting_messages(&claims.sub.to_string(), req.is_accepting_messages)?;

    // Valid token for an account that no longer exists
    if !updated {
        return Err(ApiError::Auth);
    }

    Ok(Json(AcceptanceResponse {
        is_accepting_messages: req.is_accepting_messages,
    }))
}
