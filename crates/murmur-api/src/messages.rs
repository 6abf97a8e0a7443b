use anyhow::anyhow;
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};
use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use murmur_types::api::{Claims, MessageResponse, SendMessageRequest, SendMessageResponse};

use crate::auth::AppState;
use crate::error::ApiError;
use crate::validate;

/// Anonymous intake: no authentication, no sender identity recorded. The
/// response is an acknowledgement only -- the stored message is never echoed
/// back, and the sender learns nothing about the recipient beyond
/// accept/reject.
pub async fn send_message(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate::content(&req.content)?;

    // Run blocking DB work off the async runtime
    let db = state.clone();
    tokio::task::spawn_blocking(move || {
        let user = db
            .db
            .get_user_by_username(&username)?
            .ok_or(ApiError::NotFound("user"))?;

        if !user.is_accepting_messages {
            return Err(ApiError::Rejected);
        }

        // Single-row INSERT: concurrent senders cannot clobber each other
        let message_id = Uuid::new_v4();
        db.db
            .insert_message(&message_id.to_string(), &user.id, &req.content)?;
        Ok(())
    })
    .await
    .map_err(join_error)??;

    Ok((
        StatusCode::CREATED,
        Json(SendMessageResponse {
            message: "Message sent".to_string(),
        }),
    ))
}

/// All messages owned by the authenticated principal, newest first.
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let owner_id = claims.sub.to_string();

    let rows = tokio::task::spawn_blocking(move || db.db.list_messages(&owner_id))
        .await
        .map_err(join_error)??;

    let messages: Vec<MessageResponse> = rows
        .into_iter()
        .map(|row| MessageResponse {
            id: row.id.parse().unwrap_or_else(|e| {
                warn!("Corrupt message id '{}': {}", row.id, e);
                Uuid::default()
            }),
            content: row.content,
            created_at: DateTime::parse_from_rfc3339(&row.created_at)
                .map(|dt| dt.with_timezone(&Utc))
                .unwrap_or_else(|e| {
                    warn!("Corrupt created_at '{}' on message '{}': {}", row.created_at, row.id, e);
                    DateTime::default()
                }),
        })
        .collect();

    Ok(Json(messages))
}

/// Owner-scoped delete. The store filters by message id AND owner id, so a
/// message belonging to another account is indistinguishable from one that
/// does not exist: both are a miss, surfaced as not_found rather than a
/// silent success.
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(message_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let owner_id = claims.sub.to_string();

    let deleted =
        tokio::task::spawn_blocking(move || db.db.delete_message(&owner_id, &message_id.to_string()))
            .await
            .map_err(join_error)??;

    if !deleted {
        return Err(ApiError::NotFound("message"));
    }

    Ok(StatusCode::NO_CONTENT)
}

fn join_error(e: tokio::task::JoinError) -> ApiError {
    ApiError::Store(anyhow!("blocking task join error: {e}"))
}
