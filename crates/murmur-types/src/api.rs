use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- JWT Claims --

/// JWT claims attached to every authenticated request. Canonical definition
/// lives here so the middleware and any future gateway share one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Auth --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignUpRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignUpResponse {
    pub user_id: Uuid,
    pub username: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SignInRequest {
    /// Username or email.
    pub identifier: String,
    pub password: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SignInResponse {
    pub user_id: Uuid,
    pub username: String,
    pub token: String,
}

#[derive(Debug, Deserialize)]
pub struct UsernameCheckQuery {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UsernameCheckResponse {
    pub username: String,
    pub available: bool,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SendMessageRequest {
    pub content: String,
}

/// Acknowledgement only — the stored message is never echoed back to the
/// anonymous sender.
#[derive(Debug, Serialize, Deserialize)]
pub struct SendMessageResponse {
    pub message: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

// -- Acceptance flag --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SetAcceptanceRequest {
    pub is_accepting_messages: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AcceptanceResponse {
    pub is_accepting_messages: bool,
}

// -- Suggestions --

#[derive(Debug, Serialize, Deserialize)]
pub struct SuggestionsResponse {
    pub suggestions: Vec<String>,
}
