use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Clone, Serialize)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Every handler returns `Result<_, ApiError>`; none of these conditions
/// crash the process. The wire body carries a machine-checkable `error` kind
/// next to the human-readable `message`.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("invalid input")]
    Validation(Vec<FieldError>),

    #[error("{0} is already taken")]
    Conflict(&'static str),

    #[error("{0} not found")]
    NotFound(&'static str),

    #[error("this account is not accepting messages")]
    Rejected,

    #[error("authentication required")]
    Auth,

    #[error("storage failure")]
    Store(#[from] anyhow::Error),
}

impl ApiError {
    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::Validation(_) => "validation",
            ApiError::Conflict(_) => "conflict",
            ApiError::NotFound(_) => "not_found",
            ApiError::Rejected => "rejected",
            ApiError::Auth => "auth",
            ApiError::Store(_) => "store",
        }
    }

    fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Rejected => StatusCode::FORBIDDEN,
            ApiError::Auth => StatusCode::UNAUTHORIZED,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // Persistence details stay in the logs, not on the wire
        if let ApiError::Store(e) = &self {
            error!("store failure: {:#}", e);
        }

        let mut body = json!({
            "error": self.kind(),
            "message": self.to_string(),
        });
        if let ApiError::Validation(fields) = &self {
            body["details"] = json!(fields);
        }

        (self.status(), Json(body)).into_response()
    }
}
