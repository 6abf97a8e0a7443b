use axum::{
    Router,
    routing::{delete, get, post},
};

use crate::auth::{self, AppState};
use crate::middleware::require_auth;
use crate::{account, messages, suggestions};

/// Assembles the full API surface. Living here (rather than in the binary)
/// lets integration tests drive the exact router the server runs.
pub fn router(state: AppState) -> Router {
    let public = Router::new()
        .route("/auth/sign-up", post(auth::sign_up))
        .route("/auth/sign-in", post(auth::sign_in))
        .route("/auth/check-username", get(auth::check_username))
        .route("/u/{username}/messages", post(messages::send_message))
        .route("/suggest-messages", get(suggestions::suggest_messages))
        .with_state(state.clone());

    let protected = Router::new()
        .route("/messages", get(messages::list_messages))
        .route("/messages/{message_id}", delete(messages::delete_message))
        .route(
            "/accept-messages",
            get(account::get_acceptance).post(account::set_acceptance),
        )
        .layer(axum::middleware::from_fn_with_state(state.clone(), require_auth))
        .with_state(state);

    Router::new().merge(public).merge(protected)
}
