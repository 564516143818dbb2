use axum::body::Body;
use axum::extract::State;
use axum::http::{Request, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::response::json_error;
use crate::state::AppState;

/// Rejects requests without a well-formed token; inserts an `AuthUser`
/// extension on success. A parsable token naming a nonexistent user is 404
/// rather than 401; the web client relies on the distinction.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    if crate::auth::extract_user_id(req.headers()).is_none() {
        return json_error(StatusCode::UNAUTHORIZED, "Authentication required").into_response();
    }

    match crate::auth::resolve_user(state.db(), req.headers()).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
            next.run(req).await
        }
        Ok(None) => json_error(StatusCode::NOT_FOUND, "User not found").into_response(),
        Err(err) => {
            tracing::error!(error = %err, "auth lookup failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error").into_response()
        }
    }
}

/// Like `require_auth` but anonymous and unknown-user requests proceed as
/// guests; used by the TTS, translate, and save paths.
pub async fn optional_auth(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    match crate::auth::resolve_user(state.db(), req.headers()).await {
        Ok(Some(user)) => {
            req.extensions_mut().insert(user);
        }
        Ok(None) => {}
        Err(err) => {
            tracing::warn!(error = %err, "auth lookup failed, continuing as guest");
        }
    }
    next.run(req).await
}
