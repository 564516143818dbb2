pub mod auth;
pub mod health;
pub mod speech;
pub mod study;
pub mod translate;

use axum::http::StatusCode;
use axum::middleware::from_fn_with_state;
use axum::response::{IntoResponse, Response};
use axum::routing::{delete, get, post};
use axum::Router;

use crate::middleware::auth::{optional_auth, require_auth};
use crate::response::json_error;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let public = Router::new()
        .route("/api/auth/login", post(auth::login))
        .route("/api/auth/register", post(auth::register));

    let protected = Router::new()
        .route(
            "/api/auth/profile",
            get(auth::get_profile).put(auth::update_profile),
        )
        .route("/api/auth/profile/reset-usage", post(auth::reset_usage))
        .route("/api/study/history", get(study::get_history))
        .route("/api/study/delete-all", delete(study::delete_all))
        .route("/api/study/delete-selected", delete(study::delete_selected))
        .route_layer(from_fn_with_state(state.clone(), require_auth));

    let guest_friendly = Router::new()
        .route("/api/text-to-speech", post(speech::text_to_speech))
        .route("/api/translate", post(translate::translate_text))
        .route("/api/study/save", post(study::save_item))
        .route_layer(from_fn_with_state(state.clone(), optional_auth));

    Router::new()
        .merge(public)
        .merge(protected)
        .merge(guest_friendly)
        .nest("/health", health::router())
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> Response {
    json_error(StatusCode::NOT_FOUND, "Not found").into_response()
}
