use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::db::operations::user;
use crate::response::{json_error, ApiJson};
use crate::services::cascade::{self, ProviderKeys, TranslationRequest};
use crate::state::AppState;
use crate::types::TranslationService;

#[derive(Debug, Deserialize)]
pub(crate) struct TranslateRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    service: Option<TranslationService>,
    #[serde(default)]
    target_language: Option<String>,
    #[serde(default)]
    source_language: Option<String>,
}

pub(crate) async fn translate_text(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    ApiJson(payload): ApiJson<TranslateRequest>,
) -> Response {
    if payload.text.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Text is required").into_response();
    }

    let requested = payload.service.unwrap_or_default();
    let target_language = payload.target_language.unwrap_or_else(|| "ko".to_string());
    let source_language = payload
        .source_language
        .unwrap_or_else(|| "auto".to_string());

    tracing::debug!(
        text_len = payload.text.len(),
        from = %source_language,
        to = %target_language,
        service = requested.as_str(),
        "translation request"
    );

    let (keys, actual) = match auth_user {
        Some(Extension(auth_user)) => {
            match user::get_or_create_profile(state.db(), auth_user.id).await {
                Ok(profile) => {
                    let actual = cascade::resolve_translation_service(requested, Some(&profile));
                    (Some(ProviderKeys::from_profile(&profile)), actual)
                }
                Err(err) => {
                    tracing::error!(error = %err, "profile load failed for translation");
                    return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Translation failed")
                        .into_response();
                }
            }
        }
        None => (None, requested),
    };

    let request = TranslationRequest {
        text: payload.text,
        target_language,
        source_language,
    };

    let (service, translation) =
        cascade::run_translation_cascade(state.providers(), keys.as_ref(), actual, &request).await;

    Json(serde_json::json!({
        "success": true,
        "service": service,
        "translation": translation,
    }))
    .into_response()
}
