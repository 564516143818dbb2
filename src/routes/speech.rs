use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::Deserialize;

use crate::auth::AuthUser;
use crate::db::operations::user;
use crate::response::{json_error, ApiJson};
use crate::services::cascade::{self, ProviderKeys, TtsOutcome, TtsRequest};
use crate::state::AppState;
use crate::types::{TtsService, VoiceSpeed};

#[derive(Debug, Deserialize)]
pub(crate) struct SpeechRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    speed: Option<VoiceSpeed>,
    #[serde(default)]
    service: Option<TtsService>,
    #[serde(default)]
    source_language: Option<String>,
}

pub(crate) async fn text_to_speech(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    ApiJson(payload): ApiJson<SpeechRequest>,
) -> Response {
    if payload.text.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Text is required").into_response();
    }

    let speed = payload.speed.unwrap_or_default();
    let requested = payload.service.unwrap_or(TtsService::Google);
    let source_language = payload
        .source_language
        .unwrap_or_else(|| "auto".to_string());

    let language =
        cascade::resolve_source_language(state.providers(), &payload.text, &source_language).await;

    tracing::debug!(
        text_len = payload.text.len(),
        language = %language,
        service = requested.as_str(),
        speed = speed.as_str(),
        "TTS request"
    );

    let (keys, actual) = match auth_user {
        Some(Extension(auth_user)) => {
            match user::get_or_create_profile(state.db(), auth_user.id).await {
                Ok(profile) => {
                    let actual = cascade::resolve_tts_service(requested, Some(&profile));
                    (Some(ProviderKeys::from_profile(&profile)), actual)
                }
                Err(err) => {
                    tracing::error!(error = %err, "profile load failed for TTS");
                    return json_error(StatusCode::INTERNAL_SERVER_ERROR, "TTS failed")
                        .into_response();
                }
            }
        }
        None => (None, requested),
    };

    let request = TtsRequest {
        text: payload.text,
        speed,
        language,
    };

    match cascade::run_tts_cascade(state.providers(), keys.as_ref(), actual, &request).await {
        TtsOutcome::Audio {
            service,
            audio_base64,
        } => Json(serde_json::json!({
            "success": true,
            "service": service,
            "audio_data": audio_base64,
        }))
        .into_response(),
        TtsOutcome::Browser => Json(serde_json::json!({
            "success": true,
            "service": "browser",
            "use_browser_tts": true,
            "message": "Use browser TTS fallback",
        }))
        .into_response(),
    }
}
