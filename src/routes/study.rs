use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::db::operations::history::{self, SaveStudyInput, StudyItem};
use crate::response::{json_error, ApiJson};
use crate::state::AppState;

const HISTORY_LIMIT: i64 = 50;

#[derive(Serialize)]
struct HistoryEntry {
    id: i64,
    text: String,
    translation: String,
    target_language: String,
    source_language: String,
    date: String,
    tts_service: String,
    voice_speed: String,
    accessed_count: i64,
}

impl From<StudyItem> for HistoryEntry {
    fn from(item: StudyItem) -> Self {
        Self {
            id: item.item_id(),
            date: item.display_date(),
            text: item.english_text,
            translation: item.translation,
            target_language: item.target_language,
            source_language: item.source_language,
            tts_service: item.tts_service_used,
            voice_speed: item.voice_speed_used,
            accessed_count: item.accessed_count,
        }
    }
}

pub(crate) async fn get_history(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Response {
    match history::list_recent(state.db(), auth_user.id, HISTORY_LIMIT).await {
        Ok(items) => {
            tracing::debug!(
                username = %auth_user.username,
                count = items.len(),
                "loaded study history"
            );
            let entries: Vec<HistoryEntry> = items.into_iter().map(HistoryEntry::from).collect();
            Json(serde_json::json!({
                "success": true,
                "history": entries,
            }))
            .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "study history load failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to load study history")
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct SaveRequest {
    #[serde(default)]
    text: String,
    #[serde(default)]
    translation: String,
    #[serde(default = "default_target_language")]
    target_language: String,
    #[serde(default = "default_source_language")]
    source_language: String,
    #[serde(default)]
    tts_service: String,
    #[serde(default = "default_voice_speed")]
    voice_speed: String,
}

fn default_target_language() -> String {
    "ko".to_string()
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_voice_speed() -> String {
    "normal".to_string()
}

pub(crate) async fn save_item(
    State(state): State<AppState>,
    auth_user: Option<Extension<AuthUser>>,
    ApiJson(payload): ApiJson<SaveRequest>,
) -> Response {
    if payload.text.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Text is required").into_response();
    }

    let Some(Extension(auth_user)) = auth_user else {
        // Guests keep their history client-side.
        return Json(serde_json::json!({
            "success": true,
            "message": "Use localStorage for guest users",
            "guest": true,
        }))
        .into_response();
    };

    let input = SaveStudyInput {
        english_text: payload.text,
        translation: payload.translation,
        target_language: payload.target_language,
        source_language: payload.source_language,
        tts_service: payload.tts_service,
        voice_speed: payload.voice_speed,
    };

    match history::save_study_item(state.db(), auth_user.id, &input).await {
        Ok(outcome) => {
            let message = if outcome.updated {
                "Study item updated in database"
            } else {
                "Study item saved to database"
            };
            Json(serde_json::json!({
                "success": true,
                "message": message,
                "item_id": outcome.item_id_ms,
            }))
            .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "study item save failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to save study item")
                .into_response()
        }
    }
}

pub(crate) async fn delete_all(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Response {
    match history::delete_all(state.db(), auth_user.id).await {
        Ok(deleted_count) => {
            tracing::info!(
                username = %auth_user.username,
                deleted_count,
                "deleted all study history"
            );
            Json(serde_json::json!({
                "success": true,
                "message": format!("Deleted {deleted_count} study records"),
                "deleted_count": deleted_count,
            }))
            .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "study history delete failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Failed to delete study history")
                .into_response()
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct DeleteSelectedRequest {
    #[serde(default)]
    item_ids: Vec<serde_json::Value>,
}

pub(crate) async fn delete_selected(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<DeleteSelectedRequest>,
) -> Response {
    if payload.item_ids.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "No item IDs provided").into_response();
    }

    // Ids arrive as JS numbers or strings; anything unparseable is skipped.
    let item_ids: Vec<i64> = payload
        .item_ids
        .iter()
        .filter_map(|value| match value {
            serde_json::Value::Number(n) => n.as_i64(),
            serde_json::Value::String(s) => s.parse().ok(),
            _ => None,
        })
        .collect();

    match history::delete_by_timestamps(state.db(), auth_user.id, &item_ids).await {
        Ok(deleted_count) => {
            tracing::info!(
                username = %auth_user.username,
                deleted_count,
                "deleted selected study history"
            );
            Json(serde_json::json!({
                "success": true,
                "message": format!("Deleted {deleted_count} selected study records"),
                "deleted_count": deleted_count,
            }))
            .into_response()
        }
        Err(err) => {
            tracing::error!(error = %err, "selected study history delete failed");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Failed to delete selected study history",
            )
            .into_response()
        }
    }
}
