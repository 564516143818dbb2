use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use serde::{Deserialize, Serialize};

use crate::auth::AuthUser;
use crate::db::operations::user::{self, ProfileUpdate, UserProfile};
use crate::response::{json_error, ApiJson};
use crate::state::AppState;
use crate::types::{TranslationService, TtsService, VoiceSpeed};

#[derive(Debug, Deserialize)]
pub(crate) struct LoginRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RegisterRequest {
    #[serde(default)]
    username: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    password: String,
}

#[derive(Serialize)]
struct UserSummary {
    id: i64,
    username: String,
    email: String,
}

impl From<&AuthUser> for UserSummary {
    fn from(user: &AuthUser) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
            email: user.email.clone(),
        }
    }
}

/// Profile summary returned on login; no plaintext keys.
#[derive(Serialize)]
struct ProfileSummary {
    can_use_ai: bool,
    has_elevenlabs_key: bool,
    has_groq_key: bool,
    preferred_voice_speed: VoiceSpeed,
    preferred_tts_service: TtsService,
    daily_usage: i64,
    total_usage: i64,
}

impl ProfileSummary {
    fn from_profile(profile: &UserProfile) -> Self {
        Self {
            can_use_ai: profile.can_use_ai(),
            has_elevenlabs_key: profile.elevenlabs_key().is_some(),
            has_groq_key: profile.groq_key().is_some(),
            preferred_voice_speed: profile.preferred_voice_speed,
            preferred_tts_service: profile.preferred_tts_service,
            daily_usage: profile.daily_character_usage,
            total_usage: profile.total_characters_used,
        }
    }
}

/// Full profile for the settings screen. Keys are returned in plaintext so
/// the client can show and edit them; absent keys render as empty strings.
#[derive(Serialize)]
struct ProfileDetail {
    can_use_ai: bool,
    has_elevenlabs_key: bool,
    has_groq_key: bool,
    has_google_key: bool,
    has_google_tts_key: bool,
    preferred_voice_speed: VoiceSpeed,
    preferred_tts_service: TtsService,
    preferred_translation_service: TranslationService,
    daily_usage: i64,
    total_usage: i64,
    elevenlabs_api_key: String,
    groq_api_key: String,
    google_translate_api_key: String,
    google_tts_api_key: String,
}

impl ProfileDetail {
    fn from_profile(profile: &UserProfile) -> Self {
        Self {
            can_use_ai: profile.can_use_ai(),
            has_elevenlabs_key: profile.elevenlabs_key().is_some(),
            has_groq_key: profile.groq_key().is_some(),
            has_google_key: profile.google_translate_key().is_some(),
            has_google_tts_key: profile.google_tts_key().is_some(),
            preferred_voice_speed: profile.preferred_voice_speed,
            preferred_tts_service: profile.preferred_tts_service,
            preferred_translation_service: profile.preferred_translation_service,
            daily_usage: profile.daily_character_usage,
            total_usage: profile.total_characters_used,
            elevenlabs_api_key: profile.elevenlabs_api_key.clone().unwrap_or_default(),
            groq_api_key: profile.groq_api_key.clone().unwrap_or_default(),
            google_translate_api_key: profile
                .google_translate_api_key
                .clone()
                .unwrap_or_default(),
            google_tts_api_key: profile.google_tts_api_key.clone().unwrap_or_default(),
        }
    }
}

/// Preference echo returned after a profile update.
#[derive(Serialize)]
struct ProfileUpdated {
    can_use_ai: bool,
    has_elevenlabs_key: bool,
    has_groq_key: bool,
    has_google_key: bool,
    has_google_tts_key: bool,
    preferred_voice_speed: VoiceSpeed,
    preferred_tts_service: TtsService,
    preferred_translation_service: TranslationService,
}

pub(crate) async fn login(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<LoginRequest>,
) -> Response {
    if payload.username.is_empty() || payload.password.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "Username and password required")
            .into_response();
    }

    let stored = match user::get_user_by_username(state.db(), &payload.username).await {
        Ok(user) => user,
        Err(err) => {
            tracing::error!(error = %err, "login lookup failed");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Login failed")
                .into_response();
        }
    };

    let Some(stored) = stored else {
        return json_error(StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    };

    let password_ok = bcrypt::verify(&payload.password, &stored.password_hash).unwrap_or(false);
    if !password_ok {
        tracing::debug!(username = %payload.username, "login failed");
        return json_error(StatusCode::UNAUTHORIZED, "Invalid credentials").into_response();
    }

    let profile = match user::get_or_create_profile(state.db(), stored.id).await {
        Ok(profile) => profile,
        Err(err) => {
            tracing::error!(error = %err, "profile create failed on login");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Login failed")
                .into_response();
        }
    };

    tracing::info!(username = %stored.username, "login successful");

    Json(serde_json::json!({
        "success": true,
        "user": {
            "id": stored.id,
            "username": stored.username,
            "email": stored.email,
        },
        "token": crate::auth::token_for_user(stored.id),
        "profile": ProfileSummary::from_profile(&profile),
    }))
    .into_response()
}

pub(crate) async fn register(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<RegisterRequest>,
) -> Response {
    if payload.username.is_empty() || payload.email.is_empty() || payload.password.is_empty() {
        return json_error(StatusCode::BAD_REQUEST, "All fields required").into_response();
    }

    match user::username_exists(state.db(), &payload.username).await {
        Ok(true) => {
            return json_error(StatusCode::BAD_REQUEST, "Username already exists")
                .into_response();
        }
        Ok(false) => {}
        Err(err) => {
            tracing::error!(error = %err, "register username check failed");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed")
                .into_response();
        }
    }

    match user::email_exists(state.db(), &payload.email).await {
        Ok(true) => {
            return json_error(StatusCode::BAD_REQUEST, "Email already exists").into_response();
        }
        Ok(false) => {}
        Err(err) => {
            tracing::error!(error = %err, "register email check failed");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed")
                .into_response();
        }
    }

    let password_hash = match bcrypt::hash(&payload.password, 10) {
        Ok(hash) => hash,
        Err(err) => {
            tracing::error!(error = %err, "password hash failed");
            return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed")
                .into_response();
        }
    };

    let user_id =
        match user::create_user(state.db(), &payload.username, &payload.email, &password_hash)
            .await
        {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(error = %err, "user insert failed");
                return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Registration failed")
                    .into_response();
            }
        };

    tracing::info!(username = %payload.username, user_id, "user registered");

    // The web client discards this placeholder and logs in for a real token.
    Json(serde_json::json!({
        "success": true,
        "user": {
            "id": user_id,
            "username": payload.username,
            "email": payload.email,
        },
        "token": "dummy_token",
        "message": "User created successfully",
    }))
    .into_response()
}

pub(crate) async fn get_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Response {
    match user::get_or_create_profile(state.db(), auth_user.id).await {
        Ok(profile) => Json(serde_json::json!({
            "user": UserSummary::from(&auth_user),
            "profile": ProfileDetail::from_profile(&profile),
        }))
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "profile fetch failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Profile operation failed")
                .into_response()
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct ProfileUpdateRequest {
    elevenlabs_api_key: Option<String>,
    groq_api_key: Option<String>,
    openai_api_key: Option<String>,
    google_translate_api_key: Option<String>,
    google_tts_api_key: Option<String>,
    preferred_voice_speed: Option<VoiceSpeed>,
    preferred_tts_service: Option<TtsService>,
    preferred_translation_service: Option<TranslationService>,
}

pub(crate) async fn update_profile(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
    ApiJson(payload): ApiJson<ProfileUpdateRequest>,
) -> Response {
    if let Some(service) = payload.preferred_tts_service {
        if !service.is_profile_choice() {
            return json_error(
                StatusCode::BAD_REQUEST,
                "preferred_tts_service must be one of browser, google, google_cloud, elevenlabs",
            )
            .into_response();
        }
    }

    let update = ProfileUpdate {
        elevenlabs_api_key: payload.elevenlabs_api_key,
        groq_api_key: payload.groq_api_key,
        openai_api_key: payload.openai_api_key,
        google_translate_api_key: payload.google_translate_api_key,
        google_tts_api_key: payload.google_tts_api_key,
        preferred_voice_speed: payload.preferred_voice_speed,
        preferred_tts_service: payload.preferred_tts_service,
        preferred_translation_service: payload.preferred_translation_service,
    };

    match user::update_profile(state.db(), auth_user.id, &update).await {
        Ok(profile) => Json(serde_json::json!({
            "success": true,
            "message": "Profile updated successfully",
            "profile": ProfileUpdated {
                can_use_ai: profile.can_use_ai(),
                has_elevenlabs_key: profile.elevenlabs_key().is_some(),
                has_groq_key: profile.groq_key().is_some(),
                has_google_key: profile.google_translate_key().is_some(),
                has_google_tts_key: profile.google_tts_key().is_some(),
                preferred_voice_speed: profile.preferred_voice_speed,
                preferred_tts_service: profile.preferred_tts_service,
                preferred_translation_service: profile.preferred_translation_service,
            },
        }))
        .into_response(),
        Err(err) => {
            tracing::error!(error = %err, "profile update failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Profile operation failed")
                .into_response()
        }
    }
}

/// Maintenance: reset the daily character counter when its stored usage date
/// has fallen behind today.
pub(crate) async fn reset_usage(
    State(state): State<AppState>,
    Extension(auth_user): Extension<AuthUser>,
) -> Response {
    if let Err(err) = user::get_or_create_profile(state.db(), auth_user.id).await {
        tracing::error!(error = %err, "profile create failed on usage reset");
        return json_error(StatusCode::INTERNAL_SERVER_ERROR, "Profile operation failed")
            .into_response();
    }

    match user::reset_daily_usage_if_stale(state.db(), auth_user.id).await {
        Ok(reset) => Json(serde_json::json!({ "success": true, "reset": reset })).into_response(),
        Err(err) => {
            tracing::error!(error = %err, "usage reset failed");
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Profile operation failed")
                .into_response()
        }
    }
}
