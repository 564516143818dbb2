use chrono::{NaiveDate, Utc};
use serde::Serialize;
use sqlx::Row;

use crate::db::Database;
use crate::types::{TranslationService, TtsService, VoiceSpeed};

#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    #[serde(skip)]
    pub password_hash: String,
}

#[derive(Debug, Clone)]
pub struct UserProfile {
    pub user_id: i64,
    pub elevenlabs_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub google_translate_api_key: Option<String>,
    pub google_tts_api_key: Option<String>,
    pub preferred_voice_speed: VoiceSpeed,
    pub preferred_tts_service: TtsService,
    pub preferred_translation_service: TranslationService,
    pub daily_character_usage: i64,
    pub last_usage_date: NaiveDate,
    pub total_characters_used: i64,
}

impl UserProfile {
    /// A key counts as present only when it is non-empty; clients clear keys
    /// by submitting an empty string.
    pub fn elevenlabs_key(&self) -> Option<&str> {
        non_empty(self.elevenlabs_api_key.as_deref())
    }

    pub fn groq_key(&self) -> Option<&str> {
        non_empty(self.groq_api_key.as_deref())
    }

    pub fn google_translate_key(&self) -> Option<&str> {
        non_empty(self.google_translate_api_key.as_deref())
    }

    pub fn google_tts_key(&self) -> Option<&str> {
        non_empty(self.google_tts_api_key.as_deref())
    }

    pub fn can_use_ai(&self) -> bool {
        self.elevenlabs_key().is_some()
            || self.groq_key().is_some()
            || self.google_translate_key().is_some()
            || self.google_tts_key().is_some()
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Partial profile update; `None` fields are left untouched. Submitting an
/// empty string clears the corresponding key.
#[derive(Debug, Default, Clone)]
pub struct ProfileUpdate {
    pub elevenlabs_api_key: Option<String>,
    pub groq_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub google_translate_api_key: Option<String>,
    pub google_tts_api_key: Option<String>,
    pub preferred_voice_speed: Option<VoiceSpeed>,
    pub preferred_tts_service: Option<TtsService>,
    pub preferred_translation_service: Option<TranslationService>,
}

pub async fn create_user(
    db: &Database,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<i64, sqlx::Error> {
    let result = sqlx::query(
        "INSERT INTO users (username, email, password_hash) VALUES ($1, $2, $3)",
    )
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .execute(db.pool())
    .await?;
    Ok(result.last_insert_rowid())
}

pub async fn get_user_by_id(db: &Database, user_id: i64) -> Result<Option<User>, sqlx::Error> {
    let row = sqlx::query("SELECT id, username, email, password_hash FROM users WHERE id = $1")
        .bind(user_id)
        .fetch_optional(db.pool())
        .await?;
    row.map(user_from_row).transpose()
}

pub async fn get_user_by_username(
    db: &Database,
    username: &str,
) -> Result<Option<User>, sqlx::Error> {
    let row =
        sqlx::query("SELECT id, username, email, password_hash FROM users WHERE username = $1")
            .bind(username)
            .fetch_optional(db.pool())
            .await?;
    row.map(user_from_row).transpose()
}

pub async fn username_exists(db: &Database, username: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM users WHERE username = $1 LIMIT 1")
        .bind(username)
        .fetch_optional(db.pool())
        .await?;
    Ok(row.is_some())
}

pub async fn email_exists(db: &Database, email: &str) -> Result<bool, sqlx::Error> {
    let row = sqlx::query("SELECT 1 FROM users WHERE email = $1 LIMIT 1")
        .bind(email)
        .fetch_optional(db.pool())
        .await?;
    Ok(row.is_some())
}

fn user_from_row(row: sqlx::sqlite::SqliteRow) -> Result<User, sqlx::Error> {
    Ok(User {
        id: row.try_get("id")?,
        username: row.try_get("username")?,
        email: row.try_get("email")?,
        password_hash: row.try_get("password_hash")?,
    })
}

/// Lazily creates the one-to-one profile on first access.
pub async fn get_or_create_profile(
    db: &Database,
    user_id: i64,
) -> Result<UserProfile, sqlx::Error> {
    if let Some(profile) = get_profile(db, user_id).await? {
        return Ok(profile);
    }

    sqlx::query(
        "INSERT INTO user_profiles (user_id) VALUES ($1)
         ON CONFLICT (user_id) DO NOTHING",
    )
    .bind(user_id)
    .execute(db.pool())
    .await?;

    let profile = get_profile(db, user_id).await?;
    profile.ok_or(sqlx::Error::RowNotFound)
}

async fn get_profile(db: &Database, user_id: i64) -> Result<Option<UserProfile>, sqlx::Error> {
    let row = sqlx::query(
        "SELECT user_id, elevenlabs_api_key, groq_api_key, openai_api_key,
                google_translate_api_key, google_tts_api_key,
                preferred_voice_speed, preferred_tts_service,
                preferred_translation_service, daily_character_usage,
                last_usage_date, total_characters_used
         FROM user_profiles WHERE user_id = $1",
    )
    .bind(user_id)
    .fetch_optional(db.pool())
    .await?;

    row.map(profile_from_row).transpose()
}

fn profile_from_row(row: sqlx::sqlite::SqliteRow) -> Result<UserProfile, sqlx::Error> {
    let speed: String = row.try_get("preferred_voice_speed")?;
    let tts: String = row.try_get("preferred_tts_service")?;
    let translation: String = row.try_get("preferred_translation_service")?;
    let last_usage: String = row.try_get("last_usage_date")?;

    Ok(UserProfile {
        user_id: row.try_get("user_id")?,
        elevenlabs_api_key: row.try_get("elevenlabs_api_key")?,
        groq_api_key: row.try_get("groq_api_key")?,
        openai_api_key: row.try_get("openai_api_key")?,
        google_translate_api_key: row.try_get("google_translate_api_key")?,
        google_tts_api_key: row.try_get("google_tts_api_key")?,
        preferred_voice_speed: VoiceSpeed::parse(&speed).unwrap_or(VoiceSpeed::Normal),
        preferred_tts_service: TtsService::parse(&tts).unwrap_or(TtsService::Google),
        preferred_translation_service: TranslationService::parse(&translation)
            .unwrap_or(TranslationService::Auto),
        daily_character_usage: row.try_get("daily_character_usage")?,
        last_usage_date: NaiveDate::parse_from_str(&last_usage, "%Y-%m-%d")
            .unwrap_or_else(|_| Utc::now().date_naive()),
        total_characters_used: row.try_get("total_characters_used")?,
    })
}

pub async fn update_profile(
    db: &Database,
    user_id: i64,
    update: &ProfileUpdate,
) -> Result<UserProfile, sqlx::Error> {
    // Profile must exist before a partial update can land.
    let _ = get_or_create_profile(db, user_id).await?;

    if let Some(ref value) = update.elevenlabs_api_key {
        set_text_field(db, user_id, "elevenlabs_api_key", value).await?;
    }
    if let Some(ref value) = update.groq_api_key {
        set_text_field(db, user_id, "groq_api_key", value).await?;
    }
    if let Some(ref value) = update.openai_api_key {
        set_text_field(db, user_id, "openai_api_key", value).await?;
    }
    if let Some(ref value) = update.google_translate_api_key {
        set_text_field(db, user_id, "google_translate_api_key", value).await?;
    }
    if let Some(ref value) = update.google_tts_api_key {
        set_text_field(db, user_id, "google_tts_api_key", value).await?;
    }
    if let Some(speed) = update.preferred_voice_speed {
        set_text_field(db, user_id, "preferred_voice_speed", speed.as_str()).await?;
    }
    if let Some(service) = update.preferred_tts_service {
        set_text_field(db, user_id, "preferred_tts_service", service.as_str()).await?;
    }
    if let Some(service) = update.preferred_translation_service {
        set_text_field(db, user_id, "preferred_translation_service", service.as_str()).await?;
    }

    let profile = get_profile(db, user_id).await?;
    profile.ok_or(sqlx::Error::RowNotFound)
}

async fn set_text_field(
    db: &Database,
    user_id: i64,
    column: &'static str,
    value: &str,
) -> Result<(), sqlx::Error> {
    // Column names come from a fixed set above, never from request input.
    let sql = format!(
        "UPDATE user_profiles SET {column} = $1, updated_at = datetime('now') WHERE user_id = $2"
    );
    sqlx::query(&sql)
        .bind(value)
        .bind(user_id)
        .execute(db.pool())
        .await?;
    Ok(())
}

/// Maintenance operation: zero the daily character counter when the stored
/// usage date has fallen behind today. Returns whether a reset happened.
pub async fn reset_daily_usage_if_stale(
    db: &Database,
    user_id: i64,
) -> Result<bool, sqlx::Error> {
    let today = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let result = sqlx::query(
        "UPDATE user_profiles
         SET daily_character_usage = 0,
             last_usage_date = $1,
             updated_at = datetime('now')
         WHERE user_id = $2 AND last_usage_date < $1",
    )
    .bind(&today)
    .bind(user_id)
    .execute(db.pool())
    .await?;
    Ok(result.rows_affected() > 0)
}
