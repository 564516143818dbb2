use chrono::{TimeZone, Utc};
use sqlx::Row;

use crate::db::Database;

/// Rows created within this distance of a client-supplied timestamp are
/// considered a match when deleting by derived id.
pub const DELETE_WINDOW_MS: i64 = 1000;

#[derive(Debug, Clone)]
pub struct StudyItem {
    pub english_text: String,
    pub translation: String,
    pub target_language: String,
    pub source_language: String,
    pub tts_service_used: String,
    pub voice_speed_used: String,
    pub created_at_ms: i64,
    pub accessed_count: i64,
}

impl StudyItem {
    /// Client-visible identifier: the creation instant in milliseconds.
    pub fn item_id(&self) -> i64 {
        self.created_at_ms
    }

    /// Display date in the shape the web client expects, e.g.
    /// `08/29/2026, 03:05:09 PM`.
    pub fn display_date(&self) -> String {
        Utc.timestamp_millis_opt(self.created_at_ms)
            .single()
            .map(|dt| dt.format("%m/%d/%Y, %I:%M:%S %p").to_string())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone)]
pub struct SaveStudyInput {
    pub english_text: String,
    pub translation: String,
    pub target_language: String,
    pub source_language: String,
    pub tts_service: String,
    pub voice_speed: String,
}

#[derive(Debug, Clone, Copy)]
pub struct UpsertOutcome {
    pub item_id_ms: i64,
    pub updated: bool,
}

/// Idempotent upsert keyed by `(user, english_text)` exact string equality.
/// A repeat save overwrites the translation metadata and bumps the access
/// counter; the original creation timestamp (and therefore the client id)
/// is preserved.
pub async fn save_study_item(
    db: &Database,
    user_id: i64,
    input: &SaveStudyInput,
) -> Result<UpsertOutcome, sqlx::Error> {
    let existing = sqlx::query(
        "SELECT id, created_at_ms FROM study_history
         WHERE user_id = $1 AND english_text = $2
         LIMIT 1",
    )
    .bind(user_id)
    .bind(&input.english_text)
    .fetch_optional(db.pool())
    .await?;

    let now_ms = Utc::now().timestamp_millis();

    if let Some(row) = existing {
        let row_id: i64 = row.try_get("id")?;
        let created_at_ms: i64 = row.try_get("created_at_ms")?;

        sqlx::query(
            "UPDATE study_history
             SET translation = $1,
                 target_language = $2,
                 source_language = $3,
                 tts_service_used = $4,
                 voice_speed_used = $5,
                 accessed_count = accessed_count + 1,
                 last_accessed_ms = $6
             WHERE id = $7",
        )
        .bind(&input.translation)
        .bind(&input.target_language)
        .bind(&input.source_language)
        .bind(&input.tts_service)
        .bind(&input.voice_speed)
        .bind(now_ms)
        .bind(row_id)
        .execute(db.pool())
        .await?;

        return Ok(UpsertOutcome {
            item_id_ms: created_at_ms,
            updated: true,
        });
    }

    sqlx::query(
        "INSERT INTO study_history (
            user_id, english_text, translation, target_language, source_language,
            tts_service_used, voice_speed_used, created_at_ms, last_accessed_ms,
            accessed_count
         ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $8, 1)",
    )
    .bind(user_id)
    .bind(&input.english_text)
    .bind(&input.translation)
    .bind(&input.target_language)
    .bind(&input.source_language)
    .bind(&input.tts_service)
    .bind(&input.voice_speed)
    .bind(now_ms)
    .execute(db.pool())
    .await?;

    Ok(UpsertOutcome {
        item_id_ms: now_ms,
        updated: false,
    })
}

/// Newest entries first, capped at `limit` (the API uses 50).
pub async fn list_recent(
    db: &Database,
    user_id: i64,
    limit: i64,
) -> Result<Vec<StudyItem>, sqlx::Error> {
    let rows = sqlx::query(
        "SELECT english_text, translation, target_language, source_language,
                tts_service_used, voice_speed_used, created_at_ms, accessed_count
         FROM study_history
         WHERE user_id = $1
         ORDER BY created_at_ms DESC
         LIMIT $2",
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(db.pool())
    .await?;

    rows.into_iter().map(item_from_row).collect()
}

fn item_from_row(row: sqlx::sqlite::SqliteRow) -> Result<StudyItem, sqlx::Error> {
    Ok(StudyItem {
        english_text: row.try_get("english_text")?,
        translation: row.try_get("translation")?,
        target_language: row.try_get("target_language")?,
        source_language: row.try_get("source_language")?,
        tts_service_used: row.try_get("tts_service_used")?,
        voice_speed_used: row.try_get("voice_speed_used")?,
        created_at_ms: row.try_get("created_at_ms")?,
        accessed_count: row.try_get("accessed_count")?,
    })
}

pub async fn delete_all(db: &Database, user_id: i64) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM study_history WHERE user_id = $1")
        .bind(user_id)
        .execute(db.pool())
        .await?;
    Ok(result.rows_affected())
}

/// Deletes rows whose creation instant falls within ±1s of any supplied
/// millisecond timestamp. The derived-id scheme is inherently ambiguous: a
/// window can match zero, one, or several rows, and all matches are removed.
pub async fn delete_by_timestamps(
    db: &Database,
    user_id: i64,
    item_ids_ms: &[i64],
) -> Result<u64, sqlx::Error> {
    let mut deleted = 0u64;
    for &item_id in item_ids_ms {
        // Ids come straight from the client; saturate instead of overflowing
        // at the extremes of the i64 range.
        let result = sqlx::query(
            "DELETE FROM study_history
             WHERE user_id = $1
               AND created_at_ms BETWEEN $2 AND $3",
        )
        .bind(user_id)
        .bind(item_id.saturating_sub(DELETE_WINDOW_MS))
        .bind(item_id.saturating_add(DELETE_WINDOW_MS))
        .execute(db.pool())
        .await?;
        deleted += result.rows_affected();
    }
    Ok(deleted)
}
