pub mod operations;

use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use thiserror::Error;

const SCHEMA_SQL: &str = include_str!("../../sql/schema.sql");

#[derive(Debug, Error)]
pub enum DbInitError {
    #[error("failed to create database directory: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

/// Durable store for users, profiles, and study history. Wraps a SQLite pool
/// in WAL mode; the schema is applied idempotently on connect.
#[derive(Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    pub async fn connect(db_path: &Path) -> Result<Self, DbInitError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let db_url = format!("sqlite:{}?mode=rwc", db_path.display());
        let options = SqliteConnectOptions::from_str(&db_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(30));

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;

        let db = Self { pool };
        db.apply_schema().await?;
        Ok(db)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn apply_schema(&self) -> Result<(), sqlx::Error> {
        for statement in split_sql_statements(SCHEMA_SQL) {
            sqlx::query(&statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn ping(&self) -> Result<(), sqlx::Error> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

/// Splits the embedded schema into individual statements. Comment lines are
/// stripped before splitting so a `;` inside a comment cannot shear a
/// statement apart. The schema contains no semicolons inside literals.
fn split_sql_statements(sql: &str) -> Vec<String> {
    let without_comments = sql
        .lines()
        .filter(|line| !line.trim_start().starts_with("--"))
        .collect::<Vec<_>>()
        .join("\n");

    without_comments
        .split(';')
        .map(|stmt| stmt.trim().to_string())
        .filter(|stmt| !stmt.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splitter_drops_comments_and_empty_chunks() {
        let statements = split_sql_statements("-- header\nCREATE TABLE a (x);\n\n-- tail\n");
        assert_eq!(statements, vec!["CREATE TABLE a (x)".to_string()]);
    }

    #[test]
    fn splitter_ignores_semicolons_inside_comments() {
        let statements =
            split_sql_statements("-- applied at startup; must be idempotent\nCREATE TABLE a (x);");
        assert_eq!(statements, vec!["CREATE TABLE a (x)".to_string()]);
    }

    #[test]
    fn schema_parses_into_statements() {
        let statements = split_sql_statements(SCHEMA_SQL);
        assert!(statements.len() >= 5);
        assert!(statements[0].starts_with("CREATE TABLE IF NOT EXISTS users"));
    }
}
