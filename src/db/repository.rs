//! Database repository for update CRUD and feed queries.
//!
//! Every statement touches a single row or is read-only, so no transactions are needed.

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{sqlite::SqliteRow, Row, SqlitePool};

use crate::errors::AppError;
use crate::models::{Update, UpdateFields};

const UPDATE_COLUMNS: &str = "id, user, title, content, timestamp";

/// Newest first. `rowid` breaks ties between equal timestamps.
const RECENCY_ORDER: &str = "ORDER BY timestamp DESC, rowid DESC";

/// Matches against the lowercased copies of the text fields. SQLite `LIKE`
/// only folds ASCII, so case folding happens in Rust on both sides.
const KEYWORD_FILTER: &str = concat!(
    r"(user_folded LIKE ? ESCAPE '\'",
    r" OR title_folded LIKE ? ESCAPE '\'",
    r" OR content_folded LIKE ? ESCAPE '\')",
);

/// Database repository for all update operations.
#[derive(Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new update with the given id and creation time.
    pub async fn insert_update(
        &self,
        id: &str,
        fields: &UpdateFields,
        timestamp: DateTime<Utc>,
    ) -> Result<Update, AppError> {
        sqlx::query(
            "INSERT INTO updates (id, user, title, content, timestamp, user_folded, title_folded, content_folded) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(&fields.user)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(format_timestamp(timestamp))
        .bind(fold_case(&fields.user))
        .bind(fold_case(&fields.title))
        .bind(fold_case(&fields.content))
        .execute(&self.pool)
        .await?;

        Ok(Update {
            id: id.to_string(),
            user: fields.user.clone(),
            title: fields.title.clone(),
            content: fields.content.clone(),
            timestamp,
        })
    }

    /// Get an update by ID.
    pub async fn get_update(&self, id: &str) -> Result<Option<Update>, AppError> {
        let row = sqlx::query(&format!("SELECT {UPDATE_COLUMNS} FROM updates WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.as_ref().map(update_from_row).transpose()
    }

    /// List one slice of all updates, newest first.
    pub async fn list_updates(&self, skip: u64, limit: u32) -> Result<Vec<Update>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {UPDATE_COLUMNS} FROM updates {RECENCY_ORDER} LIMIT ? OFFSET ?"
        ))
        .bind(i64::from(limit))
        .bind(to_offset(skip))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(update_from_row).collect()
    }

    /// Count all updates.
    pub async fn count_updates(&self) -> Result<u64, AppError> {
        let row = sqlx::query("SELECT COUNT(*) AS count FROM updates")
            .fetch_one(&self.pool)
            .await?;
        Ok(to_count(row.try_get("count")?))
    }

    /// List one slice of the updates whose user, title or content contains
    /// `keyword`, ignoring case, newest first.
    pub async fn search_updates(
        &self,
        keyword: &str,
        skip: u64,
        limit: u32,
    ) -> Result<Vec<Update>, AppError> {
        let pattern = like_pattern(keyword);
        let rows = sqlx::query(&format!(
            "SELECT {UPDATE_COLUMNS} FROM updates WHERE {KEYWORD_FILTER} {RECENCY_ORDER} LIMIT ? OFFSET ?"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .bind(i64::from(limit))
        .bind(to_offset(skip))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(update_from_row).collect()
    }

    /// Count the updates matching `keyword`.
    pub async fn count_search(&self, keyword: &str) -> Result<u64, AppError> {
        let pattern = like_pattern(keyword);
        let row = sqlx::query(&format!(
            "SELECT COUNT(*) AS count FROM updates WHERE {KEYWORD_FILTER}"
        ))
        .bind(&pattern)
        .bind(&pattern)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;
        Ok(to_count(row.try_get("count")?))
    }

    /// List every update created at or after `cutoff`, newest first.
    pub async fn list_updates_since(&self, cutoff: DateTime<Utc>) -> Result<Vec<Update>, AppError> {
        let rows = sqlx::query(&format!(
            "SELECT {UPDATE_COLUMNS} FROM updates WHERE timestamp >= ? {RECENCY_ORDER}"
        ))
        .bind(format_timestamp(cutoff))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(update_from_row).collect()
    }

    /// Replace the text fields of an update. Last write wins; the timestamp is untouched.
    pub async fn replace_update(
        &self,
        id: &str,
        fields: &UpdateFields,
    ) -> Result<Option<Update>, AppError> {
        let row = sqlx::query(&format!(
            "UPDATE updates SET user = ?, title = ?, content = ?, \
             user_folded = ?, title_folded = ?, content_folded = ? \
             WHERE id = ? RETURNING {UPDATE_COLUMNS}"
        ))
        .bind(&fields.user)
        .bind(&fields.title)
        .bind(&fields.content)
        .bind(fold_case(&fields.user))
        .bind(fold_case(&fields.title))
        .bind(fold_case(&fields.content))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.as_ref().map(update_from_row).transpose()
    }

    /// Delete an update. Returns whether a row was removed.
    pub async fn delete_update(&self, id: &str) -> Result<bool, AppError> {
        let result = sqlx::query("DELETE FROM updates WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// Helper functions for row conversion

fn update_from_row(row: &SqliteRow) -> Result<Update, AppError> {
    let timestamp: String = row.try_get("timestamp")?;
    Ok(Update {
        id: row.try_get("id")?,
        user: row.try_get("user")?,
        title: row.try_get("title")?,
        content: row.try_get("content")?,
        timestamp: parse_timestamp(&timestamp)?,
    })
}

/// Fixed-width RFC 3339 so that text order matches time order.
fn format_timestamp(timestamp: DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(value)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::Database(format!("Corrupt timestamp {:?}: {}", value, e)))
}

/// Unicode lowercase, applied to stored text and keywords alike.
fn fold_case(value: &str) -> String {
    value.to_lowercase()
}

/// Build a LIKE pattern that matches `keyword` literally anywhere in a
/// folded field.
fn like_pattern(keyword: &str) -> String {
    let keyword = fold_case(keyword);
    let mut pattern = String::with_capacity(keyword.len() + 2);
    pattern.push('%');
    for c in keyword.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

fn to_offset(skip: u64) -> i64 {
    i64::try_from(skip).unwrap_or(i64::MAX)
}

fn to_count(count: i64) -> u64 {
    u64::try_from(count).unwrap_or_default()
}
