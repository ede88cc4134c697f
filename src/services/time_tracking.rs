//! Трекер времени: открытые и закрытые интервалы работы.

use chrono::{NaiveDateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::storage::{repo, DbConnection, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    pub id: i64,
    pub user_id: Option<i64>,
    pub description: Option<String>,
    pub started_at: Option<NaiveDateTime>,
    pub ended_at: Option<NaiveDateTime>,
    pub duration_secs: Option<i64>,
}

impl Table for TimeEntry {
    const TABLE: &'static str = "time_tracking";
    const SELECT: &'static str =
        "id, user_id, description, started_at, ended_at, duration_secs";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            description: row.get(2)?,
            started_at: row.get(3)?,
            ended_at: row.get(4)?,
            duration_secs: row.get(5)?,
        })
    }
}

/// Открывает интервал: время старта штампуется текущим моментом.
pub fn start(
    conn: &DbConnection,
    user_id: i64,
    description: Option<&str>,
) -> AppResult<TimeEntry> {
    let started_at = Utc::now().naive_utc();
    let id = repo::insert(
        conn,
        TimeEntry::TABLE,
        &["user_id", "description", "started_at"],
        &[&user_id, &description, &started_at],
    )?;
    repo::reload(conn, id)
}

/// Закрывает интервал: штампует время окончания и длительность.
/// Повторный вызов перезаписывает оба поля. Возвращает None для
/// несуществующей записи.
pub fn stop(conn: &DbConnection, entry_id: i64) -> AppResult<Option<TimeEntry>> {
    let Some(entry) = repo::get::<TimeEntry>(conn, entry_id)? else {
        return Ok(None);
    };
    let ended_at = Utc::now().naive_utc();
    let duration_secs = entry
        .started_at
        .map(|started| (ended_at - started).num_seconds());
    repo::update(
        conn,
        entry_id,
        &[("ended_at", &ended_at), ("duration_secs", &duration_secs)],
    )
}
