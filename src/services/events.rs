//! События, их типы и участники.
//!
//! Тип события несёт политику напоминаний по умолчанию; участник может
//! переопределить её поштучно. Непереданный флаг (None) означает значение
//! по умолчанию true/false/false, явные false/true сохраняются как есть.

use chrono::{NaiveDateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::storage::{repo, DbConnection, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventType {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub default_reminder_15min: bool,
    pub default_reminder_1h: bool,
    pub default_reminder_1d: bool,
}

impl Table for EventType {
    const TABLE: &'static str = "event_types";
    const SELECT: &'static str =
        "id, name, description, default_reminder_15min, default_reminder_1h, default_reminder_1d";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            name: row.get(1)?,
            description: row.get(2)?,
            default_reminder_15min: row.get(3)?,
            default_reminder_1h: row.get(4)?,
            default_reminder_1d: row.get(5)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub event_type_id: Option<i64>,
    pub start_time: Option<NaiveDateTime>,
    pub end_time: Option<NaiveDateTime>,
    pub location: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

impl Table for Event {
    const TABLE: &'static str = "events";
    const SELECT: &'static str =
        "id, title, description, event_type_id, start_time, end_time, location, created_by, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            event_type_id: row.get(3)?,
            start_time: row.get(4)?,
            end_time: row.get(5)?,
            location: row.get(6)?,
            created_by: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventParticipant {
    pub id: i64,
    pub event_id: Option<i64>,
    pub user_id: Option<i64>,
    pub reminder_15min: bool,
    pub reminder_1h: bool,
    pub reminder_1d: bool,
}

impl Table for EventParticipant {
    const TABLE: &'static str = "event_participants";
    const SELECT: &'static str =
        "id, event_id, user_id, reminder_15min, reminder_1h, reminder_1d";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            event_id: row.get(1)?,
            user_id: row.get(2)?,
            reminder_15min: row.get(3)?,
            reminder_1h: row.get(4)?,
            reminder_1d: row.get(5)?,
        })
    }
}

pub fn create_event_type(
    conn: &DbConnection,
    name: &str,
    description: Option<&str>,
    default_reminder_15min: bool,
    default_reminder_1h: bool,
    default_reminder_1d: bool,
) -> AppResult<EventType> {
    let id = repo::insert(
        conn,
        EventType::TABLE,
        &["name", "description", "default_reminder_15min", "default_reminder_1h", "default_reminder_1d"],
        &[&name, &description, &default_reminder_15min, &default_reminder_1h, &default_reminder_1d],
    )?;
    repo::reload(conn, id)
}

pub fn create_event(
    conn: &DbConnection,
    title: &str,
    event_type_id: i64,
    start_time: NaiveDateTime,
    end_time: NaiveDateTime,
    description: Option<&str>,
    location: Option<&str>,
    created_by: Option<i64>,
) -> AppResult<Event> {
    let created_at = Utc::now().naive_utc();
    let id = repo::insert(
        conn,
        Event::TABLE,
        &["title", "event_type_id", "start_time", "end_time", "description", "location", "created_by", "created_at"],
        &[&title, &event_type_id, &start_time, &end_time, &description, &location, &created_by, &created_at],
    )?;
    repo::reload(conn, id)
}

/// Добавляет участника. Флаги напоминаний трёхзначные: None — значение
/// по умолчанию (15 минут — да, час и день — нет), Some — как передано.
pub fn add_participant(
    conn: &DbConnection,
    event_id: i64,
    user_id: i64,
    reminder_15min: Option<bool>,
    reminder_1h: Option<bool>,
    reminder_1d: Option<bool>,
) -> AppResult<EventParticipant> {
    let r15 = reminder_15min.unwrap_or(true);
    let r1h = reminder_1h.unwrap_or(false);
    let r1d = reminder_1d.unwrap_or(false);
    let id = repo::insert(
        conn,
        EventParticipant::TABLE,
        &["event_id", "user_id", "reminder_15min", "reminder_1h", "reminder_1d"],
        &[&event_id, &user_id, &r15, &r1h, &r1d],
    )?;
    repo::reload(conn, id)
}
