//! Журнал отправленных уведомлений о событиях.

use chrono::{NaiveDateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::storage::{repo, DbConnection, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatNotification {
    pub id: i64,
    pub user_id: Option<i64>,
    pub event_id: Option<i64>,
    pub sent_at: Option<NaiveDateTime>,
    pub chat_type: String,
    pub message: Option<String>,
}

impl Table for ChatNotification {
    const TABLE: &'static str = "chat_notifications";
    const SELECT: &'static str = "id, user_id, event_id, sent_at, chat_type, message";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            event_id: row.get(2)?,
            sent_at: row.get(3)?,
            chat_type: row.get(4)?,
            message: row.get(5)?,
        })
    }
}

/// Фиксирует факт отправки сообщения пользователю о событии.
pub fn create(
    conn: &DbConnection,
    user_id: i64,
    event_id: i64,
    chat_type: &str,
    message: &str,
) -> AppResult<ChatNotification> {
    let sent_at = Utc::now().naive_utc();
    let id = repo::insert(
        conn,
        ChatNotification::TABLE,
        &["user_id", "event_id", "sent_at", "chat_type", "message"],
        &[&user_id, &event_id, &sent_at, &chat_type, &message],
    )?;
    repo::reload(conn, id)
}
