//! Опросы: вопрос, варианты, ответы.
//!
//! Вариант уникален в пределах опроса (ограничение в схеме); ответ связывает
//! пользователя с одним вариантом одного опроса.

use chrono::{NaiveDateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::storage::{repo, DbConnection, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poll {
    pub id: i64,
    pub question: String,
    pub created_by: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

impl Table for Poll {
    const TABLE: &'static str = "polls";
    const SELECT: &'static str = "id, question, created_by, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            question: row.get(1)?,
            created_by: row.get(2)?,
            created_at: row.get(3)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollOption {
    pub id: i64,
    pub poll_id: Option<i64>,
    pub option_text: String,
}

impl Table for PollOption {
    const TABLE: &'static str = "poll_options";
    const SELECT: &'static str = "id, poll_id, option_text";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self { id: row.get(0)?, poll_id: row.get(1)?, option_text: row.get(2)? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollResponse {
    pub id: i64,
    pub poll_id: Option<i64>,
    pub user_id: Option<i64>,
    pub option_id: Option<i64>,
    pub responded_at: Option<NaiveDateTime>,
}

impl Table for PollResponse {
    const TABLE: &'static str = "poll_responses";
    const SELECT: &'static str = "id, poll_id, user_id, option_id, responded_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            poll_id: row.get(1)?,
            user_id: row.get(2)?,
            option_id: row.get(3)?,
            responded_at: row.get(4)?,
        })
    }
}

pub fn create_poll(conn: &DbConnection, question: &str, created_by: Option<i64>) -> AppResult<Poll> {
    let created_at = Utc::now().naive_utc();
    let id = repo::insert(
        conn,
        Poll::TABLE,
        &["question", "created_by", "created_at"],
        &[&question, &created_by, &created_at],
    )?;
    repo::reload(conn, id)
}

pub fn add_option(conn: &DbConnection, poll_id: i64, option_text: &str) -> AppResult<PollOption> {
    let id = repo::insert(
        conn,
        PollOption::TABLE,
        &["poll_id", "option_text"],
        &[&poll_id, &option_text],
    )?;
    repo::reload(conn, id)
}

pub fn record_response(
    conn: &DbConnection,
    poll_id: i64,
    user_id: i64,
    option_id: i64,
) -> AppResult<PollResponse> {
    let responded_at = Utc::now().naive_utc();
    let id = repo::insert(
        conn,
        PollResponse::TABLE,
        &["poll_id", "user_id", "option_id", "responded_at"],
        &[&poll_id, &user_id, &option_id, &responded_at],
    )?;
    repo::reload(conn, id)
}
