//! Задачи.

use chrono::{NaiveDateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::storage::{repo, DbConnection, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub deadline: Option<NaiveDateTime>,
    pub created_by: Option<i64>,
    pub assigned_to: Option<i64>,
    pub is_completed: bool,
    pub completed_at: Option<NaiveDateTime>,
    pub created_at: Option<NaiveDateTime>,
}

impl Table for Task {
    const TABLE: &'static str = "tasks";
    const SELECT: &'static str =
        "id, title, description, deadline, created_by, assigned_to, is_completed, completed_at, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            deadline: row.get(3)?,
            created_by: row.get(4)?,
            assigned_to: row.get(5)?,
            is_completed: row.get(6)?,
            completed_at: row.get(7)?,
            created_at: row.get(8)?,
        })
    }
}

/// Создаёт задачу и возвращает сохранённую запись.
pub fn create(
    conn: &DbConnection,
    title: &str,
    description: Option<&str>,
    deadline: Option<NaiveDateTime>,
    created_by: Option<i64>,
    assigned_to: Option<i64>,
) -> AppResult<Task> {
    let created_at = Utc::now().naive_utc();
    let id = repo::insert(
        conn,
        Task::TABLE,
        &["title", "description", "deadline", "created_by", "assigned_to", "created_at"],
        &[&title, &description, &deadline, &created_by, &assigned_to, &created_at],
    )?;
    repo::reload(conn, id)
}

/// Задачи, назначенные на пользователя, в порядке создания.
pub fn list_assigned(conn: &DbConnection, user_id: i64) -> AppResult<Vec<Task>> {
    let sql = format!(
        "SELECT {} FROM {} WHERE assigned_to = ?1 ORDER BY id",
        Task::SELECT,
        Task::TABLE
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([user_id], |row| Task::from_row(row))?;
    let mut tasks = Vec::new();
    for row in rows {
        tasks.push(row?);
    }
    Ok(tasks)
}
