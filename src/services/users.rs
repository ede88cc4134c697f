//! Пользователи: создание, поиск по Telegram ID, подбор по нику.

use chrono::{NaiveDateTime, Utc};
use rusqlite::{OptionalExtension, Row};
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::storage::{repo, DbConnection, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub telegram_id: i64,
    pub username: Option<String>,
    pub full_name: Option<String>,
    pub role_id: Option<i64>,
    pub is_active: bool,
    pub created_at: Option<NaiveDateTime>,
}

impl Table for User {
    const TABLE: &'static str = "users";
    const SELECT: &'static str =
        "id, telegram_id, username, full_name, role_id, is_active, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            telegram_id: row.get(1)?,
            username: row.get(2)?,
            full_name: row.get(3)?,
            role_id: row.get(4)?,
            is_active: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

/// Создаёт нового пользователя и возвращает сохранённую запись.
pub fn create(
    conn: &DbConnection,
    telegram_id: i64,
    username: Option<&str>,
    full_name: Option<&str>,
    role_id: Option<i64>,
    is_active: bool,
) -> AppResult<User> {
    let created_at = Utc::now().naive_utc();
    let id = repo::insert(
        conn,
        User::TABLE,
        &["telegram_id", "username", "full_name", "role_id", "is_active", "created_at"],
        &[&telegram_id, &username, &full_name, &role_id, &is_active, &created_at],
    )?;
    repo::reload(conn, id)
}

/// Ищет пользователя по его Telegram ID (уникален).
pub fn find_by_telegram_id(conn: &DbConnection, telegram_id: i64) -> AppResult<Option<User>> {
    let sql = format!("SELECT {} FROM {} WHERE telegram_id = ?1", User::SELECT, User::TABLE);
    let user = conn
        .query_row(&sql, [telegram_id], |row| User::from_row(row))
        .optional()?;
    Ok(user)
}

/// Case-insensitive substring match over usernames, capped at `limit`,
/// in the order the rows were supplied (stable).
pub fn search_by_username<'a>(users: &'a [User], query: &str, limit: usize) -> Vec<&'a User> {
    let needle = query.to_lowercase();
    users
        .iter()
        .filter(|u| {
            u.username
                .as_deref()
                .is_some_and(|name| name.to_lowercase().contains(&needle))
        })
        .take(limit)
        .collect()
}
