//! Роли, права и индивидуальные выдачи прав.
//!
//! Пара роль/право уникальна (составной первичный ключ в role_permissions);
//! у пользователя не более одной роли, индивидуальные права живут отдельно
//! от ролей в access_rights.

use chrono::{NaiveDateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::storage::{repo, DbConnection, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Role {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
}

impl Table for Role {
    const TABLE: &'static str = "roles";
    const SELECT: &'static str = "id, name, description";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self { id: row.get(0)?, name: row.get(1)?, description: row.get(2)? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Permission {
    pub id: i64,
    pub code: String,
    pub description: Option<String>,
}

impl Table for Permission {
    const TABLE: &'static str = "permissions";
    const SELECT: &'static str = "id, code, description";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self { id: row.get(0)?, code: row.get(1)?, description: row.get(2)? })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessRight {
    pub id: i64,
    pub user_id: Option<i64>,
    pub permission_id: Option<i64>,
    pub granted_at: Option<NaiveDateTime>,
}

impl Table for AccessRight {
    const TABLE: &'static str = "access_rights";
    const SELECT: &'static str = "id, user_id, permission_id, granted_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            permission_id: row.get(2)?,
            granted_at: row.get(3)?,
        })
    }
}

pub fn create_role(conn: &DbConnection, name: &str, description: Option<&str>) -> AppResult<Role> {
    let id = repo::insert(conn, Role::TABLE, &["name", "description"], &[&name, &description])?;
    repo::reload(conn, id)
}

pub fn create_permission(
    conn: &DbConnection,
    code: &str,
    description: Option<&str>,
) -> AppResult<Permission> {
    let id =
        repo::insert(conn, Permission::TABLE, &["code", "description"], &[&code, &description])?;
    repo::reload(conn, id)
}

/// Привязывает право к роли. Повторная привязка той же пары — ошибка
/// хранилища (уникальность обеспечивает составной ключ).
pub fn grant_role_permission(
    conn: &DbConnection,
    role_id: i64,
    permission_id: i64,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO role_permissions (role_id, permission_id) VALUES (?1, ?2)",
        [role_id, permission_id],
    )?;
    Ok(())
}

/// Выдаёт пользователю индивидуальное право, независимое от роли.
pub fn grant_access_right(
    conn: &DbConnection,
    user_id: i64,
    permission_id: i64,
) -> AppResult<AccessRight> {
    let granted_at = Utc::now().naive_utc();
    let id = repo::insert(
        conn,
        AccessRight::TABLE,
        &["user_id", "permission_id", "granted_at"],
        &[&user_id, &permission_id, &granted_at],
    )?;
    repo::reload(conn, id)
}
