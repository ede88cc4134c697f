//! Generic row-level CRUD
//!
//! Every entity implements [`Table`] (table name, select list, row mapping)
//! and gets `get`/`list`/`update`/`delete` for free. Inserts go through
//! [`insert`], which returns the generated rowid so the service can reload
//! and return the fully populated record.
//!
//! Each statement commits immediately (SQLite autocommit). Store failures
//! are not handled here and propagate to the caller as `AppError::Database`.

use rusqlite::types::ToSql;
use rusqlite::{OptionalExtension, Row};

use crate::core::AppResult;
use crate::storage::DbConnection;

/// One relational table row type.
pub trait Table: Sized {
    /// Table name in the schema.
    const TABLE: &'static str;
    /// Comma-separated select column list, `id` first, matching `from_row`.
    const SELECT: &'static str;

    /// Map one row (in `SELECT` column order) into the entity.
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self>;
}

/// Insert a row and return the generated id.
///
/// `columns` and `values` must be the same length; table and column names
/// come from compile-time constants, only values are bound.
pub fn insert(
    conn: &DbConnection,
    table: &str,
    columns: &[&str],
    values: &[&dyn ToSql],
) -> AppResult<i64> {
    debug_assert_eq!(columns.len(), values.len());
    let placeholders: Vec<String> = (1..=values.len()).map(|i| format!("?{}", i)).collect();
    let sql = format!(
        "INSERT INTO {} ({}) VALUES ({})",
        table,
        columns.join(", "),
        placeholders.join(", ")
    );
    conn.execute(&sql, rusqlite::params_from_iter(values.iter().copied()))?;
    Ok(conn.last_insert_rowid())
}

/// Single-row lookup by id. Returns `Ok(None)` when no row matches.
pub fn get<T: Table>(conn: &DbConnection, id: i64) -> AppResult<Option<T>> {
    let sql = format!("SELECT {} FROM {} WHERE id = ?1", T::SELECT, T::TABLE);
    let row = conn.query_row(&sql, [id], |row| T::from_row(row)).optional()?;
    Ok(row)
}

/// Load a row that is known to exist (just inserted or just updated).
///
/// A missing row here means the store lost a committed write, which is
/// surfaced as a database error rather than an absent marker.
pub fn reload<T: Table>(conn: &DbConnection, id: i64) -> AppResult<T> {
    get::<T>(conn, id)?.ok_or(crate::core::AppError::Database(
        rusqlite::Error::QueryReturnedNoRows,
    ))
}

/// Unbounded read of all rows of the type, in store-default order.
pub fn list<T: Table>(conn: &DbConnection) -> AppResult<Vec<T>> {
    let sql = format!("SELECT {} FROM {}", T::SELECT, T::TABLE);
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map([], |row| T::from_row(row))?;
    let mut entities = Vec::new();
    for row in rows {
        entities.push(row?);
    }
    Ok(entities)
}

/// Apply the supplied field assignments to an existing row.
///
/// Returns the reloaded row, or `Ok(None)` when the row does not exist.
/// Field names are not validated against the entity.
pub fn update<T: Table>(
    conn: &DbConnection,
    id: i64,
    fields: &[(&str, &dyn ToSql)],
) -> AppResult<Option<T>> {
    if get::<T>(conn, id)?.is_none() {
        return Ok(None);
    }
    if !fields.is_empty() {
        let assignments: Vec<String> = fields
            .iter()
            .enumerate()
            .map(|(i, (column, _))| format!("{} = ?{}", column, i + 1))
            .collect();
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{}",
            T::TABLE,
            assignments.join(", "),
            fields.len() + 1
        );
        let mut params: Vec<&dyn ToSql> = fields.iter().map(|(_, value)| *value).collect();
        params.push(&id);
        conn.execute(&sql, rusqlite::params_from_iter(params))?;
    }
    get::<T>(conn, id)
}

/// Remove a row. Returns `Ok(false)` when the row was absent.
pub fn delete<T: Table>(conn: &DbConnection, id: i64) -> AppResult<bool> {
    let sql = format!("DELETE FROM {} WHERE id = ?1", T::TABLE);
    let affected = conn.execute(&sql, [id])?;
    Ok(affected > 0)
}
