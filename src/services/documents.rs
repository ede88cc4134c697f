//! Документы и цепочка их согласования.
//!
//! Согласования упорядочены по order_index и создаются несогласованными.

use chrono::{NaiveDateTime, Utc};
use rusqlite::Row;
use serde::{Deserialize, Serialize};

use crate::core::AppResult;
use crate::storage::{repo, DbConnection, Table};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub status: String,
    pub file_url: Option<String>,
    pub created_by: Option<i64>,
    pub created_at: Option<NaiveDateTime>,
}

impl Table for Document {
    const TABLE: &'static str = "documents";
    const SELECT: &'static str =
        "id, title, description, status, file_url, created_by, created_at";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            status: row.get(3)?,
            file_url: row.get(4)?,
            created_by: row.get(5)?,
            created_at: row.get(6)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentApproval {
    pub id: i64,
    pub document_id: Option<i64>,
    pub approver_id: Option<i64>,
    pub approved: bool,
    pub approved_at: Option<NaiveDateTime>,
    pub order_index: Option<i64>,
}

impl Table for DocumentApproval {
    const TABLE: &'static str = "document_approvals";
    const SELECT: &'static str =
        "id, document_id, approver_id, approved, approved_at, order_index";

    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            document_id: row.get(1)?,
            approver_id: row.get(2)?,
            approved: row.get(3)?,
            approved_at: row.get(4)?,
            order_index: row.get(5)?,
        })
    }
}

/// Создаёт документ в статусе "draft".
pub fn create_document(
    conn: &DbConnection,
    title: &str,
    description: Option<&str>,
    file_url: Option<&str>,
    created_by: Option<i64>,
) -> AppResult<Document> {
    let created_at = Utc::now().naive_utc();
    let id = repo::insert(
        conn,
        Document::TABLE,
        &["title", "description", "status", "file_url", "created_by", "created_at"],
        &[&title, &description, &"draft", &file_url, &created_by, &created_at],
    )?;
    repo::reload(conn, id)
}

/// Назначает согласующего на документ (шаг цепочки, несогласован).
pub fn create_approval(
    conn: &DbConnection,
    document_id: i64,
    approver_id: i64,
    order_index: i64,
) -> AppResult<DocumentApproval> {
    let id = repo::insert(
        conn,
        DocumentApproval::TABLE,
        &["document_id", "approver_id", "order_index", "approved"],
        &[&document_id, &approver_id, &order_index, &false],
    )?;
    repo::reload(conn, id)
}

/// Выставляет флаг согласования и штампует время решения.
/// С `approved = false` снимает согласование (время также обновляется).
pub fn approve(
    conn: &DbConnection,
    approval_id: i64,
    approved: bool,
) -> AppResult<Option<DocumentApproval>> {
    let approved_at = Utc::now().naive_utc();
    repo::update(
        conn,
        approval_id,
        &[("approved", &approved), ("approved_at", &approved_at)],
    )
}
