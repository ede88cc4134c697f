//! Schema bootstrap
//!
//! Схема создаётся идемпотентно при создании пула. Ссылочная целостность
//! обеспечивается самим хранилищем (внешние ключи, уникальные ограничения),
//! а не прикладным кодом.

use rusqlite::{Connection, Result};

/// Full relational schema, applied idempotently at startup.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS roles (
    id          INTEGER PRIMARY KEY,
    name        TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS permissions (
    id          INTEGER PRIMARY KEY,
    code        TEXT NOT NULL UNIQUE,
    description TEXT
);

CREATE TABLE IF NOT EXISTS role_permissions (
    role_id       INTEGER NOT NULL REFERENCES roles (id) ON DELETE CASCADE,
    permission_id INTEGER NOT NULL REFERENCES permissions (id) ON DELETE CASCADE,
    PRIMARY KEY (role_id, permission_id)
);

CREATE TABLE IF NOT EXISTS users (
    id          INTEGER PRIMARY KEY,
    telegram_id INTEGER NOT NULL UNIQUE,
    username    TEXT,
    full_name   TEXT,
    role_id     INTEGER REFERENCES roles (id),
    is_active   INTEGER NOT NULL DEFAULT 1,
    created_at  TEXT
);

CREATE TABLE IF NOT EXISTS access_rights (
    id            INTEGER PRIMARY KEY,
    user_id       INTEGER REFERENCES users (id) ON DELETE CASCADE,
    permission_id INTEGER REFERENCES permissions (id) ON DELETE CASCADE,
    granted_at    TEXT
);

CREATE TABLE IF NOT EXISTS event_types (
    id                     INTEGER PRIMARY KEY,
    name                   TEXT NOT NULL UNIQUE,
    description            TEXT,
    default_reminder_15min INTEGER NOT NULL DEFAULT 1,
    default_reminder_1h    INTEGER NOT NULL DEFAULT 0,
    default_reminder_1d    INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS events (
    id            INTEGER PRIMARY KEY,
    title         TEXT NOT NULL,
    description   TEXT,
    event_type_id INTEGER REFERENCES event_types (id),
    start_time    TEXT,
    end_time      TEXT,
    location      TEXT,
    created_by    INTEGER REFERENCES users (id),
    created_at    TEXT
);

CREATE TABLE IF NOT EXISTS event_participants (
    id             INTEGER PRIMARY KEY,
    event_id       INTEGER REFERENCES events (id),
    user_id        INTEGER REFERENCES users (id),
    reminder_15min INTEGER NOT NULL DEFAULT 1,
    reminder_1h    INTEGER NOT NULL DEFAULT 0,
    reminder_1d    INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS tasks (
    id           INTEGER PRIMARY KEY,
    title        TEXT NOT NULL,
    description  TEXT,
    deadline     TEXT,
    created_by   INTEGER REFERENCES users (id),
    assigned_to  INTEGER REFERENCES users (id),
    is_completed INTEGER NOT NULL DEFAULT 0,
    completed_at TEXT,
    created_at   TEXT
);

CREATE TABLE IF NOT EXISTS time_tracking (
    id            INTEGER PRIMARY KEY,
    user_id       INTEGER REFERENCES users (id),
    description   TEXT,
    started_at    TEXT,
    ended_at      TEXT,
    duration_secs INTEGER
);

CREATE TABLE IF NOT EXISTS documents (
    id          INTEGER PRIMARY KEY,
    title       TEXT NOT NULL,
    description TEXT,
    status      TEXT NOT NULL DEFAULT 'draft',
    file_url    TEXT,
    created_by  INTEGER REFERENCES users (id),
    created_at  TEXT
);

CREATE TABLE IF NOT EXISTS document_approvals (
    id          INTEGER PRIMARY KEY,
    document_id INTEGER REFERENCES documents (id),
    approver_id INTEGER REFERENCES users (id),
    approved    INTEGER NOT NULL DEFAULT 0,
    approved_at TEXT,
    order_index INTEGER
);

CREATE TABLE IF NOT EXISTS chat_notifications (
    id        INTEGER PRIMARY KEY,
    user_id   INTEGER REFERENCES users (id),
    event_id  INTEGER REFERENCES events (id),
    sent_at   TEXT,
    chat_type TEXT NOT NULL,
    message   TEXT
);

CREATE TABLE IF NOT EXISTS polls (
    id         INTEGER PRIMARY KEY,
    question   TEXT NOT NULL,
    created_by INTEGER REFERENCES users (id),
    created_at TEXT
);

CREATE TABLE IF NOT EXISTS poll_options (
    id          INTEGER PRIMARY KEY,
    poll_id     INTEGER REFERENCES polls (id),
    option_text TEXT NOT NULL,
    UNIQUE (poll_id, option_text)
);

CREATE TABLE IF NOT EXISTS poll_responses (
    id           INTEGER PRIMARY KEY,
    poll_id      INTEGER REFERENCES polls (id),
    user_id      INTEGER REFERENCES users (id),
    option_id    INTEGER REFERENCES poll_options (id),
    responded_at TEXT
);
";

/// Apply the schema to a connection. Safe to call repeatedly.
pub fn apply_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_applies_twice_without_error() {
        let conn = Connection::open_in_memory().unwrap();
        apply_schema(&conn).unwrap();
        apply_schema(&conn).unwrap();
    }

    #[test]
    fn store_failure_surfaces_as_error() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch("PRAGMA query_only = ON;").unwrap();
        assert!(apply_schema(&conn).is_err());
    }
}
