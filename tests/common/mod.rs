//! Common test utilities
//!
//! Shared across integration tests: a scratch SQLite database behind the
//! same pool the production code uses (schema applied by `create_pool`).

use std::sync::Arc;

use kontora::storage::DbPool;

/// A pooled scratch database living in a temp dir (removed on drop).
pub struct ScratchDb {
    pub pool: Arc<DbPool>,
    _dir: tempfile::TempDir,
}

#[allow(dead_code)]
pub fn scratch_db() -> ScratchDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let path = dir.path().join("test.sqlite");
    let pool = kontora::storage::create_pool(path.to_str().expect("utf-8 temp path"))
        .expect("Failed to create test pool");
    ScratchDb { pool: Arc::new(pool), _dir: dir }
}
