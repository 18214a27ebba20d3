// Common test utilities shared across test files

use sqlx::SqlitePool;
use std::path::Path;

/// Set up an in-memory SQLite database for testing
#[allow(dead_code)]
pub async fn setup_test_db() -> SqlitePool {
    rscms::db::connect(":memory:")
        .await
        .expect("Failed to create in-memory database")
}

/// Path of a database file inside a temporary directory
#[allow(dead_code)]
pub fn db_path(dir: &Path) -> String {
    dir.join("rscms.db").to_string_lossy().into_owned()
}

/// Count every row in the admins table
#[allow(dead_code)]
pub async fn total_admins(pool: &SqlitePool) -> i64 {
    sqlx::query_scalar("SELECT COUNT(*) FROM admins")
        .fetch_one(pool)
        .await
        .unwrap()
}
