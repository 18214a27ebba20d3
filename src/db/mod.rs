// Database module for the admins table

pub mod seed;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;

use crate::error::{DbResultExt, SeedError};
use crate::models::AdminAccount;

pub const ADMINS_TABLE: &str = "admins";

// Columns an existing admins table must carry to be reused
const REQUIRED_COLUMNS: [&str; 9] = [
    "username",
    "password",
    "last_login_ip",
    "last_login_time",
    "is_locked",
    "create_time",
    "update_time",
    "delete_time",
    "is_deleted",
];

const ADMIN_COLUMNS: &str = "username, password, last_login_ip, last_login_time, is_locked, \
     create_time, update_time, delete_time, is_deleted";

// Normalize a bare path or ":memory:" into a sqlite URL
pub fn database_url(database: &str) -> String {
    if database.starts_with("sqlite:") {
        database.to_string()
    } else if database == ":memory:" {
        "sqlite::memory:".to_string()
    } else {
        format!("sqlite:{}", database)
    }
}

// Open the database, creating the file if it doesn't exist
pub async fn connect(database: &str) -> Result<SqlitePool, SeedError> {
    let url = database_url(database);

    let options = SqliteConnectOptions::from_str(&url)
        .map_err(|e| SeedError::Connection(format!("Invalid database URL '{}': {}", url, e)))?
        .create_if_missing(true)
        .foreign_keys(true);

    // One connection: the seeder is a single sequential step, and an
    // in-memory database only lives as long as its connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect_with(options)
        .await
        .map_err(|e| SeedError::Connection(format!("Failed to open '{}': {}", url, e)))?;

    tracing::debug!(%url, "connected to database");

    Ok(pool)
}

pub async fn table_exists(pool: &SqlitePool, table: &str) -> Result<bool, SeedError> {
    let count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?"
    )
    .bind(table)
    .fetch_one(pool)
    .await
    .db_err()?;

    Ok(count > 0)
}

pub async fn table_columns(pool: &SqlitePool, table: &str) -> Result<Vec<String>, SeedError> {
    let columns: Vec<String> = sqlx::query_scalar("SELECT name FROM pragma_table_info(?)")
        .bind(table)
        .fetch_all(pool)
        .await
        .db_err()?;

    Ok(columns)
}

// Create the admins table if needed, or verify an existing one is usable
pub async fn ensure_admins_table(pool: &SqlitePool) -> Result<(), SeedError> {
    if table_exists(pool, ADMINS_TABLE).await? {
        let columns = table_columns(pool, ADMINS_TABLE).await?;
        let missing: Vec<&str> = REQUIRED_COLUMNS
            .iter()
            .copied()
            .filter(|required| !columns.iter().any(|c| c.eq_ignore_ascii_case(required)))
            .collect();

        if !missing.is_empty() {
            return Err(SeedError::Schema(format!(
                "Table '{}' exists but is missing columns: {}",
                ADMINS_TABLE,
                missing.join(", ")
            )));
        }

        tracing::debug!(table = ADMINS_TABLE, "existing table has the expected columns");
    }

    // Duplicate usernames make the unique index fail, reported as Schema
    let migration_sql = include_str!("../../migrations/001_create_admins.sql");
    sqlx::query(migration_sql)
        .execute(pool)
        .await
        .migration_err()?;

    Ok(())
}

// Find admin by username, deleted or not
pub async fn get_admin_by_username(
    pool: &SqlitePool,
    username: &str,
) -> Result<Option<AdminAccount>, SeedError> {
    let query = format!("SELECT {} FROM admins WHERE username = ?", ADMIN_COLUMNS);
    let account = sqlx::query_as::<_, AdminAccount>(&query)
        .bind(username)
        .fetch_optional(pool)
        .await
        .db_err()?;

    Ok(account)
}

// Insert unless the username is taken. Returns true when a row was written.
pub async fn insert_admin_if_absent(
    pool: &SqlitePool,
    account: &AdminAccount,
) -> Result<bool, SeedError> {
    let query = format!(
        "INSERT INTO admins ({}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?) ON CONFLICT(username) DO NOTHING",
        ADMIN_COLUMNS
    );
    let result = sqlx::query(&query)
        .bind(&account.username)
        .bind(&account.password)
        .bind(&account.last_login_ip)
        .bind(account.last_login_time)
        .bind(account.is_locked)
        .bind(account.create_time)
        .bind(account.update_time)
        .bind(account.delete_time)
        .bind(account.is_deleted)
        .execute(pool)
        .await
        .db_err()?;

    Ok(result.rows_affected() > 0)
}

pub async fn count_admins(pool: &SqlitePool, username: &str) -> Result<i64, SeedError> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM admins WHERE username = ?")
        .bind(username)
        .fetch_one(pool)
        .await
        .db_err()?;

    Ok(count)
}
