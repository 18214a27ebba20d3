// Error handling for the rscms seeder

use std::fmt;

/// Seeder error type
#[derive(Debug)]
pub enum SeedError {
    /// The store could not be opened or reached.
    Connection(String),
    /// The admins table exists with an incompatible structure.
    Schema(String),
    /// A record with the same username already exists.
    Conflict(String),
    Database(String),
}

impl fmt::Display for SeedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedError::Connection(msg) => write!(f, "Connection error: {}", msg),
            SeedError::Schema(msg) => write!(f, "Schema error: {}", msg),
            SeedError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            SeedError::Database(msg) => write!(f, "Database error: {}", msg),
        }
    }
}

impl std::error::Error for SeedError {}

impl SeedError {
    // Conflicts mean the intended end state already holds
    pub fn is_conflict(&self) -> bool {
        matches!(self, SeedError::Conflict(_))
    }
}

// Extension trait for database result handling
pub trait DbResultExt<T> {
    /// Convert sqlx errors to SeedError, mapping unique violations to Conflict
    fn db_err(self) -> Result<T, SeedError>;

    /// Like db_err, but failures that mean the existing schema cannot be
    /// reconciled become SeedError::Schema
    fn migration_err(self) -> Result<T, SeedError>;
}

// SQLITE_ERROR: DDL rejected, e.g. a name already taken by another object
const SQLITE_ERROR: &str = "1";

impl<T> DbResultExt<T> for Result<T, sqlx::Error> {
    fn db_err(self) -> Result<T, SeedError> {
        self.map_err(|e| match &e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                SeedError::Conflict(db.message().to_string())
            }
            sqlx::Error::Io(_) | sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                SeedError::Connection(e.to_string())
            }
            _ => SeedError::Database(e.to_string()),
        })
    }

    fn migration_err(self) -> Result<T, SeedError> {
        match self {
            Err(sqlx::Error::Database(db))
                if db.is_unique_violation() || db.code().as_deref() == Some(SQLITE_ERROR) =>
            {
                Err(SeedError::Schema(db.message().to_string()))
            }
            other => other.db_err(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_prefixes() {
        assert_eq!(
            SeedError::Connection("refused".into()).to_string(),
            "Connection error: refused"
        );
        assert_eq!(
            SeedError::Schema("missing column".into()).to_string(),
            "Schema error: missing column"
        );
        assert_eq!(SeedError::Conflict("dup".into()).to_string(), "Conflict: dup");
    }

    #[test]
    fn test_only_conflict_is_conflict() {
        assert!(SeedError::Conflict("dup".into()).is_conflict());
        assert!(!SeedError::Database("boom".into()).is_conflict());
        assert!(!SeedError::Connection("down".into()).is_conflict());
    }

    #[test]
    fn test_pool_errors_map_to_connection() {
        let result: Result<(), sqlx::Error> = Err(sqlx::Error::PoolTimedOut);
        assert!(matches!(result.db_err(), Err(SeedError::Connection(_))));

        let result: Result<(), sqlx::Error> = Err(sqlx::Error::RowNotFound);
        assert!(matches!(result.db_err(), Err(SeedError::Database(_))));
    }
}
