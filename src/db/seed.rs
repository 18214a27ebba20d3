// Bootstrap seeding of the administrative account

use sqlx::SqlitePool;

use crate::db;
use crate::error::SeedError;
use crate::models::{AdminAccount, ADMIN_USERNAME};

/// Result of a seeding run. Both variants mean the admin exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedOutcome {
    Created(AdminAccount),
    AlreadyPresent(AdminAccount),
}

impl SeedOutcome {
    pub fn account(&self) -> &AdminAccount {
        match self {
            SeedOutcome::Created(account) | SeedOutcome::AlreadyPresent(account) => account,
        }
    }

    pub fn was_created(&self) -> bool {
        matches!(self, SeedOutcome::Created(_))
    }

    pub fn message(&self) -> String {
        match self {
            SeedOutcome::Created(account) => {
                format!("Admins initialized successfully: created '{}'", account.username)
            }
            SeedOutcome::AlreadyPresent(account) => {
                format!("Admins already initialized: '{}' exists", account.username)
            }
        }
    }
}

/// Ensure the bootstrap admin exists, stamped with the current time.
///
/// `password_hash` is stored as given.
pub async fn seed_admin(pool: &SqlitePool, password_hash: &str) -> Result<SeedOutcome, SeedError> {
    seed_admin_at(pool, password_hash, chrono::Utc::now().timestamp()).await
}

/// Same as [`seed_admin`] with an explicit unix timestamp in seconds.
pub async fn seed_admin_at(
    pool: &SqlitePool,
    password_hash: &str,
    now: i64,
) -> Result<SeedOutcome, SeedError> {
    db::ensure_admins_table(pool).await?;

    // Check if admin user already exists
    if let Some(existing) = db::get_admin_by_username(pool, ADMIN_USERNAME).await? {
        return Ok(already_present(existing));
    }

    let account = AdminAccount::new_seed(ADMIN_USERNAME, password_hash, now);
    account.check_invariants()?;

    let inserted = db::insert_admin_if_absent(pool, &account).await;
    settle_insert(pool, account, inserted).await
}

// Both a skipped insert and a unique violation mean another seeder won the race
async fn settle_insert(
    pool: &SqlitePool,
    account: AdminAccount,
    inserted: Result<bool, SeedError>,
) -> Result<SeedOutcome, SeedError> {
    match inserted {
        Ok(true) => {
            tracing::info!(username = %account.username, create_time = account.create_time, "created admin account");
            Ok(SeedOutcome::Created(account))
        }
        Ok(false) => reread(pool).await,
        Err(e) if e.is_conflict() => {
            tracing::debug!(error = %e, "insert conflicted, treating as already seeded");
            reread(pool).await
        }
        Err(e) => Err(e),
    }
}

async fn reread(pool: &SqlitePool) -> Result<SeedOutcome, SeedError> {
    let existing = db::get_admin_by_username(pool, ADMIN_USERNAME)
        .await?
        .ok_or_else(|| {
            SeedError::Database(format!("'{}' conflicted on insert but cannot be found", ADMIN_USERNAME))
        })?;

    Ok(already_present(existing))
}

fn already_present(existing: AdminAccount) -> SeedOutcome {
    if existing.is_deleted {
        tracing::warn!(username = %existing.username, delete_time = existing.delete_time, "admin account exists but is soft-deleted; leaving it untouched");
    } else if existing.is_locked {
        tracing::warn!(username = %existing.username, "admin account exists but is locked; leaving it untouched");
    } else {
        tracing::info!(username = %existing.username, "admin account already exists");
    }

    SeedOutcome::AlreadyPresent(existing)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DbResultExt;
    use crate::models::DEFAULT_PASSWORD_HASH;

    const NOW: i64 = 1_700_000_000;

    async fn pool_with_admin() -> (SqlitePool, AdminAccount) {
        let pool = db::connect(":memory:").await.unwrap();
        db::ensure_admins_table(&pool).await.unwrap();

        let winner = AdminAccount::new_seed(ADMIN_USERNAME, DEFAULT_PASSWORD_HASH, NOW);
        assert!(db::insert_admin_if_absent(&pool, &winner).await.unwrap());

        (pool, winner)
    }

    #[tokio::test]
    async fn test_skipped_insert_rereads_existing_admin() {
        let (pool, winner) = pool_with_admin().await;

        // Row appeared between our lookup and our insert
        let late = AdminAccount::new_seed(ADMIN_USERNAME, "$2b$12$late-hash", NOW + 5);
        let inserted = db::insert_admin_if_absent(&pool, &late).await;
        assert!(matches!(inserted, Ok(false)));

        let outcome = settle_insert(&pool, late, inserted).await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadyPresent(winner));
        assert_eq!(db::count_admins(&pool, ADMIN_USERNAME).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_unique_violation_is_absorbed_as_success() {
        let (pool, winner) = pool_with_admin().await;

        let late = AdminAccount::new_seed(ADMIN_USERNAME, "$2b$12$late-hash", NOW + 5);
        let inserted = sqlx::query(
            "INSERT INTO admins (username, password, create_time, update_time) VALUES (?, ?, ?, ?)",
        )
        .bind(&late.username)
        .bind(&late.password)
        .bind(late.create_time)
        .bind(late.update_time)
        .execute(&pool)
        .await
        .db_err()
        .map(|result| result.rows_affected() > 0);
        assert!(matches!(&inserted, Err(e) if e.is_conflict()));

        let outcome = settle_insert(&pool, late, inserted).await.unwrap();
        assert_eq!(outcome, SeedOutcome::AlreadyPresent(winner));
        assert_eq!(db::count_admins(&pool, ADMIN_USERNAME).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_other_insert_errors_are_fatal() {
        let (pool, _) = pool_with_admin().await;

        let late = AdminAccount::new_seed(ADMIN_USERNAME, DEFAULT_PASSWORD_HASH, NOW);
        let inserted = Err(SeedError::Database("disk I/O error".to_string()));

        let result = settle_insert(&pool, late, inserted).await;
        assert!(matches!(result, Err(SeedError::Database(_))));
    }

    #[tokio::test]
    async fn test_conflict_without_row_is_an_error() {
        let pool = db::connect(":memory:").await.unwrap();
        db::ensure_admins_table(&pool).await.unwrap();

        let account = AdminAccount::new_seed(ADMIN_USERNAME, DEFAULT_PASSWORD_HASH, NOW);
        let result = settle_insert(&pool, account, Ok(false)).await;
        assert!(matches!(result, Err(SeedError::Database(_))));
    }

    #[test]
    fn test_outcome_messages() {
        let account = AdminAccount::new_seed(ADMIN_USERNAME, DEFAULT_PASSWORD_HASH, 1);

        let created = SeedOutcome::Created(account.clone());
        assert!(created.was_created());
        assert!(created.message().contains("rscms-admin"));

        let present = SeedOutcome::AlreadyPresent(account);
        assert!(!present.was_created());
        assert!(present.message().starts_with("Admins already initialized"));
    }
}
