// Admin account record

use crate::error::SeedError;

/// Well-known username of the bootstrap administrator
pub const ADMIN_USERNAME: &str = "rscms-admin";

/// Published bcrypt hash of the default bootstrap password.
/// Deployments are expected to override it with their own secret.
pub const DEFAULT_PASSWORD_HASH: &str =
    "$2b$12$rJMgvLmL60eVWEK8fhzJt.VwZPzFgGl0jfzfiSq1Ct0bsRDXA427a";

/// A row of the `admins` table.
///
/// Timestamps are unix seconds. `delete_time` and `last_login_time` are 0
/// until the corresponding event happens.
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct AdminAccount {
    pub username: String,
    pub password: String,
    pub last_login_ip: String,
    pub last_login_time: i64,
    pub is_locked: bool,
    pub create_time: i64,
    pub update_time: i64,
    pub delete_time: i64,
    pub is_deleted: bool,
}

impl AdminAccount {
    // Fresh record as written by the seeder
    pub fn new_seed(username: &str, password_hash: &str, now: i64) -> Self {
        AdminAccount {
            username: username.to_string(),
            password: password_hash.to_string(),
            last_login_ip: String::new(),
            last_login_time: 0,
            is_locked: false,
            create_time: now,
            update_time: now,
            delete_time: 0,
            is_deleted: false,
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted && !self.is_locked
    }

    /// Record a mutation. `update_time` never moves before `create_time`.
    pub fn touch(&mut self, now: i64) {
        self.update_time = now.max(self.create_time);
    }

    /// Mark the account deleted while keeping the row.
    pub fn soft_delete(&mut self, now: i64) {
        if self.is_deleted {
            return;
        }
        self.is_deleted = true;
        self.delete_time = now.max(1);
        self.touch(now);
    }

    pub fn check_invariants(&self) -> Result<(), SeedError> {
        if self.username.is_empty() {
            return Err(SeedError::Schema("username must not be empty".to_string()));
        }
        if self.create_time > self.update_time {
            return Err(SeedError::Schema(format!(
                "create_time {} is after update_time {}",
                self.create_time, self.update_time
            )));
        }
        if self.is_deleted && self.delete_time == 0 {
            return Err(SeedError::Schema(
                "deleted account must have a delete_time".to_string(),
            ));
        }
        Ok(())
    }
}
