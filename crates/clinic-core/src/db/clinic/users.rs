//! Login user operations.

use rusqlite::{params, ErrorCode, OptionalExtension};
use sha2::{Digest, Sha256};

use super::ClinicStore;
use crate::db::StoreResult;
use crate::models::UserAccount;

/// Single-round unsalted SHA-256, compatible with hashes already on disk in
/// deployed clinic databases.
pub(crate) fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hex::encode(hasher.finalize())
}

impl ClinicStore {
    /// Check a username/password pair against the stored hash.
    pub fn verify_login(&self, username: &str, password: &str) -> StoreResult<bool> {
        let conn = self.connect()?;
        let found: Option<i64> = conn
            .query_row(
                "SELECT user_id FROM users WHERE username = ?1 AND password_hash = ?2",
                params![username, hash_password(password)],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    /// Change a password after re-verifying the old one. Returns false when
    /// the old password does not verify.
    pub fn change_password(
        &self,
        username: &str,
        old_password: &str,
        new_password: &str,
    ) -> StoreResult<bool> {
        if !self.verify_login(username, old_password)? {
            return Ok(false);
        }

        let conn = self.connect()?;
        conn.execute(
            "UPDATE users SET password_hash = ?2 WHERE username = ?1",
            params![username, hash_password(new_password)],
        )?;
        Ok(true)
    }

    /// Add a login account. Returns false, without touching the existing
    /// row, when the username is already taken.
    pub fn add_user(&self, username: &str, password: &str, role: &str) -> StoreResult<bool> {
        let conn = self.connect()?;
        let result = conn.execute(
            "INSERT INTO users (username, password_hash, role) VALUES (?1, ?2, ?3)",
            params![username, hash_password(password), role],
        );
        match result {
            Ok(_) => Ok(true),
            Err(rusqlite::Error::SqliteFailure(e, _))
                if e.code == ErrorCode::ConstraintViolation =>
            {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// All login accounts (hashes excluded).
    pub fn list_users(&self) -> StoreResult<Vec<UserAccount>> {
        let conn = self.connect()?;
        let mut stmt =
            conn.prepare("SELECT user_id, username, role, created_at FROM users ORDER BY user_id")?;
        let rows = stmt.query_map([], |row| {
            Ok(UserAccount {
                id: row.get(0)?,
                username: row.get(1)?,
                role: row.get(2)?,
                created_at: row.get(3)?,
            })
        })?;
        rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
    }

    /// True while the seeded `admin`/`admin` pair still verifies. The login
    /// collaborator uses this to demand a password change before proceeding.
    pub fn has_default_credentials(&self) -> StoreResult<bool> {
        self.verify_login("admin", "admin")
    }
}
